use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

pub fn config_dir() -> Option<&'static Path> {
    static CONFIG_DIR: OnceCell<Option<Box<Path>>> = OnceCell::new();
    CONFIG_DIR
        .get_or_init(|| {
            let dirs = ProjectDirs::from("none", "manim-runner", "manim-runner")?;
            Some(dirs.config_dir().into())
        })
        .as_deref()
}

/// Resolves a program name against `PATH`; paths containing a separator are checked as-is
pub fn resolve_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
