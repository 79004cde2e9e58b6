use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::discover::Selection;
use crate::utils::config_dir;

pub const ENV_TOOL: &str = "MANIM_RUNNER_TOOL";
pub const ENV_MEDIA_DIR: &str = "MANIM_RUNNER_MEDIA_DIR";
pub const ENV_SELECTION: &str = "MANIM_RUNNER_SELECTION";
pub const ENV_FFMPEG: &str = "MANIM_RUNNER_FFMPEG";

pub fn read_config(path: Option<&Path>) -> Result<&'static Config> {
    static CONFIG: OnceCell<Config> = OnceCell::new();
    CONFIG.get_or_try_init(|| load_config(path))
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => config_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|p| p.is_file()),
    };

    let mut config = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tool: ToolConfig,
    /// Fixed directory to scan for videos; the caller's output directory when unset
    pub media_dir: Option<PathBuf>,
    pub selection: Selection,
    pub extension: String,
    pub quality: String,
    pub ffmpeg: FfmpegConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub program: String,
    /// Arguments placed before the script path, e.g. `["-m", "manim"]` for `python`
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: ToolConfig::default(),
            media_dir: None,
            selection: Selection::Latest,
            extension: "mp4".to_string(),
            quality: "medium".to_string(),
            ffmpeg: FfmpegConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    pub program: String,
    /// Arguments placed before the concat arguments
    pub args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "manim".to_string(),
            args: Vec::new(),
        }
    }
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            args: Vec::new(),
        }
    }
}

impl Config {
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(tool) = lookup(ENV_TOOL) {
            self.tool.program = tool;
        }
        if let Some(dir) = lookup(ENV_MEDIA_DIR) {
            self.media_dir = Some(dir.into());
        }
        if let Some(selection) = lookup(ENV_SELECTION) {
            self.selection = selection
                .parse()
                .map_err(|_| anyhow!("Invalid {}: {}", ENV_SELECTION, selection))?;
        }
        if let Some(ffmpeg) = lookup(ENV_FFMPEG) {
            self.ffmpeg.program = ffmpeg;
        }
        Ok(())
    }

    pub fn search_root<'a>(&'a self, output_dir: &'a Path) -> &'a Path {
        self.media_dir.as_deref().unwrap_or(output_dir)
    }
}
