use crate::error::RenderError;
use std::{fs, path::Path, path::PathBuf};

/// Checks the script is an existing readable file and returns its contents
pub fn validate_script(script: &Path) -> Result<String, RenderError> {
    let attr = fs::metadata(script).map_err(|source| RenderError::Script {
        path: script.to_path_buf(),
        source,
    })?;
    if !attr.is_file() {
        return Err(RenderError::ScriptNotFile(script.to_path_buf()));
    }

    let bytes = fs::read(script).map_err(|source| RenderError::Script {
        path: script.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn validate_videos(videos: &[PathBuf]) -> Result<Vec<PathBuf>, RenderError> {
    if videos.is_empty() {
        return Err(RenderError::NoInputs);
    }

    videos
        .iter()
        .map(|v| {
            let attr = fs::metadata(v).map_err(|source| RenderError::Input {
                path: v.clone(),
                source,
            })?;
            if attr.is_dir() {
                return Err(RenderError::Input {
                    path: v.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "is a directory",
                    ),
                });
            }
            fs::canonicalize(v).map_err(|source| RenderError::Input {
                path: v.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_script(&dir.path().join("missing.py")).unwrap_err();
        assert!(matches!(err, RenderError::Script { .. }));
        assert!(err.to_string().contains("missing.py"));
    }

    #[test]
    fn directory_is_not_a_script() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_script(dir.path()).unwrap_err();
        assert!(matches!(err, RenderError::ScriptNotFile(_)));
    }

    #[test]
    fn script_contents_are_returned() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("scene.py");
        fs::write(&script, "class A(Scene): pass\n").unwrap();
        assert_eq!(validate_script(&script).unwrap(), "class A(Scene): pass\n");
    }

    #[test]
    fn videos_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.mp4");
        fs::write(&present, b"").unwrap();

        assert!(matches!(validate_videos(&[]), Err(RenderError::NoInputs)));
        assert!(validate_videos(&[present.clone(), dir.path().join("b.mp4")]).is_err());
        let ok = validate_videos(&[present]).unwrap();
        assert!(ok[0].is_absolute());
    }
}
