use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading the arguments and picking a video
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Script file {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script path {0} is not a file")]
    ScriptNotFile(PathBuf),

    #[error("{0} was not found on PATH")]
    ToolNotFound(String),

    #[error("{stderr}")]
    ToolFailed { stderr: String, stdout: String },

    #[error("No video file was generated")]
    NoVideo { stdout: String },

    #[error("No Scene class found in the script")]
    NoScenes,

    #[error("Failed to render scene {scene}: {source}")]
    Scene {
        scene: String,
        #[source]
        source: Box<RenderError>,
    },

    #[error("No videos to combine")]
    NoInputs,

    #[error("Video {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Captured tool stdout, when the tool got far enough to produce any
    pub fn stdout(&self) -> &str {
        match self {
            RenderError::ToolFailed { stdout, .. } | RenderError::NoVideo { stdout } => stdout,
            RenderError::Scene { source, .. } => source.stdout(),
            _ => "",
        }
    }
}
