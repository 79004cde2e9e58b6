use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serializer;
use serde_derive::{Deserialize, Serialize};

/// A render request is one invocation of the external tool
/// It names the script to render and where the tool should put its media
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub script: PathBuf,
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub scene: Option<String>,
}

/// Quality preset handed to the tool as `-q <flag>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Production,
    FourK,
    Other(String),
}

impl Quality {
    pub fn flag(&self) -> &str {
        match self {
            Quality::Low => "l",
            Quality::Medium => "m",
            Quality::High => "h",
            Quality::Production => "p",
            Quality::FourK => "k",
            Quality::Other(s) => s,
        }
    }
}

impl FromStr for Quality {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "l" | "low" | "draft" => Quality::Low,
            "m" | "medium" => Quality::Medium,
            "h" | "high" => Quality::High,
            "p" | "production" => Quality::Production,
            "k" | "4k" => Quality::FourK,
            _ => Quality::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// The record printed on stdout after every invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub success: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "lossy_path"
    )]
    pub video_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub output: String,
}

// Paths are not guaranteed to be UTF-8; the record must still print
fn lossy_path<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
    match path.as_deref() {
        Some(p) => serializer.serialize_some(&Path::to_string_lossy(p)),
        None => serializer.serialize_none(),
    }
}

impl RenderOutcome {
    pub fn success(video_path: PathBuf, output: String) -> Self {
        Self {
            success: true,
            video_path: Some(video_path),
            error: None,
            output,
        }
    }

    pub fn failure(error: impl Into<String>, output: String) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "Unknown error".to_string();
        }
        Self {
            success: false,
            video_path: None,
            error: Some(error),
            output,
        }
    }
}
