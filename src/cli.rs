pub mod parse;
pub mod validation;

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use serde_derive::Serialize;

use crate::config::Config;
use crate::models::{RenderOutcome, RenderRequest};
use crate::runner;
use crate::scenes::scene_classes;

pub const MISSING_ARGS: &str = "Please provide script file and output directory";

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Prints a failure record for errors raised before any render starts
pub fn invocation_error(message: impl Into<String>) -> Result<()> {
    print_json(&RenderOutcome::failure(message, String::new()))
}

/// Positional render arguments as given on the command line
#[derive(Debug)]
pub struct RenderArgs {
    pub script: PathBuf,
    pub output_dir: PathBuf,
    pub quality: Option<String>,
    pub scene: Option<String>,
    pub all_scenes: bool,
}

pub async fn render(config: &Config, args: RenderArgs) -> Result<()> {
    let quality = args.quality.as_deref().unwrap_or(&config.quality);
    let request = RenderRequest {
        script: args.script,
        output_dir: args.output_dir,
        quality: quality.parse()?,
        scene: args.scene,
    };

    let outcome = if args.all_scenes {
        runner::render_all(config, request).await
    } else {
        runner::render(config, request).await
    };
    print_json(&outcome)
}

pub async fn combine(config: &Config, output: PathBuf, videos: Vec<PathBuf>) -> Result<()> {
    let outcome = runner::combine(config, &videos, &output).await;
    print_json(&outcome)
}

#[derive(Debug, Serialize)]
struct SceneList {
    success: bool,
    scenes: Vec<String>,
}

pub fn scenes(script: PathBuf) -> Result<()> {
    match validation::validate_script(&script) {
        Ok(source) => print_json(&SceneList {
            success: true,
            scenes: scene_classes(&source),
        }),
        Err(e) => print_json(&RenderOutcome::failure(e.to_string(), String::new())),
    }
}
