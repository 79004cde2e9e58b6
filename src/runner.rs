use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cli::parse::{parse_tool_args, resolve_args};
use crate::cli::validation::{validate_script, validate_videos};
use crate::config::Config;
use crate::discover::{find_named_video, find_video};
use crate::error::RenderError;
use crate::models::{RenderOutcome, RenderRequest};
use crate::scenes::scene_classes;
use crate::utils::resolve_program;

pub async fn render(config: &Config, request: RenderRequest) -> RenderOutcome {
    match try_render(config, request).await {
        Ok((video, stdout)) => {
            info!("Rendered {}", video.display());
            RenderOutcome::success(video, stdout)
        }
        Err(e) => {
            warn!("Render failed: {}", e);
            RenderOutcome::failure(e.to_string(), e.stdout().to_string())
        }
    }
}

async fn try_render(
    config: &Config,
    mut request: RenderRequest,
) -> Result<(PathBuf, String), RenderError> {
    let source = validate_script(&request.script)?;

    if request.scene.is_none() {
        request.scene = scene_classes(&source).into_iter().next();
        debug!("Detected scene: {:?}", request.scene);
    }

    let stdout = run_renderer(config, &request).await?;

    let root = config.search_root(&request.output_dir);
    debug!("Searching {} for .{} files", root.display(), config.extension);
    let video = find_video(root, &config.extension, config.selection)
        .ok_or(RenderError::NoVideo { stdout: stdout.clone() })?;

    Ok((video, stdout))
}

/// Renders every scene class in the script, one tool run each, then concatenates them
/// into `combined_<uuid>.<ext>` inside the output directory.
pub async fn render_all(config: &Config, request: RenderRequest) -> RenderOutcome {
    match try_render_all(config, request).await {
        Ok((video, stdout)) => {
            info!("Rendered all scenes into {}", video.display());
            RenderOutcome::success(video, stdout)
        }
        Err(e) => {
            warn!("Render failed: {}", e);
            RenderOutcome::failure(e.to_string(), e.stdout().to_string())
        }
    }
}

async fn try_render_all(
    config: &Config,
    request: RenderRequest,
) -> Result<(PathBuf, String), RenderError> {
    let source = validate_script(&request.script)?;
    let scenes = scene_classes(&source);
    if scenes.is_empty() {
        return Err(RenderError::NoScenes);
    }
    debug!("Rendering scenes: {:?}", scenes);

    let root = config.search_root(&request.output_dir);
    let mut videos = Vec::with_capacity(scenes.len());
    let mut output = String::new();

    for scene in scenes {
        let scene_request = RenderRequest {
            scene: Some(scene.clone()),
            ..request.clone()
        };
        let (video, stdout) = render_scene(config, &scene_request, root)
            .await
            .map_err(|e| RenderError::Scene {
                scene: scene.clone(),
                source: Box::new(e),
            })?;
        output.push_str(&stdout);
        info!("Rendered scene {} to {}", scene, video.display());
        videos.push(video);
    }

    let combined = request
        .output_dir
        .join(format!("combined_{}.{}", Uuid::new_v4(), config.extension));
    let (video, stdout) = try_combine(config, &videos, &combined).await?;
    output.push_str(&stdout);

    Ok((video, output))
}

async fn render_scene(
    config: &Config,
    request: &RenderRequest,
    root: &Path,
) -> Result<(PathBuf, String), RenderError> {
    let stdout = run_renderer(config, request).await?;
    let scene = request.scene.as_deref().unwrap_or_default();
    let video = find_named_video(root, &config.extension, scene, config.selection)
        .ok_or(RenderError::NoVideo { stdout: stdout.clone() })?;
    Ok((video, stdout))
}

async fn run_renderer(config: &Config, request: &RenderRequest) -> Result<String, RenderError> {
    let program = resolve_program(&config.tool.program)
        .ok_or_else(|| RenderError::ToolNotFound(config.tool.program.clone()))?;
    let args = resolve_args(&parse_tool_args(&config.tool.args), request);

    run_tool(&program, &args).await
}

pub async fn combine(config: &Config, videos: &[PathBuf], output: &Path) -> RenderOutcome {
    match try_combine(config, videos, output).await {
        Ok((video, stdout)) => {
            info!("Combined {} videos into {}", videos.len(), video.display());
            RenderOutcome::success(video, stdout)
        }
        Err(e) => {
            warn!("Combine failed: {}", e);
            RenderOutcome::failure(e.to_string(), e.stdout().to_string())
        }
    }
}

async fn try_combine(
    config: &Config,
    videos: &[PathBuf],
    output: &Path,
) -> Result<(PathBuf, String), RenderError> {
    let inputs = validate_videos(videos)?;
    if let [single] = videos {
        return Ok((single.clone(), String::new()));
    }

    let program = resolve_program(&config.ffmpeg.program)
        .ok_or_else(|| RenderError::ToolNotFound(config.ffmpeg.program.clone()))?;

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir).await?;
    let list = dir.join(format!("{}_list.txt", Uuid::new_v4()));
    tokio::fs::write(&list, concat_list(&inputs)).await?;

    let mut args: Vec<OsString> = config.ffmpeg.args.iter().map(OsString::from).collect();
    args.extend([
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list.clone().into_os_string(),
        "-c".into(),
        "copy".into(),
        output.as_os_str().to_owned(),
    ]);
    let result = run_tool(&program, &args).await;

    if let Err(e) = tokio::fs::remove_file(&list).await {
        warn!("Failed to remove {}: {}", list.display(), e);
    }

    let stdout = result?;
    if !output.is_file() {
        return Err(RenderError::NoVideo { stdout });
    }

    Ok((output.to_path_buf(), stdout))
}

fn concat_list(videos: &[PathBuf]) -> String {
    videos
        .iter()
        .map(|v| format!("file '{}'\n", v.to_string_lossy().replace('\'', r"'\''")))
        .collect()
}

async fn run_tool(program: &Path, args: &[OsString]) -> Result<String, RenderError> {
    info!("Running {} with args: {:?}", program.display(), args);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;

    info!("{} exited with status: {}", program.display(), output.status);

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if stderr.trim().is_empty() {
            stderr = format!("{} exited with {}", program.display(), output.status);
        }
        return Err(RenderError::ToolFailed { stderr, stdout });
    }

    Ok(stdout)
}
