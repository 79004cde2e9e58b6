mod cli;
mod config;
mod discover;
mod error;
mod models;
mod runner;
mod scenes;
mod utils;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MANIM_RUNNER_LOG";

/// Renders a Manim scene script and reports the produced video as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scene script to render
    script: Option<PathBuf>,
    /// Directory the renderer writes its media into
    output_dir: Option<PathBuf>,
    /// Quality preset: low, medium, high, production, 4k or a raw renderer flag
    quality: Option<String>,
    /// Scene class to render; the first scene in the script when omitted
    #[arg(long)]
    scene: Option<String>,
    /// Render every scene in the script and concatenate them into one video
    #[arg(long, conflicts_with = "scene")]
    all_scenes: bool,
    /// Config file; defaults to config.toml in the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Concatenate rendered videos with ffmpeg
    Combine {
        #[arg(short, long)]
        output: PathBuf,
        videos: Vec<PathBuf>,
    },
    /// List the scene classes declared in a script
    Scenes { script: PathBuf },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Usage errors are reported as a failure record like every other invocation error
fn parse_args() -> anyhow::Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            _ => {
                eprint!("{}", e);
                let message = e.to_string();
                let message = message.lines().next().unwrap_or_default();
                cli::invocation_error(message.trim_start_matches("error: "))?;
                std::process::exit(1);
            }
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = parse_args()?;
    init_tracing(cli.verbose);

    let config = match config::read_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            cli::invocation_error(format!("{:#}", e))?;
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Commands::Combine { output, videos }) => {
            runtime.block_on(cli::combine(config, output, videos))?;
        }
        Some(Commands::Scenes { script }) => cli::scenes(script)?,
        None => {
            let (Some(script), Some(output_dir)) = (cli.script, cli.output_dir) else {
                cli::invocation_error(cli::MISSING_ARGS)?;
                std::process::exit(1);
            };
            let request = cli::RenderArgs {
                script,
                output_dir,
                quality: cli.quality,
                scene: cli.scene,
                all_scenes: cli.all_scenes,
            };
            runtime.block_on(cli::render(config, request))?;
        }
    }

    Ok(())
}
