use std::ffi::OsString;

use crate::models::RenderRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Script,
    Scene,
    Quality,
    MediaDir,
    Other(String),
}

const DEFAULT_TAIL: [&str; 6] = ["{script}", "{scene}", "-q", "{quality}", "--media_dir", "{media_dir}"];

// Parses configured tool args like `run --rm -v /data:/app manim-platform manim {script} {scene} -q {quality}`
// When no `{script}` placeholder is present the default manim tail is appended.
pub fn parse_tool_args(args: &[String]) -> Vec<Arg> {
    let mut parsed: Vec<Arg> = args.iter().map(|a| parse_arg(a)).collect();

    if !parsed.contains(&Arg::Script) {
        parsed.extend(DEFAULT_TAIL.iter().map(|a| parse_arg(a)));
    }

    parsed
}

fn parse_arg(arg: &str) -> Arg {
    match arg {
        "{script}" => Arg::Script,
        "{scene}" => Arg::Scene,
        "{quality}" => Arg::Quality,
        "{media_dir}" => Arg::MediaDir,
        other => Arg::Other(other.to_string()),
    }
}

pub fn resolve_args(args: &[Arg], request: &RenderRequest) -> Vec<OsString> {
    args.iter()
        .filter_map(|arg| match arg {
            Arg::Script => Some(request.script.clone().into_os_string()),
            Arg::Scene => request.scene.as_ref().map(OsString::from),
            Arg::Quality => Some(request.quality.to_string().into()),
            Arg::MediaDir => Some(request.output_dir.clone().into_os_string()),
            Arg::Other(s) => Some(s.into()),
        })
        .collect()
}
