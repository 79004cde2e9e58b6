use once_cell::sync::Lazy;
use regex::Regex;

/// Scene base classes, in the order their subclasses are reported
const SCENE_BASES: [&str; 4] = ["Scene", "MovingCameraScene", "ThreeDScene", "ZoomedScene"];

static SCENE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*(Scene|MovingCameraScene|ThreeDScene|ZoomedScene)\s*\)")
        .expect("scene class pattern is valid")
});

/// Names of the scene classes declared in a script.
/// Plain `Scene` subclasses come first, then each other base in turn; declaration order within a base.
pub fn scene_classes(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = SCENE_CLASS
        .captures_iter(source)
        .filter_map(|caps| {
            let base = caps.get(2)?.as_str();
            let rank = SCENE_BASES.iter().position(|b| *b == base)?;
            Some((rank, caps.get(1)?.as_str()))
        })
        .collect();
    found.sort_by_key(|(rank, _)| *rank);

    let mut classes: Vec<String> = Vec::new();
    for (_, name) in found {
        if !classes.iter().any(|c| c == name) {
            classes.push(name.to_string());
        }
    }
    classes
}
