use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

/// How to pick one video when the tool left several behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Greatest modification time
    #[default]
    Latest,
    /// First file in name-sorted walk order
    First,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" | "newest" => Ok(Selection::Latest),
            "first" => Ok(Selection::First),
            _ => Err(format!("unknown selection policy: {s}")),
        }
    }
}

impl Selection {
    /// Files whose metadata can no longer be read are skipped
    pub fn select(self, files: Vec<PathBuf>) -> Option<PathBuf> {
        match self {
            Selection::First => files.into_iter().next(),
            Selection::Latest => {
                let mut latest = None;
                for file in files {
                    let modified = match std::fs::metadata(&file).and_then(|m| m.modified()) {
                        Ok(modified) => modified,
                        Err(e) => {
                            debug!("Skipping {}: {}", file.display(), e);
                            continue;
                        }
                    };
                    match &latest {
                        Some((time, _)) if *time > modified => {}
                        _ => latest = Some((modified, file)),
                    }
                }
                latest.map(|(_, file)| file)
            }
        }
    }
}

/// Lists every regular file under `root` whose extension matches, sorted by path.
/// Entries the walk cannot read are skipped.
pub fn find_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|entry| entry.into_path())
        .collect()
}

pub fn find_video(root: &Path, extension: &str, selection: Selection) -> Option<PathBuf> {
    selection.select(find_files(root, extension))
}

/// Like [`find_video`], restricted to files named `<stem>.<extension>`
pub fn find_named_video(
    root: &Path,
    extension: &str,
    stem: &str,
    selection: Selection,
) -> Option<PathBuf> {
    let files = find_files(root, extension)
        .into_iter()
        .filter(|f| f.file_stem().is_some_and(|s| s == stem))
        .collect();
    selection.select(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};

    fn touch(path: &Path, age_secs: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn finds_nested_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("videos/scene/720p30/Intro.mp4"), 0);
        touch(&dir.path().join("videos/scene/1080p60/Outro.MP4"), 0);
        touch(&dir.path().join("images/Intro.png"), 0);
        touch(&dir.path().join("videos/scene/partial_movie_files/list.txt"), 0);

        let files = find_files(dir.path(), "mp4");
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.starts_with(dir.path().join("videos"))));
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_files(&dir.path().join("nope"), "mp4").is_empty());
        assert_eq!(
            find_video(&dir.path().join("nope"), "mp4", Selection::Latest),
            None
        );
    }

    #[test]
    fn latest_picks_newest_mtime() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/Old.mp4"), 300);
        touch(&dir.path().join("b/New.mp4"), 10);
        touch(&dir.path().join("c/Older.mp4"), 600);

        let picked = find_video(dir.path(), "mp4", Selection::Latest);
        assert_eq!(picked, Some(dir.path().join("b/New.mp4")));
    }

    #[test]
    fn first_picks_first_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b/New.mp4"), 10);
        touch(&dir.path().join("a/Old.mp4"), 300);

        let picked = find_video(dir.path(), "mp4", Selection::First);
        assert_eq!(picked, Some(dir.path().join("a/Old.mp4")));
    }

    #[test]
    fn vanished_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("Kept.mp4");
        touch(&kept, 100);

        let picked = Selection::Latest.select(vec![dir.path().join("Gone.mp4"), kept.clone()]);
        assert_eq!(picked, Some(kept));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_hide_other_videos() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/locked/Hidden.mp4"), 0);
        touch(&dir.path().join("b/Visible.mp4"), 0);
        let locked = dir.path().join("a/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let files = find_files(dir.path(), "mp4");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(files.contains(&dir.path().join("b/Visible.mp4")));
    }

    #[test]
    fn named_video_matches_the_stem_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("videos/s/480p15/Intro.mp4"), 30);
        touch(&dir.path().join("videos/s/480p15/IntroTwo.mp4"), 0);
        touch(&dir.path().join("videos/s/480p15/partial_movie_files/Intro/1234.mp4"), 0);

        let picked = find_named_video(dir.path(), "mp4", "Intro", Selection::Latest);
        assert_eq!(picked, Some(dir.path().join("videos/s/480p15/Intro.mp4")));
        assert_eq!(find_named_video(dir.path(), "mp4", "Outro", Selection::Latest), None);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("Latest".parse::<Selection>(), Ok(Selection::Latest));
        assert_eq!("first".parse::<Selection>(), Ok(Selection::First));
        assert!("random".parse::<Selection>().is_err());
    }
}
