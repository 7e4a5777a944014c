//! Discovery of the most recent rollout session file.
//!
//! Sessions live at `$CODEX_HOME/sessions/YYYY/MM/DD/rollout-*.jsonl`
//! (defaulting to `~/.codex/sessions`).

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

fn sessions_root() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("CODEX_HOME") {
        return Some(PathBuf::from(home).join("sessions"));
    }
    std::env::home_dir().map(|home| home.join(".codex").join("sessions"))
}

fn is_rollout_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with("rollout-") && name.ends_with(".jsonl")
}

/// Find the most recently modified rollout file, if any.
pub fn find_latest_session() -> Option<PathBuf> {
    let root = sessions_root()?;
    find_latest_session_in(&root)
}

pub fn find_latest_session_in(root: &Path) -> Option<PathBuf> {
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_rollout_file(entry.path()) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let newer = match &latest {
            Some((best, _)) => modified > *best,
            None => true,
        };
        if newer {
            latest = Some((modified, entry.path().to_path_buf()));
        }
    }

    latest.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_latest_session_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let day = dir.path().join("2025").join("06").join("01");
        fs::create_dir_all(&day).unwrap();

        let older = day.join("rollout-a.jsonl");
        let newer = day.join("rollout-b.jsonl");
        fs::write(&older, "{}\n").unwrap();
        fs::write(&newer, "{}\n").unwrap();

        let earlier = SystemTime::UNIX_EPOCH;
        let file = fs::File::options().write(true).open(&older).unwrap();
        file.set_modified(earlier).unwrap();

        assert_eq!(find_latest_session_in(dir.path()), Some(newer));
    }

    #[test]
    fn test_non_rollout_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.jsonl"), "{}\n").unwrap();
        assert_eq!(find_latest_session_in(dir.path()), None);
    }
}
