//! Local emoji archive scanner.
//!
//! The archive doubles as the download cache: any file already present means
//! the emoji does not need fetching again. Scanning is a pure read and safe
//! to repeat.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::LocalEmoji;

/// OS metadata files that are never emoji
const EXCLUDED_FILES: &[&str] = &[".DS_Store"];

/// Recursively list every emoji file under `root`, sorted by derived name.
///
/// Directories and OS metadata files are skipped. The canonical name is the
/// filename up to the first `.`, so `partyparrot.gif` and
/// `partyparrot.backup.gif` both map to `partyparrot`. Fails only on
/// filesystem errors (permissions, I/O).
pub fn list_downloaded_emojis(root: &Path) -> Result<Vec<LocalEmoji>> {
    let mut emojis = Vec::new();
    walk(root, &mut emojis)?;
    emojis.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(emojis)
}

fn walk(dir: &Path, emojis: &mut Vec<LocalEmoji>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, emojis)?;
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if EXCLUDED_FILES.contains(&filename.as_str()) {
            continue;
        }

        let name = filename
            .split('.')
            .next()
            .unwrap_or(filename.as_str())
            .to_string();

        emojis.push(LocalEmoji {
            name,
            doc_dir: doc_dir_for(dir),
            dir: dir.to_path_buf(),
            filename,
        });
    }
    Ok(())
}

/// Mirror an archive directory into its documentation directory.
///
/// `./emojis/animals` maps to `./docs/animals`; a flat archive with no
/// `emojis` component maps to `./docs`.
fn doc_dir_for(dir: &Path) -> PathBuf {
    let raw = dir.to_string_lossy();
    let mirrored = raw.replace("emojis", "docs");
    if mirrored == raw {
        PathBuf::from("./docs")
    } else {
        PathBuf::from(mirrored)
    }
}
