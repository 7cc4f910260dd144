// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolves the operator's path argument into the files to process.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

const AUDIO_EXTENSION: &str = "mp3";

/// A path with an `.mp3` extension is taken as a single file. Any other path
/// is listed without recursion; only regular `.mp3` files are kept, sorted by path.
pub fn list_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    if is_audio_file(path) && !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory {}", path.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", path.display()))?;
        let file_type = entry.file_type()?;
        let entry_path = entry.path();

        // DirEntry::file_type does not follow symlinks.
        if !file_type.is_file() || !is_audio_file(&entry_path) {
            debug!(target: "pipeline", path = %entry_path.display(), "skipping entry");
            continue;
        }
        files.push(entry_path);
    }

    files.sort();
    info!(target: "pipeline", directory = %path.display(), files = files.len(), "listed audio files");
    Ok(files)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}
