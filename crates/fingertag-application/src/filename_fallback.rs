// SPDX-License-Identifier: GPL-3.0-or-later

//! Filename-based fallback when the fingerprint lookup yields no candidates.
//!
//! Downloaded tracks are usually named `Artist - Song (Official Video).mp3`.
//! Filler phrases are removed first, then the name must split into exactly
//! two parts on `" - "`.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

const SEPARATOR: &str = " - ";
const EXTENSION: &str = ".mp3";

/// Errors that can occur during filename fallback extraction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameFallbackError {
    #[error("Could not derive artist and song from '{name}': expected exactly one \" - \" separator, found {separators}")]
    Unparsable { name: String, separators: usize },
}

/// Artist and song derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub artist: String,
    pub song_name: String,
}

lazy_static! {
    // "Official Audio", "(Official Video)", "[official music video]"
    static ref OFFICIAL: Regex = Regex::new(
        r"(?i)\s*[\(\[]?\s*\bofficial\s+(?:music\s+video|video|audio)\b\s*[\)\]]?"
    )
    .expect("official filler regex is valid");

    // "Lyrics", "(Lyrics)", "[Lyrics Video]"
    static ref LYRICS: Regex = Regex::new(
        r"(?i)\s*[\(\[]?\s*\blyrics(?:\s+video)?\b\s*[\)\]]?"
    )
    .expect("lyrics filler regex is valid");

    // "(prod. Someone)", "[Prod. Someone]"
    static ref PRODUCER_WRAPPED: Regex = Regex::new(
        r"(?i)\s*[\(\[]\s*prod\.\s*[^\(\)\[\]]*[\)\]]"
    )
    .expect("wrapped producer regex is valid");

    // "prod. Someone" running to the end of the name, extension kept
    static ref PRODUCER_BARE: Regex = Regex::new(
        r"(?i)\s+\bprod\.\s*[^\(\)\[\]]*?(\.mp3)?$"
    )
    .expect("bare producer regex is valid");
}

/// Remove filler phrases from a file name.
pub fn strip_filler(name: &str) -> String {
    let cleaned = OFFICIAL.replace_all(name, "");
    let cleaned = LYRICS.replace_all(&cleaned, "");
    let cleaned = PRODUCER_WRAPPED.replace_all(&cleaned, "");
    let cleaned = PRODUCER_BARE.replace_all(&cleaned, "$1");
    cleaned.into_owned()
}

/// Derive `(artist, song)` from a file name such as
/// `Artist Name - Song Title (Official Video).mp3`.
///
/// # Errors
/// `Unparsable` when the cleaned name does not contain exactly one `" - "`.
pub fn extract(file_name: &str) -> Result<ParsedFilename, FilenameFallbackError> {
    let cleaned = strip_filler(file_name);
    let parts: Vec<&str> = cleaned.split(SEPARATOR).collect();

    let [artist, song] = parts.as_slice() else {
        debug!(
            target: "fallback",
            file_name,
            cleaned = %cleaned,
            "filename does not split into artist and song"
        );
        return Err(FilenameFallbackError::Unparsable {
            name: file_name.to_string(),
            separators: parts.len().saturating_sub(1),
        });
    };

    let parsed = ParsedFilename {
        artist: artist.trim().to_string(),
        song_name: strip_extension(song).trim().to_string(),
    };

    debug!(
        target: "fallback",
        artist = %parsed.artist,
        song_name = %parsed.song_name,
        "derived tags from filename"
    );

    Ok(parsed)
}

fn strip_extension(value: &str) -> &str {
    let split_at = value.len().saturating_sub(EXTENSION.len());
    match (value.get(..split_at), value.get(split_at..)) {
        (Some(stem), Some(extension)) if extension.eq_ignore_ascii_case(EXTENSION) => stem,
        _ => value,
    }
}
