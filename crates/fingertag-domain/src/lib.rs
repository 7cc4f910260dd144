// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Match Candidates
// ============================================================================

/// A fully resolved (artist, song, album) proposal for one audio file.
///
/// Candidates carry no identity beyond their field values: two candidates
/// with equal fields are interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Display artist built from every credited artist and its join phrase.
    pub artist: String,
    pub song_name: String,
    pub album: String,
    /// Lookup confidence (0-1) of the result the candidate came from.
    pub score: f64,
    /// Popularity signal: how many submissions back the recording.
    pub sources: u32,
}

impl MatchCandidate {
    pub fn new(
        artist: impl Into<String>,
        song_name: impl Into<String>,
        album: impl Into<String>,
        score: f64,
        sources: u32,
    ) -> Self {
        Self {
            artist: artist.into(),
            song_name: song_name.into(),
            album: album.into(),
            score,
            sources,
        }
    }
}

impl fmt::Display for MatchCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [{}] (score {:.2}, sources {})",
            self.artist, self.song_name, self.album, self.score, self.sources
        )
    }
}

// ============================================================================
// Track Tags
// ============================================================================

/// The three tag values the tool reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTags {
    pub artist: String,
    pub title: String,
    pub album: String,
}

impl TrackTags {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            album: album.into(),
        }
    }

    /// File name used when renaming on commit: `<artist> - <title>.mp3`.
    pub fn file_name(&self) -> String {
        format!("{} - {}.mp3", self.artist, self.title)
    }
}

impl From<&MatchCandidate> for TrackTags {
    fn from(candidate: &MatchCandidate) -> Self {
        Self {
            artist: candidate.artist.clone(),
            title: candidate.song_name.clone(),
            album: candidate.album.clone(),
        }
    }
}

// ============================================================================
// Edit Fields
// ============================================================================

/// Entries of the edit menu. `Commit` saves and leaves the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagRole {
    Commit,
    Artist,
    SongName,
    Album,
}

impl TagRole {
    /// Menu order: commit first, then the editable fields.
    pub const MENU: [TagRole; 4] = [
        TagRole::Commit,
        TagRole::Artist,
        TagRole::SongName,
        TagRole::Album,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TagRole::Commit => "Save",
            TagRole::Artist => "Artist",
            TagRole::SongName => "Song name",
            TagRole::Album => "Album",
        }
    }
}

impl fmt::Display for TagRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An editable tag value next to the value currently stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagField {
    role: TagRole,
    pub new_value: String,
    old_value: String,
}

impl TagField {
    pub fn new(role: TagRole, new_value: impl Into<String>, old_value: impl Into<String>) -> Self {
        Self {
            role,
            new_value: new_value.into(),
            old_value: old_value.into(),
        }
    }

    pub fn role(&self) -> TagRole {
        self.role
    }

    pub fn old_value(&self) -> &str {
        &self.old_value
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.old_value == self.new_value {
            write!(f, "{}: {}", self.role, self.new_value)
        } else {
            write!(f, "{}: {} (was: {})", self.role, self.new_value, self.old_value)
        }
    }
}
