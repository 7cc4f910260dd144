// SPDX-License-Identifier: GPL-3.0-or-later

//! AcoustID lookup response models.
//!
//! Field names follow the AcoustID wire format (`releasegroups`,
//! `secondarytypes`, `joinphrase`). Missing arrays deserialize as empty.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Results of one fingerprint query, in the order the service returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LookupResponse {
    #[serde(default)]
    pub results: Vec<LookupResult>,
}

/// One fingerprint match and the recordings linked to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupResult {
    /// AcoustID track ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Match score (0-1), higher is more confident.
    pub score: f64,
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

/// A MusicBrainz recording matched to the fingerprint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recording {
    /// MusicBrainz recording ID.
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    /// Length in seconds. AcoustID omits it or reports 0 when unknown.
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u32>,
    /// Number of fingerprint submissions linked to this recording.
    #[serde(default)]
    pub sources: u32,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default, rename = "releasegroups")]
    pub release_groups: Vec<ReleaseGroup>,
}

impl Recording {
    /// Duration when the catalog actually knows it.
    pub fn known_duration(&self) -> Option<u32> {
        self.duration.filter(|secs| *secs > 0)
    }
}

/// Artist credit on a recording or release group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    /// MusicBrainz artist ID.
    pub id: Uuid,
    pub name: String,
    /// Connector placed after this artist's name (e.g. " & ", " feat. ").
    #[serde(default, rename = "joinphrase")]
    pub join_phrase: Option<String>,
}

/// Album, single, or compilation a recording appears on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReleaseGroup {
    /// MusicBrainz release group ID.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Primary type (e.g. "Album", "Single").
    #[serde(default, rename = "type")]
    pub group_type: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Secondary types (e.g. ["Compilation", "Live"]).
    #[serde(default, rename = "secondarytypes")]
    pub secondary_types: Vec<String>,
    /// Credited artists; empty means the group is not constrained to any artist.
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Durations occasionally arrive as floats; keep whole seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.min(u32::MAX as f64) as u32))
}
