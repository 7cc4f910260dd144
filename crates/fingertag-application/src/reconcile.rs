// SPDX-License-Identifier: GPL-3.0-or-later

//! Candidate reconciliation.
//!
//! Flattens an AcoustID lookup response (results → recordings → release
//! groups) into the ordered list of tagging candidates offered to the
//! operator. Recordings are visited by `sources` descending within each
//! result; release groups keep the order the service returned.

use std::cmp::Reverse;

use fingertag_domain::MatchCandidate;
use fingertag_fingerprint::{Artist, LookupResponse, Recording, ReleaseGroup};
use tracing::{debug, trace};

const COMPILATION: &str = "Compilation";

/// Turn a lookup response into tagging candidates for one file.
///
/// # Arguments
/// * `response` - Raw lookup response
/// * `measured_duration` - Duration of the file being tagged, in seconds
/// * `duration_tolerance` - Maximum allowed difference between the file and a
///   recording with a known duration, in seconds
///
/// Never fails: a response without usable data yields no candidates. No
/// deduplication is done; identical albums under one recording produce one
/// candidate each.
pub fn reconcile(
    response: &LookupResponse,
    measured_duration: u32,
    duration_tolerance: u32,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();

    for result in &response.results {
        for recording in by_sources_descending(&result.recordings) {
            if recording.release_groups.is_empty() {
                trace!(target: "reconcile", recording = ?recording.id, "skipping recording without release groups");
                continue;
            }

            if !within_tolerance(recording, measured_duration, duration_tolerance) {
                trace!(
                    target: "reconcile",
                    recording = ?recording.id,
                    duration = ?recording.duration,
                    measured_duration,
                    "skipping recording outside duration tolerance"
                );
                continue;
            }

            let artist = display_artist(&recording.artists);
            let lead_artist = recording.artists.first();

            for release_group in &recording.release_groups {
                if is_compilation(release_group) {
                    trace!(target: "reconcile", album = %release_group.title, "skipping compilation");
                    continue;
                }

                if !credits_artist(release_group, lead_artist) {
                    trace!(target: "reconcile", album = %release_group.title, "skipping album credited to other artists");
                    continue;
                }

                candidates.push(MatchCandidate::new(
                    artist.clone(),
                    recording.title.clone(),
                    release_group.title.clone(),
                    result.score,
                    recording.sources,
                ));
            }
        }
    }

    debug!(
        target: "reconcile",
        results = response.results.len(),
        candidates = candidates.len(),
        "reconciliation complete"
    );

    candidates
}

/// Recordings ordered by `sources` descending; ties keep their input order.
fn by_sources_descending(recordings: &[Recording]) -> Vec<&Recording> {
    let mut indexed: Vec<(usize, &Recording)> = recordings.iter().enumerate().collect();
    indexed.sort_by_key(|(index, recording)| (Reverse(recording.sources), *index));
    indexed.into_iter().map(|(_, recording)| recording).collect()
}

fn within_tolerance(recording: &Recording, measured_duration: u32, tolerance: u32) -> bool {
    match recording.known_duration() {
        Some(duration) => duration.abs_diff(measured_duration) <= tolerance,
        None => true,
    }
}

/// Every artist name followed by its join phrase, with nothing in between.
pub fn display_artist(artists: &[Artist]) -> String {
    artists
        .iter()
        .fold(String::new(), |mut display, artist| {
            display.push_str(&artist.name);
            if let Some(join_phrase) = &artist.join_phrase {
                display.push_str(join_phrase);
            }
            display
        })
}

/// Only the first secondary type is consulted.
fn is_compilation(release_group: &ReleaseGroup) -> bool {
    release_group
        .secondary_types
        .first()
        .is_some_and(|kind| kind == COMPILATION)
}

/// An uncredited release group accepts any recording. A credited one must list
/// the recording's lead artist; a recording without artists cannot satisfy it.
fn credits_artist(release_group: &ReleaseGroup, lead_artist: Option<&Artist>) -> bool {
    if release_group.artists.is_empty() {
        return true;
    }

    lead_artist.is_some_and(|lead| {
        release_group
            .artists
            .iter()
            .any(|credited| credited.id == lead.id)
    })
}
