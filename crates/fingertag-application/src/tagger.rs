// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-file tagging pipeline.
//!
//! For each file:
//! - fingerprint it and query the lookup service
//! - reconcile the response into match candidates
//! - fall back to the file name when nothing matched
//! - hand the candidates to an interactive edit session

use std::path::{Path, PathBuf};

use fingertag_config::TaggingConfig;
use fingertag_domain::{MatchCandidate, TrackTags};
use fingertag_fingerprint::{FingerprintError, Fingerprinter, LookupService};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::filename_fallback::{self, FilenameFallbackError};
use crate::prompter::Prompter;
use crate::reconcile::reconcile;
use crate::session::{SessionOutcome, SessionPolicy, TagEditSession};
use crate::tag_store::{TagHandle, TagStore, TagStoreError};

/// Errors that stop processing of a single file.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Failed to fingerprint file: {0}")]
    Fingerprint(#[source] FingerprintError),

    #[error("Fingerprint lookup failed: {0}")]
    Lookup(#[source] FingerprintError),

    #[error(transparent)]
    Filename(#[from] FilenameFallbackError),

    #[error(transparent)]
    TagStore(#[from] TagStoreError),
}

/// Result type for pipeline operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// How a file left the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Committed {
        tags: TrackTags,
        renamed_to: Option<PathBuf>,
    },
    Aborted,
    /// Nothing matched and the filename fallback is disabled.
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggingPolicy {
    pub duration_tolerance_secs: u32,
    pub auto_select_single: bool,
    pub rename_on_commit: bool,
    pub fallback_to_filename: bool,
}

impl Default for TaggingPolicy {
    fn default() -> Self {
        Self::from(&TaggingConfig::default())
    }
}

impl From<&TaggingConfig> for TaggingPolicy {
    fn from(config: &TaggingConfig) -> Self {
        Self {
            duration_tolerance_secs: config.duration_tolerance_secs,
            auto_select_single: config.auto_select_single,
            rename_on_commit: config.rename_on_commit,
            fallback_to_filename: config.fallback_to_filename,
        }
    }
}

/// Counts of per-file outcomes over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub committed: usize,
    pub aborted: usize,
    pub no_match: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.committed + self.aborted + self.no_match + self.failed
    }

    fn record(&mut self, result: &ProcessResult<FileOutcome>) {
        match result {
            Ok(FileOutcome::Committed { .. }) => self.committed += 1,
            Ok(FileOutcome::Aborted) => self.aborted += 1,
            Ok(FileOutcome::NoMatch) => self.no_match += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Fingerprints, matches and interactively tags audio files.
pub struct FileTagger<F, L, S, P> {
    fingerprinter: F,
    lookup: L,
    store: S,
    prompter: P,
    policy: TaggingPolicy,
}

impl<F, L, S, P> FileTagger<F, L, S, P>
where
    F: Fingerprinter,
    L: LookupService,
    S: TagStore,
    P: Prompter,
{
    pub fn new(fingerprinter: F, lookup: L, store: S, prompter: P, policy: TaggingPolicy) -> Self {
        Self {
            fingerprinter,
            lookup,
            store,
            prompter,
            policy,
        }
    }

    pub fn policy(&self) -> &TaggingPolicy {
        &self.policy
    }

    /// Process files one after another. A failing file is logged and counted,
    /// never fatal to the run.
    pub async fn process_files(&mut self, paths: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::default();

        for path in paths {
            let result = self.process_file(path).await;
            if let Err(err) = &result {
                warn!(target: "pipeline", path = %path.display(), error = %err, "skipping file");
            }
            summary.record(&result);
        }

        info!(
            target: "pipeline",
            committed = summary.committed,
            aborted = summary.aborted,
            no_match = summary.no_match,
            failed = summary.failed,
            "run complete"
        );
        summary
    }

    /// Run the full pipeline for one file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn process_file(&mut self, path: &Path) -> ProcessResult<FileOutcome> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ProcessError::InvalidPath(path.display().to_string()))?
            .to_string_lossy()
            .into_owned();

        let fingerprint = self
            .fingerprinter
            .fingerprint(path)
            .await
            .map_err(ProcessError::Fingerprint)?;
        debug!(target: "pipeline", duration = fingerprint.duration, "fingerprint computed");

        let response = self
            .lookup
            .lookup(&fingerprint)
            .await
            .map_err(ProcessError::Lookup)?;

        let candidates = reconcile(
            &response,
            fingerprint.duration,
            self.policy.duration_tolerance_secs,
        );

        if !candidates.is_empty() {
            info!(target: "pipeline", candidates = candidates.len(), "found matches for {file_name}");
            let handle = self.store.open(path)?;
            let policy = SessionPolicy {
                auto_select_single: self.policy.auto_select_single,
                rename_on_commit: self.policy.rename_on_commit,
            };
            return self.run_session(path, &file_name, &candidates, policy, handle);
        }

        info!(target: "pipeline", "no matches for {file_name}");
        if !self.policy.fallback_to_filename {
            return Ok(FileOutcome::NoMatch);
        }

        let parsed = filename_fallback::extract(&file_name)?;
        let handle = self.store.open(path)?;
        let fallback = MatchCandidate::new(parsed.artist, parsed.song_name, handle.album(), 0.0, 0);
        info!(target: "pipeline", candidate = %fallback, "using file name as the only candidate");

        // A guess from the file name is always confirmed by the operator.
        let policy = SessionPolicy {
            auto_select_single: false,
            rename_on_commit: self.policy.rename_on_commit,
        };
        self.run_session(path, &file_name, &[fallback], policy, handle)
    }

    fn run_session(
        &mut self,
        path: &Path,
        file_name: &str,
        candidates: &[MatchCandidate],
        policy: SessionPolicy,
        handle: S::Handle,
    ) -> ProcessResult<FileOutcome> {
        let outcome = TagEditSession::new(file_name, candidates, policy, &mut self.prompter)
            .run(&self.store, path, handle)?;

        Ok(match outcome {
            SessionOutcome::Committed { tags, renamed_to } => {
                FileOutcome::Committed { tags, renamed_to }
            }
            SessionOutcome::Aborted => FileOutcome::Aborted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedFingerprinter, CannedLookup, MemoryTagStore, Reply, ScriptedPrompter};
    use fingertag_fingerprint::{Artist, LookupResponse, LookupResult, Recording, ReleaseGroup};
    use uuid::Uuid;

    const FILE: &str = "/music/Foo - Song (Official Video).mp3";

    fn response(recordings: Vec<Recording>) -> LookupResponse {
        LookupResponse {
            results: vec![LookupResult {
                id: Some("9ff43b6a-4f16-427c-93c2-92307ca505e0".to_string()),
                score: 0.93,
                recordings,
            }],
        }
    }

    fn recording(title: &str, duration: u32, album: &str) -> Recording {
        Recording {
            title: title.to_string(),
            duration: Some(duration),
            sources: 4,
            artists: vec![Artist {
                id: Uuid::from_u128(7),
                name: "Foo".to_string(),
                join_phrase: None,
            }],
            release_groups: vec![ReleaseGroup {
                title: album.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn store() -> MemoryTagStore {
        MemoryTagStore::with_file(FILE, TrackTags::new("", "", "Old Album"))
    }

    fn tagger(
        fingerprinter: CannedFingerprinter,
        lookup: CannedLookup,
        store: MemoryTagStore,
        replies: Vec<Reply>,
        policy: TaggingPolicy,
    ) -> FileTagger<CannedFingerprinter, CannedLookup, MemoryTagStore, ScriptedPrompter> {
        FileTagger::new(fingerprinter, lookup, store, ScriptedPrompter::new(replies), policy)
    }

    #[tokio::test]
    async fn matched_file_is_committed_after_confirmation() {
        let store = store();
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::new(response(vec![recording("Song", 203, "Bar")])),
            store.clone(),
            vec![Reply::Select(0), Reply::Select(0)],
            TaggingPolicy::default(),
        );

        let outcome = tagger.process_file(Path::new(FILE)).await.unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Committed {
                tags: TrackTags::new("Foo", "Song", "Bar"),
                renamed_to: None,
            }
        );
        assert_eq!(store.saved(FILE), Some(TrackTags::new("Foo", "Song", "Bar")));
        assert_eq!(store.close_count(), 1);
    }

    #[tokio::test]
    async fn single_match_is_auto_selected_and_renamed() {
        let store = store();
        let policy = TaggingPolicy {
            auto_select_single: true,
            rename_on_commit: true,
            ..Default::default()
        };
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::new(response(vec![recording("Song", 200, "Bar")])),
            store.clone(),
            vec![],
            policy,
        );

        let outcome = tagger.process_file(Path::new(FILE)).await.unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Committed {
                tags: TrackTags::new("Foo", "Song", "Bar"),
                renamed_to: Some(PathBuf::from("/music/Foo - Song.mp3")),
            }
        );
        assert_eq!(tagger.prompter.select_calls(), 0);
    }

    #[tokio::test]
    async fn out_of_tolerance_match_falls_back_to_file_name() {
        let store = store();
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::new(response(vec![recording("Radio Edit", 120, "Bar")])),
            store.clone(),
            vec![Reply::Select(0), Reply::Select(0)],
            TaggingPolicy::default(),
        );

        let outcome = tagger.process_file(Path::new(FILE)).await.unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Committed {
                tags: TrackTags::new("Foo", "Song", "Old Album"),
                renamed_to: None,
            }
        );
        let offered = &tagger.prompter.select_items()[0];
        assert_eq!(offered.len(), 1);
        assert!(offered[0].starts_with("Foo - Song [Old Album]"));
    }

    #[tokio::test]
    async fn filename_fallback_is_never_auto_selected() {
        let policy = TaggingPolicy {
            auto_select_single: true,
            ..Default::default()
        };
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::empty(),
            store(),
            vec![Reply::Cancel],
            policy,
        );

        let outcome = tagger.process_file(Path::new(FILE)).await.unwrap();

        assert_eq!(outcome, FileOutcome::Aborted);
        assert_eq!(tagger.prompter.select_calls(), 1);
    }

    #[tokio::test]
    async fn unparsable_file_name_is_an_error_and_file_untouched() {
        let path = "/music/track01.mp3";
        let store = MemoryTagStore::with_file(path, TrackTags::default());
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::empty(),
            store.clone(),
            vec![],
            TaggingPolicy::default(),
        );

        let result = tagger.process_file(Path::new(path)).await;

        assert!(matches!(
            result,
            Err(ProcessError::Filename(FilenameFallbackError::Unparsable { .. }))
        ));
        assert_eq!(store.open_count(), 0);
        assert_eq!(store.saved(path), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_utf8_file_name_is_still_processed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/music").join(OsStr::from_bytes(b"Foo - Song \xff.mp3"));
        let store = MemoryTagStore::with_file(&path, TrackTags::default());
        let policy = TaggingPolicy {
            auto_select_single: true,
            ..Default::default()
        };
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::new(response(vec![recording("Song", 200, "Bar")])),
            store.clone(),
            vec![],
            policy,
        );

        let outcome = tagger.process_file(&path).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Committed { .. }));
        assert_eq!(store.saved(&path), Some(TrackTags::new("Foo", "Song", "Bar")));
    }

    #[tokio::test]
    async fn root_path_without_file_name_is_rejected() {
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::empty(),
            store(),
            vec![],
            TaggingPolicy::default(),
        );

        let result = tagger.process_file(Path::new("/")).await;

        assert!(matches!(result, Err(ProcessError::InvalidPath(_))));
        assert!(tagger.fingerprinter.calls().is_empty());
    }

    #[tokio::test]
    async fn no_match_without_fallback() {
        let store = store();
        let policy = TaggingPolicy {
            fallback_to_filename: false,
            ..Default::default()
        };
        let mut tagger = tagger(
            CannedFingerprinter::new(200),
            CannedLookup::empty(),
            store.clone(),
            vec![],
            policy,
        );

        let outcome = tagger.process_file(Path::new(FILE)).await.unwrap();

        assert_eq!(outcome, FileOutcome::NoMatch);
        assert_eq!(store.open_count(), 0);
    }

    #[tokio::test]
    async fn fingerprint_and_lookup_failures_are_reported() {
        let mut tagger = tagger(
            CannedFingerprinter::failing(),
            CannedLookup::empty(),
            store(),
            vec![],
            TaggingPolicy::default(),
        );
        let result = tagger.process_file(Path::new(FILE)).await;
        assert!(matches!(result, Err(ProcessError::Fingerprint(_))));

        let mut tagger = tagger_with_failing_lookup();
        let result = tagger.process_file(Path::new(FILE)).await;
        assert!(matches!(result, Err(ProcessError::Lookup(_))));
    }

    fn tagger_with_failing_lookup(
    ) -> FileTagger<CannedFingerprinter, CannedLookup, MemoryTagStore, ScriptedPrompter> {
        tagger(
            CannedFingerprinter::new(200),
            CannedLookup::failing(),
            store(),
            vec![],
            TaggingPolicy::default(),
        )
    }

    #[tokio::test]
    async fn run_continues_past_failures_and_counts_outcomes() {
        let matched = "/music/a.mp3";
        let missing = "/music/missing.mp3";
        let unparsable = "/music/b.mp3";
        let store = MemoryTagStore::with_file(matched, TrackTags::default());
        store.add_file(unparsable, TrackTags::default());
        let policy = TaggingPolicy {
            auto_select_single: true,
            ..Default::default()
        };
        let fingerprinter = CannedFingerprinter::new(200);
        let mut tagger = FileTagger::new(
            fingerprinter,
            CannedLookup::new(response(vec![recording("Song", 200, "Bar")])),
            store.clone(),
            ScriptedPrompter::new(vec![]),
            policy,
        );

        let paths = vec![
            PathBuf::from(missing),
            PathBuf::from(matched),
            PathBuf::from(unparsable),
        ];
        let summary = tagger.process_files(&paths).await;

        assert_eq!(
            summary,
            RunSummary {
                committed: 2,
                aborted: 0,
                no_match: 0,
                failed: 1,
            }
        );
        assert_eq!(summary.total(), 3);
        assert_eq!(tagger.fingerprinter.calls(), paths);
        assert_eq!(store.close_count(), 2);
    }

    #[test]
    fn policy_follows_config() {
        let config = TaggingConfig {
            duration_tolerance_secs: 5,
            auto_select_single: true,
            rename_on_commit: true,
            fallback_to_filename: false,
        };

        assert_eq!(
            TaggingPolicy::from(&config),
            TaggingPolicy {
                duration_tolerance_secs: 5,
                auto_select_single: true,
                rename_on_commit: true,
                fallback_to_filename: false,
            }
        );
        assert_eq!(TaggingPolicy::default().duration_tolerance_secs, 15);
    }
}
