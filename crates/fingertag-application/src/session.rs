// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive confirm/edit/save workflow for one file.
//!
//! ```text
//! entry ──► SelectMatch ──► EditMenu ⇄ EditField
//!   │                          │
//!   └──(single + auto)──► Committed ◄┘
//! any prompt error ──► Aborted
//! ```
//!
//! The session owns the file's tag handle and closes it on every exit path.
//! Tags are only written in `Committed`, so an aborted session leaves the
//! file exactly as it was.

use std::path::{Path, PathBuf};

use fingertag_domain::{MatchCandidate, TagField, TagRole, TrackTags};
use tracing::{debug, info, warn};

use crate::prompter::{PromptError, Prompter};
use crate::sanitize::sanitize;
use crate::tag_store::{TagHandle, TagStore, TagStoreError};

/// Per-session switches, resolved from configuration by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Commit a lone candidate without asking.
    pub auto_select_single: bool,
    /// Rename the file to `<artist> - <song>.mp3` after saving.
    pub rename_on_commit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    SelectMatch,
    EditMenu,
    EditField(TagRole),
    Committed(TrackTags),
    Aborted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Committed(_) | SessionState::Aborted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed {
        tags: TrackTags,
        renamed_to: Option<PathBuf>,
    },
    Aborted,
}

/// Edit session over the candidates of a single file.
pub struct TagEditSession<'a, P: Prompter> {
    file_label: &'a str,
    candidates: &'a [MatchCandidate],
    policy: SessionPolicy,
    prompter: &'a mut P,
    current: TrackTags,
    fields: Vec<TagField>,
}

impl<'a, P: Prompter> TagEditSession<'a, P> {
    pub fn new(
        file_label: &'a str,
        candidates: &'a [MatchCandidate],
        policy: SessionPolicy,
        prompter: &'a mut P,
    ) -> Self {
        Self {
            file_label,
            candidates,
            policy,
            prompter,
            current: TrackTags::default(),
            fields: Vec::new(),
        }
    }

    /// Drive the session to a terminal state and write the result.
    ///
    /// Returns an error only when saving fails; a failed rename is logged and
    /// the outcome still reports the commit.
    pub fn run<S>(
        mut self,
        store: &S,
        path: &Path,
        mut handle: S::Handle,
    ) -> Result<SessionOutcome, TagStoreError>
    where
        S: TagStore,
    {
        self.current = handle.current();

        let mut state = self.entry();
        while !state.is_terminal() {
            state = self.step(state);
        }

        let outcome = match state {
            SessionState::Committed(tags) => self.commit(tags, store, path, &mut handle),
            _ => {
                info!(target: "session", file = self.file_label, "session aborted, file left untouched");
                Ok(SessionOutcome::Aborted)
            }
        };

        handle.close();
        outcome
    }

    /// Initial state.
    pub fn entry(&self) -> SessionState {
        match self.candidates {
            [] => {
                warn!(target: "session", file = self.file_label, "no candidates to choose from");
                SessionState::Aborted
            }
            [single] if self.policy.auto_select_single => {
                info!(target: "session", file = self.file_label, "auto selected single match");
                SessionState::Committed(TrackTags::from(single))
            }
            _ => SessionState::SelectMatch,
        }
    }

    /// Advance one transition. Any prompt error moves to `Aborted`.
    pub fn step(&mut self, state: SessionState) -> SessionState {
        let next = match state {
            SessionState::SelectMatch => self.select_match(),
            SessionState::EditMenu => self.edit_menu(),
            SessionState::EditField(role) => self.edit_field(role),
            terminal => Ok(terminal),
        };

        next.unwrap_or_else(|err| {
            debug!(target: "session", error = %err, "prompt ended the session");
            SessionState::Aborted
        })
    }

    pub fn fields(&self) -> &[TagField] {
        &self.fields
    }

    fn select_match(&mut self) -> Result<SessionState, PromptError> {
        let items: Vec<String> = self
            .candidates
            .iter()
            .map(|candidate| sanitized(candidate).to_string())
            .collect();

        let label = format!("Select match for: {}", self.file_label);
        let index = self.prompter.select_one(&label, &items)?;
        let chosen = self
            .candidates
            .get(index)
            .ok_or_else(|| PromptError::Terminal(format!("no candidate at index {index}")))?;

        let chosen = sanitized(chosen);
        self.fields = vec![
            TagField::new(TagRole::Artist, chosen.artist, sanitize(&self.current.artist)),
            TagField::new(TagRole::SongName, chosen.song_name, sanitize(&self.current.title)),
            TagField::new(TagRole::Album, chosen.album, sanitize(&self.current.album)),
        ];

        Ok(SessionState::EditMenu)
    }

    fn edit_menu(&mut self) -> Result<SessionState, PromptError> {
        let items: Vec<String> = TagRole::MENU
            .iter()
            .map(|role| match self.field(*role) {
                Some(field) => field.to_string(),
                None => role.label().to_string(),
            })
            .collect();

        let label = format!("Edit tags for: {}", self.file_label);
        let index = self.prompter.select_one(&label, &items)?;

        match TagRole::MENU.get(index) {
            Some(TagRole::Commit) => Ok(SessionState::Committed(self.edited_tags())),
            Some(role) => Ok(SessionState::EditField(*role)),
            None => Err(PromptError::Terminal(format!("no menu entry at index {index}"))),
        }
    }

    fn edit_field(&mut self, role: TagRole) -> Result<SessionState, PromptError> {
        let default_value = self
            .field(role)
            .map(|field| field.new_value.clone())
            .unwrap_or_default();

        let new_value = self.prompter.edit_value(role.label(), &default_value)?;

        if let Some(field) = self.fields.iter_mut().find(|field| field.role() == role) {
            field.new_value = sanitize(&new_value);
        }

        Ok(SessionState::EditMenu)
    }

    fn commit<S: TagStore>(
        &self,
        tags: TrackTags,
        store: &S,
        path: &Path,
        handle: &mut S::Handle,
    ) -> Result<SessionOutcome, TagStoreError> {
        let tags = TrackTags::new(
            sanitize(&tags.artist),
            sanitize(&tags.title),
            sanitize(&tags.album),
        );

        handle.apply(&tags);
        handle.save()?;
        info!(
            target: "session",
            file = self.file_label,
            artist = %tags.artist,
            title = %tags.title,
            album = %tags.album,
            "tags saved"
        );

        let renamed_to = if self.policy.rename_on_commit {
            let new_name = tags.file_name();
            match store.rename(path, &new_name) {
                Ok(new_path) => {
                    info!(target: "session", "renamed file from \"{}\" to \"{}\"", self.file_label, new_name);
                    Some(new_path)
                }
                Err(err) => {
                    warn!(target: "session", error = %err, "rename failed, tags were saved");
                    None
                }
            }
        } else {
            None
        };

        Ok(SessionOutcome::Committed { tags, renamed_to })
    }

    fn field(&self, role: TagRole) -> Option<&TagField> {
        self.fields.iter().find(|field| field.role() == role)
    }

    fn edited_tags(&self) -> TrackTags {
        let value = |role| {
            self.field(role)
                .map(|field| field.new_value.clone())
                .unwrap_or_default()
        };
        TrackTags::new(
            value(TagRole::Artist),
            value(TagRole::SongName),
            value(TagRole::Album),
        )
    }
}

fn sanitized(candidate: &MatchCandidate) -> MatchCandidate {
    MatchCandidate {
        artist: sanitize(&candidate.artist),
        song_name: sanitize(&candidate.song_name),
        album: sanitize(&candidate.album),
        ..candidate.clone()
    }
}
