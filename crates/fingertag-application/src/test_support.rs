// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;
use fingertag_domain::TrackTags;
use fingertag_fingerprint::{
    Fingerprint, FingerprintError, Fingerprinter, LookupResponse, LookupService,
};

use crate::prompter::{PromptError, Prompter};
use crate::tag_store::{TagHandle, TagStore, TagStoreError};

// ============================================================================
// Prompter
// ============================================================================

#[derive(Debug, Clone)]
pub enum Reply {
    Select(usize),
    Edit(String),
    Cancel,
}

/// Replays a fixed list of operator answers and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<Reply>,
    select_items: Vec<Vec<String>>,
    edit_defaults: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            ..Default::default()
        }
    }

    pub fn select_calls(&self) -> usize {
        self.select_items.len()
    }

    pub fn select_items(&self) -> &[Vec<String>] {
        &self.select_items
    }

    pub fn edit_defaults(&self) -> Vec<&str> {
        self.edit_defaults.iter().map(String::as_str).collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn select_one(&mut self, _label: &str, items: &[String]) -> Result<usize, PromptError> {
        self.select_items.push(items.to_vec());
        match self.replies.pop_front() {
            Some(Reply::Select(index)) => Ok(index),
            Some(Reply::Cancel) | None => Err(PromptError::Cancelled),
            Some(other) => panic!("select_one called but next reply is {other:?}"),
        }
    }

    fn edit_value(&mut self, _label: &str, default_value: &str) -> Result<String, PromptError> {
        self.edit_defaults.push(default_value.to_string());
        match self.replies.pop_front() {
            Some(Reply::Edit(value)) => Ok(value),
            Some(Reply::Cancel) | None => Err(PromptError::Cancelled),
            Some(other) => panic!("edit_value called but next reply is {other:?}"),
        }
    }
}

// ============================================================================
// Tag store
// ============================================================================

#[derive(Debug, Default)]
struct StoreState {
    files: HashMap<PathBuf, TrackTags>,
    saved: HashMap<PathBuf, TrackTags>,
    renames: Vec<String>,
    opened: usize,
    closed: usize,
    fail_save: bool,
    fail_rename: bool,
}

/// Tag store backed by a map; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryTagStore {
    state: Rc<RefCell<StoreState>>,
}

impl MemoryTagStore {
    pub fn with_file(path: impl Into<PathBuf>, tags: TrackTags) -> Self {
        let store = Self::default();
        store.add_file(path, tags);
        store
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, tags: TrackTags) {
        self.state.borrow_mut().files.insert(path.into(), tags);
    }

    pub fn fail_save(&self) {
        self.state.borrow_mut().fail_save = true;
    }

    pub fn fail_rename(&self) {
        self.state.borrow_mut().fail_rename = true;
    }

    /// Tags written by the last successful save of `path`.
    pub fn saved(&self, path: impl AsRef<Path>) -> Option<TrackTags> {
        self.state.borrow().saved.get(path.as_ref()).cloned()
    }

    /// Tags currently stored for `path`.
    pub fn stored(&self, path: impl AsRef<Path>) -> Option<TrackTags> {
        self.state.borrow().files.get(path.as_ref()).cloned()
    }

    pub fn renames(&self) -> Vec<String> {
        self.state.borrow().renames.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state.borrow().opened
    }

    pub fn close_count(&self) -> usize {
        self.state.borrow().closed
    }
}

impl TagStore for MemoryTagStore {
    type Handle = MemoryTagHandle;

    fn open(&self, path: &Path) -> Result<Self::Handle, TagStoreError> {
        let mut state = self.state.borrow_mut();
        let tags = state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| TagStoreError::Open {
                path: path.display().to_string(),
                message: "no such file".to_string(),
            })?;
        state.opened += 1;

        Ok(MemoryTagHandle {
            path: path.to_path_buf(),
            pending: tags,
            state: Rc::clone(&self.state),
            closed: false,
        })
    }

    fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, TagStoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail_rename {
            return Err(TagStoreError::Rename {
                path: path.display().to_string(),
                new_name: new_name.to_string(),
                message: "read-only directory".to_string(),
            });
        }

        state.renames.push(new_name.to_string());
        let target = path.with_file_name(new_name);
        if let Some(tags) = state.files.remove(path) {
            state.files.insert(target.clone(), tags);
        }
        Ok(target)
    }
}

#[derive(Debug)]
pub struct MemoryTagHandle {
    path: PathBuf,
    pending: TrackTags,
    state: Rc<RefCell<StoreState>>,
    closed: bool,
}

impl TagHandle for MemoryTagHandle {
    fn artist(&self) -> String {
        self.pending.artist.clone()
    }

    fn title(&self) -> String {
        self.pending.title.clone()
    }

    fn album(&self) -> String {
        self.pending.album.clone()
    }

    fn set_artist(&mut self, value: &str) {
        self.pending.artist = value.to_string();
    }

    fn set_title(&mut self, value: &str) {
        self.pending.title = value.to_string();
    }

    fn set_album(&mut self, value: &str) {
        self.pending.album = value.to_string();
    }

    fn save(&mut self) -> Result<(), TagStoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail_save {
            return Err(TagStoreError::Save("disk full".to_string()));
        }
        state.files.insert(self.path.clone(), self.pending.clone());
        state.saved.insert(self.path.clone(), self.pending.clone());
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.borrow_mut().closed += 1;
        }
    }
}

// ============================================================================
// Fingerprinting and lookup
// ============================================================================

/// Returns the same fingerprint for every path, or fails when `None`.
pub struct CannedFingerprinter {
    fingerprint: Option<Fingerprint>,
    calls: Mutex<Vec<PathBuf>>,
}

impl CannedFingerprinter {
    pub fn new(duration: u32) -> Self {
        Self {
            fingerprint: Some(Fingerprint::new("AQADtEmUaEkSRZEGAA", duration)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fingerprint: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fingerprinter for CannedFingerprinter {
    async fn fingerprint(&self, path: &Path) -> fingertag_fingerprint::Result<Fingerprint> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.fingerprint
            .clone()
            .ok_or_else(|| FingerprintError::FpcalcFailed("not an audio file".to_string()))
    }
}

/// Returns a fixed lookup response, or fails when `None`.
pub struct CannedLookup {
    response: Option<LookupResponse>,
}

impl CannedLookup {
    pub fn new(response: LookupResponse) -> Self {
        Self {
            response: Some(response),
        }
    }

    pub fn empty() -> Self {
        Self::new(LookupResponse::default())
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl LookupService for CannedLookup {
    async fn lookup(&self, _fingerprint: &Fingerprint) -> fingertag_fingerprint::Result<LookupResponse> {
        self.response
            .clone()
            .ok_or_else(|| FingerprintError::LookupFailed("HTTP 503: unavailable".to_string()))
    }
}
