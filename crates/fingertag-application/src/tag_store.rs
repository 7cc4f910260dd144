// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistence seam for the three tag values the tagger edits.

use std::path::{Path, PathBuf};

use fingertag_domain::TrackTags;
use thiserror::Error;

/// Errors raised by a tag store
#[derive(Debug, Error)]
pub enum TagStoreError {
    #[error("Failed to open tags of {path}: {message}")]
    Open { path: String, message: String },

    #[error("Failed to save tags: {0}")]
    Save(String),

    #[error("Failed to rename {path} to {new_name}: {message}")]
    Rename {
        path: String,
        new_name: String,
        message: String,
    },
}

/// Opens tag handles and renames tagged files.
pub trait TagStore {
    type Handle: TagHandle;

    fn open(&self, path: &Path) -> Result<Self::Handle, TagStoreError>;

    /// Rename `path` to `new_name` inside the same directory and return the new path.
    fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, TagStoreError>;
}

/// Exclusive access to the tags of one open file.
pub trait TagHandle {
    fn artist(&self) -> String;
    fn title(&self) -> String;
    fn album(&self) -> String;

    fn set_artist(&mut self, value: &str);
    fn set_title(&mut self, value: &str);
    fn set_album(&mut self, value: &str);

    fn save(&mut self) -> Result<(), TagStoreError>;

    /// Release the handle. Safe to call more than once.
    fn close(&mut self);

    fn current(&self) -> TrackTags {
        TrackTags::new(self.artist(), self.title(), self.album())
    }

    fn apply(&mut self, tags: &TrackTags) {
        self.set_artist(&tags.artist);
        self.set_title(&tags.title);
        self.set_album(&tags.album);
    }
}
