// SPDX-License-Identifier: GPL-3.0-or-later

//! `TagStore` backed by lofty.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use fingertag_application::{TagHandle, TagStore, TagStoreError};
use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::Tag;
use tracing::{debug, info};

/// Reads and writes tags of files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    pub fn new() -> Self {
        Self
    }
}

impl TagStore for LoftyTagStore {
    type Handle = LoftyTagHandle;

    fn open(&self, path: &Path) -> Result<Self::Handle, TagStoreError> {
        let tagged_file = lofty::read_from_path(path).map_err(|e| TagStoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .cloned();
        debug!(
            target: "tags",
            path = %path.display(),
            has_tag = tag.is_some(),
            "opened tags"
        );

        Ok(LoftyTagHandle {
            path: path.to_path_buf(),
            primary_tag_type: tagged_file.primary_tag_type(),
            tag,
            closed: false,
        })
    }

    fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, TagStoreError> {
        let safe_name = new_name.replace(['/', '\\'], "-");
        let target = path.with_file_name(&safe_name);

        if target != path && target.exists() {
            return Err(TagStoreError::Rename {
                path: path.display().to_string(),
                new_name: safe_name,
                message: "target already exists".to_string(),
            });
        }

        std::fs::rename(path, &target).map_err(|e| TagStoreError::Rename {
            path: path.display().to_string(),
            new_name: safe_name.clone(),
            message: e.to_string(),
        })?;

        info!(target: "tags", from = %path.display(), to = %target.display(), "renamed file");
        Ok(target)
    }
}

/// Tag of one file held in memory until saved.
pub struct LoftyTagHandle {
    path: PathBuf,
    primary_tag_type: lofty::tag::TagType,
    tag: Option<Tag>,
    closed: bool,
}

impl fmt::Debug for LoftyTagHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoftyTagHandle")
            .field("path", &self.path)
            .field("primary_tag_type", &self.primary_tag_type)
            .field("has_tag", &self.tag.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

impl LoftyTagHandle {
    fn get(&self, read: impl Fn(&Tag) -> Option<Cow<'_, str>>) -> String {
        self.tag
            .as_ref()
            .and_then(|tag| read(tag))
            .map(|value| value.into_owned())
            .unwrap_or_default()
    }

    fn tag_mut(&mut self) -> Option<&mut Tag> {
        if self.closed {
            return None;
        }
        let tag_type = self.primary_tag_type;
        Some(self.tag.get_or_insert_with(|| Tag::new(tag_type)))
    }
}

impl TagHandle for LoftyTagHandle {
    fn artist(&self) -> String {
        self.get(|tag| tag.artist())
    }

    fn title(&self) -> String {
        self.get(|tag| tag.title())
    }

    fn album(&self) -> String {
        self.get(|tag| tag.album())
    }

    fn set_artist(&mut self, value: &str) {
        if let Some(tag) = self.tag_mut() {
            tag.set_artist(value.to_string());
        }
    }

    fn set_title(&mut self, value: &str) {
        if let Some(tag) = self.tag_mut() {
            tag.set_title(value.to_string());
        }
    }

    fn set_album(&mut self, value: &str) {
        if let Some(tag) = self.tag_mut() {
            tag.set_album(value.to_string());
        }
    }

    fn save(&mut self) -> Result<(), TagStoreError> {
        if self.closed {
            return Err(TagStoreError::Save(format!(
                "{} is already closed",
                self.path.display()
            )));
        }
        let Some(tag) = self.tag.as_ref() else {
            return Ok(());
        };

        tag.save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| TagStoreError::Save(format!("{}: {e}", self.path.display())))?;

        debug!(target: "tags", path = %self.path.display(), "saved tags");
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.tag = None;
        }
    }
}
