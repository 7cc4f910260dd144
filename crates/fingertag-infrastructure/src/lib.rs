// SPDX-License-Identifier: GPL-3.0-or-later
pub mod library;
pub mod tag_store;

pub use library::list_audio_files;
pub use tag_store::{LoftyTagHandle, LoftyTagStore};
