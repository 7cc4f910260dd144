// SPDX-License-Identifier: GPL-3.0-or-later
pub mod filename_fallback;
pub mod prompter;
pub mod reconcile;
pub mod sanitize;
pub mod session;
pub mod tag_store;
pub mod tagger;

#[cfg(test)]
mod test_support;

pub use filename_fallback::{FilenameFallbackError, ParsedFilename};
pub use prompter::{PromptError, Prompter};
pub use reconcile::{display_artist, reconcile};
pub use sanitize::sanitize;
pub use session::{SessionOutcome, SessionPolicy, SessionState, TagEditSession};
pub use tag_store::{TagHandle, TagStore, TagStoreError};
pub use tagger::{FileOutcome, FileTagger, ProcessError, ProcessResult, RunSummary, TaggingPolicy};
