// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use crate::{Fingerprint, LookupResponse, Result};

/// Produces an acoustic fingerprint and the measured duration of an audio file.
#[async_trait::async_trait]
pub trait Fingerprinter: Send + Sync {
    async fn fingerprint(&self, path: &Path) -> Result<Fingerprint>;
}

/// Resolves a fingerprint into catalog matches.
#[async_trait::async_trait]
pub trait LookupService: Send + Sync {
    async fn lookup(&self, fingerprint: &Fingerprint) -> Result<LookupResponse>;
}
