// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FingerprintError>;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("fpcalc failed: {0}")]
    FpcalcFailed(String),

    #[error("Malformed fpcalc output: {0}")]
    MalformedOutput(String),

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("AcoustID lookup failed: {0}")]
    LookupFailed(String),

    #[error("Invalid response from AcoustID API: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FingerprintError {
    /// Whether the failure happened while talking to the lookup service rather
    /// than while fingerprinting the file.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            FingerprintError::RequestFailed(_)
                | FingerprintError::LookupFailed(_)
                | FingerprintError::InvalidResponse(_)
                | FingerprintError::SerializationError(_)
        )
    }
}
