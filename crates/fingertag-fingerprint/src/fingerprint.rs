// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Audio fingerprint (Chromaprint) together with the measured track length.
///
/// `fpcalc` emits the compressed fingerprint in URL-safe base64, so both the
/// standard and the URL-safe alphabets are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fingerprint {
    /// Chromaprint fingerprint hash (base64-encoded).
    pub hash: String,
    /// Duration of the audio file in whole seconds.
    pub duration: u32,
}

impl Fingerprint {
    /// Create a new fingerprint.
    pub fn new(hash: impl Into<String>, duration: u32) -> Self {
        Self {
            hash: hash.into(),
            duration,
        }
    }

    /// Validate the fingerprint format.
    ///
    /// A valid fingerprint is a non-empty base64 string and the duration is > 0.
    pub fn validate(&self) -> crate::Result<()> {
        if self.hash.is_empty() {
            return Err(crate::FingerprintError::InvalidFingerprint(
                "fingerprint hash is empty".to_string(),
            ));
        }

        if self.duration == 0 {
            return Err(crate::FingerprintError::InvalidFingerprint(
                "duration must be > 0".to_string(),
            ));
        }

        let trimmed = self.hash.trim_end_matches('=');

        let padding_len = self.hash.len() - trimmed.len();
        if padding_len > 2 {
            return Err(crate::FingerprintError::InvalidFingerprint(
                "invalid base64 padding: too many '=' characters".to_string(),
            ));
        }

        if trimmed.contains('=') {
            return Err(crate::FingerprintError::InvalidFingerprint(
                "padding character '=' must only appear at the end".to_string(),
            ));
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '-' | '_'))
        {
            return Err(crate::FingerprintError::InvalidFingerprint(
                "fingerprint contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}
