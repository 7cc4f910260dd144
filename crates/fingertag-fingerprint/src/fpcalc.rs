// SPDX-License-Identifier: GPL-3.0-or-later

//! Fingerprint generation through Chromaprint's `fpcalc` command-line tool.
//!
//! `fpcalc -json <file>` prints the track duration (fractional seconds) and
//! the compressed fingerprint. The duration is truncated to whole seconds,
//! which is what the lookup service expects.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::service::Fingerprinter;
use crate::{Fingerprint, FingerprintError, Result};

const FPCALC_BINARY: &str = "fpcalc";

#[derive(Debug, Deserialize)]
struct FpcalcOutput {
    duration: f64,
    fingerprint: String,
}

/// Runs `fpcalc` as a subprocess for every file.
#[derive(Debug, Clone)]
pub struct FpcalcFingerprinter {
    binary: PathBuf,
}

impl FpcalcFingerprinter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait::async_trait]
impl Fingerprinter for FpcalcFingerprinter {
    #[instrument(skip(self), fields(file = %path.display()))]
    async fn fingerprint(&self, path: &Path) -> Result<Fingerprint> {
        let output = Command::new(&self.binary)
            .arg("-json")
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                FingerprintError::FpcalcFailed(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FingerprintError::FpcalcFailed(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let fingerprint = parse_output(&output.stdout)?;
        debug!(
            target: "fingerprint",
            duration = fingerprint.duration,
            "fingerprint generated"
        );
        Ok(fingerprint)
    }
}

/// Parse the JSON document printed by `fpcalc -json`.
pub fn parse_output(stdout: &[u8]) -> Result<Fingerprint> {
    let output: FpcalcOutput = serde_json::from_slice(stdout)
        .map_err(|e| FingerprintError::MalformedOutput(format!("invalid JSON from fpcalc: {}", e)))?;

    if !output.duration.is_finite() || output.duration < 0.0 {
        return Err(FingerprintError::MalformedOutput(format!(
            "invalid duration: {}",
            output.duration
        )));
    }

    let fingerprint = Fingerprint::new(output.fingerprint, output.duration as u32);
    fingerprint.validate()?;
    Ok(fingerprint)
}

/// Locate the `fpcalc` binary.
///
/// Resolution order:
/// 1. The configured path (config file, `FINGERTAG_FPCALC__PATH` or `FPCALC_BINARY_PATH`)
/// 2. The first `fpcalc` executable found on `PATH`
/// 3. `./fpcalc` in the working directory
pub fn resolve_fpcalc_path(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    env::var_os("PATH")
        .and_then(|paths| find_in_dirs(env::split_paths(&paths)))
        .unwrap_or_else(|| Path::new(".").join(binary_name()))
}

fn find_in_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(binary_name()))
        .find(|candidate| candidate.is_file())
}

fn binary_name() -> String {
    format!("{}{}", FPCALC_BINARY, env::consts::EXE_SUFFIX)
}
