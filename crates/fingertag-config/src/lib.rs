// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Unprefixed environment variable also accepted for `fpcalc.path`.
pub const FPCALC_PATH_ENV: &str = "FPCALC_BINARY_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// Recordings whose duration differs from the file by more than this are rejected.
    pub duration_tolerance_secs: u32,
    pub auto_select_single: bool,
    pub rename_on_commit: bool,
    pub fallback_to_filename: bool,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            duration_tolerance_secs: 15,
            auto_select_single: false,
            rename_on_commit: false,
            fallback_to_filename: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcoustidConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AcoustidConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.acoustid.org/v2".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FpcalcConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub tagging: TaggingConfig,
    pub acoustid: AcoustidConfig,
    pub fpcalc: FpcalcConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: FINGERTAG_).
///
/// `FPCALC_BINARY_PATH` is honoured as an alias for `fpcalc.path`; the prefixed
/// variable wins when both are set.
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment
        .merge(
            Env::raw()
                .only(&[FPCALC_PATH_ENV])
                .map(|_| "fpcalc.path".into()),
        )
        .merge(Env::prefixed("FINGERTAG_").split("__"));

    let config: AppConfig = figment.extract()?;
    Ok(config)
}
