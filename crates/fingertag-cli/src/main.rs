// SPDX-License-Identifier: GPL-3.0-or-later
mod prompter;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fingertag_application::{FileTagger, TaggingPolicy};
use fingertag_config::{load as load_config, AppConfig, FPCALC_PATH_ENV};
use fingertag_fingerprint::{resolve_fpcalc_path, AcoustidClient, FpcalcFingerprinter};
use fingertag_infrastructure::{list_audio_files, LoftyTagStore};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::prompter::TerminalPrompter;

/// Identify mp3 files by their acoustic fingerprint and fix their tags.
#[derive(Parser, Debug)]
#[command(name = "fingertag", version)]
struct Args {
    /// An mp3 file or a directory of mp3 files
    #[arg(default_value = ".")]
    path: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// AcoustID application key
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Save a lone match without asking
    #[arg(long)]
    auto_handle_single_match: bool,

    /// Rename files to "<artist> - <song>.mp3" after saving
    #[arg(long)]
    rename_files: bool,

    /// Maximum difference in seconds between file and recording length
    #[arg(long, value_name = "SECS")]
    song_length_difference: Option<u32>,

    /// Skip files without matches instead of guessing from the file name
    #[arg(long)]
    no_filename_fallback: bool,
}

impl Args {
    /// Absent flags keep the loaded value.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(api_key) = &self.api_key {
            config.acoustid.api_key = Some(api_key.clone());
        }
        if self.auto_handle_single_match {
            config.tagging.auto_select_single = true;
        }
        if self.rename_files {
            config.tagging.rename_on_commit = true;
        }
        if let Some(secs) = self.song_length_difference {
            config.tagging.duration_tolerance_secs = secs;
        }
        if self.no_filename_fallback {
            config.tagging.fallback_to_filename = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    init_tracing(&config.telemetry.log_level);
    info!(
        target: "config",
        config_file = ?args.config,
        log_level = %config.telemetry.log_level,
        duration_tolerance_secs = config.tagging.duration_tolerance_secs,
        auto_select_single = config.tagging.auto_select_single,
        rename_on_commit = config.tagging.rename_on_commit,
        fallback_to_filename = config.tagging.fallback_to_filename,
        "configuration loaded"
    );

    let fpcalc = resolve_fpcalc_path(config.fpcalc.path.as_deref());
    if !fpcalc.exists() {
        bail!(
            "fpcalc not found at {}; install Chromaprint or set {FPCALC_PATH_ENV}",
            fpcalc.display()
        );
    }
    info!(target: "cli", fpcalc = %fpcalc.display(), "using fpcalc");

    let api_key = config
        .acoustid
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .context("an AcoustID API key is required (--api-key or FINGERTAG_ACOUSTID__API_KEY)")?;

    let lookup = AcoustidClient::builder(api_key)
        .base_url(config.acoustid.base_url.clone())
        .timeout(Duration::from_secs(config.acoustid.timeout_secs))
        .build()?;

    let files = list_audio_files(&args.path)?;
    if files.is_empty() {
        warn!(target: "cli", path = %args.path.display(), "no mp3 files found");
        return Ok(());
    }

    let mut tagger = FileTagger::new(
        FpcalcFingerprinter::new(fpcalc),
        lookup,
        LoftyTagStore::new(),
        TerminalPrompter::new()?,
        TaggingPolicy::from(&config.tagging),
    );

    let summary = tagger.process_files(&files).await;
    info!(
        target: "cli",
        "processed {} files: {} saved, {} aborted, {} without match, {} failed",
        summary.total(),
        summary.committed,
        summary.aborted,
        summary.no_match,
        summary.failed
    );

    Ok(())
}

/// Logs go to stderr so they do not interleave with prompts.
fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
