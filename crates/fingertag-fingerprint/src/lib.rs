// SPDX-License-Identifier: GPL-3.0-or-later

//! Audio fingerprinting and AcoustID lookup for music identification.
//!
//! This crate provides:
//! - Fingerprint generation by running the Chromaprint `fpcalc` tool
//! - AcoustID lookups returning recordings and their release groups
//! - The [`Fingerprinter`] and [`LookupService`] seams the tagger depends on

pub mod acoustid;
pub mod error;
pub mod fingerprint;
pub mod fpcalc;
pub mod models;
pub mod service;

pub use acoustid::{AcoustidClient, AcoustidClientBuilder};
pub use error::{FingerprintError, Result};
pub use fingerprint::Fingerprint;
pub use fpcalc::{resolve_fpcalc_path, FpcalcFingerprinter};
pub use models::{Artist, LookupResponse, LookupResult, Recording, ReleaseGroup};
pub use service::{Fingerprinter, LookupService};
