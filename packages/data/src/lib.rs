#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading of year-keyed `GeoJSON` bundles.
//!
//! A bundle is described by a TOML [`manifest::DataManifest`] listing the
//! boundary file and one `GeoJSON` file per (category, year) pair. Bundles
//! load either from disk ([`manifest::load_from_path`]) or from the sample
//! compiled into the binary ([`sample::seattle_sample`]).

pub mod manifest;
pub mod sample;

use seattle_access::AccessError;
use thiserror::Error;

/// Errors that can occur while loading a data bundle.
#[derive(Debug, Error)]
pub enum DataError {
    /// A manifest-listed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest TOML is malformed.
    #[error("Manifest error: {0}")]
    Manifest(#[from] toml::de::Error),

    /// A listed file is not usable `GeoJSON` for its role.
    #[error("Invalid data in {path}: {source}")]
    Access {
        /// File that failed to parse.
        path: String,
        /// Underlying parse error.
        source: AccessError,
    },

    /// A listed file is not part of the embedded sample.
    #[error("Missing embedded file '{path}'")]
    MissingFile {
        /// Requested file name.
        path: String,
    },
}
