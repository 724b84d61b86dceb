#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Access coverage and desert calculator.
//!
//! Turns year-keyed point-of-interest data, a buffer radius, and
//! per-category toggles into a coverage polygon (the union of every
//! enabled buffer) and a desert polygon (the city boundary minus that
//! coverage). The pipeline runs synchronously:
//!
//! 1. [`input`] selects the year slice and decides which categories count.
//! 2. [`coverage`] buffers every point and folds the buffers with
//!    [`geo::BooleanOps::union`].
//! 3. [`desert`] subtracts the coverage from the boundary.
//! 4. [`controller`] memoizes the last result per input and publishes the
//!    coverage/desert pair atomically.
//!
//! Degenerate geometry never surfaces as an error: offending buffers are
//! skipped and a failed difference falls back to the full boundary, each
//! with a `log::warn!`.

pub mod buffer;
pub mod controller;
pub mod coverage;
pub mod desert;
pub mod input;
pub mod measure;
pub mod output;
pub mod progress;
pub mod service;
pub mod summary;

#[cfg(test)]
mod test_log;

pub use controller::{AccessController, AccessResult, ControllerState, compute_access};
pub use coverage::{CoverageBuilder, CoverageReport, SkipReason, SkippedBuffer, build_coverage};
pub use desert::{DesertDeriver, DesertOutcome, DesertStatus, derive_desert};

use thiserror::Error;

/// Errors that can occur while reading or writing access data.
#[derive(Debug, Error)]
pub enum AccessError {
    /// `GeoJSON` parsing or conversion failed.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// Features were present, but none had geometry usable for their role.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// The boundary input contained no features at all.
    #[error("No boundary feature found")]
    MissingBoundary,
}
