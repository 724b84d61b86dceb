#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map rendering of access results.
//!
//! [`layers::project`] turns an [`seattle_access::AccessResult`] into styled
//! layers in draw order. A [`adapter::MapSession`] draws them on any
//! [`adapter::MapAdapter`]; [`document::GeoJsonDocument`] is the adapter
//! the CLI writes to disk.

pub mod adapter;
pub mod choropleth;
pub mod document;
pub mod layers;
pub mod style;

use thiserror::Error;

/// Errors that can occur while drawing layers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The map backend could not be acquired or was used unmounted.
    #[error("Mount error: {message}")]
    Mount {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
