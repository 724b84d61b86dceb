//! Compile-time embedded Seattle sample bundle.
//!
//! Each entry is a `(file_name, content)` pair embedded via `include_str!`.
//! The manifest refers to files by these names.

use seattle_access_models::DataBundle;

use crate::DataError;
use crate::manifest::DataManifest;

/// Number of embedded data files, excluding the manifest. Enforced by a test.
#[cfg(test)]
const EXPECTED_FILE_COUNT: usize = 9;

const SAMPLE_MANIFEST: &str = include_str!("../sample/manifest.toml");

/// Embedded `GeoJSON` files.
const SAMPLE_FILES: &[(&str, &str)] = &[
    ("boundary.geojson", include_str!("../sample/boundary.geojson")),
    (
        "groceries_2015.geojson",
        include_str!("../sample/groceries_2015.geojson"),
    ),
    (
        "groceries_2025.geojson",
        include_str!("../sample/groceries_2025.geojson"),
    ),
    (
        "pharmacies_2015.geojson",
        include_str!("../sample/pharmacies_2015.geojson"),
    ),
    (
        "pharmacies_2025.geojson",
        include_str!("../sample/pharmacies_2025.geojson"),
    ),
    (
        "markets_2015.geojson",
        include_str!("../sample/markets_2015.geojson"),
    ),
    (
        "markets_2025.geojson",
        include_str!("../sample/markets_2025.geojson"),
    ),
    (
        "population_2015.geojson",
        include_str!("../sample/population_2015.geojson"),
    ),
    (
        "population_2025.geojson",
        include_str!("../sample/population_2025.geojson"),
    ),
];

/// The embedded sample manifest.
///
/// # Errors
///
/// Returns an error if the embedded manifest fails to parse.
pub fn sample_manifest() -> Result<DataManifest, DataError> {
    DataManifest::from_toml(SAMPLE_MANIFEST)
}

/// Looks up an embedded file by the name the manifest uses.
///
/// # Errors
///
/// Returns [`DataError::MissingFile`] if no file is embedded under `name`.
pub fn sample_file(name: &str) -> Result<&'static str, DataError> {
    SAMPLE_FILES
        .iter()
        .find(|(file_name, _)| *file_name == name)
        .map(|(_, content)| *content)
        .ok_or_else(|| DataError::MissingFile {
            path: name.to_string(),
        })
}

/// Loads the embedded Seattle sample bundle.
///
/// # Errors
///
/// Returns an error if any embedded file fails to parse.
pub fn seattle_sample() -> Result<DataBundle, DataError> {
    sample_manifest()?.assemble(|name| sample_file(name).map(str::to_string))
}
