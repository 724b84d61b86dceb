//! TOML manifest schema and bundle assembly.
//!
//! Paths in a manifest are resolved by a caller-supplied reader, so the
//! same assembly code serves files on disk and files embedded with
//! `include_str!`.

use std::path::Path;

use seattle_access::input;
use seattle_access_models::{CoordinateSpace, DataBundle, PoiCategory, YearKey};
use serde::{Deserialize, Serialize};

use crate::DataError;

/// A data bundle description, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataManifest {
    /// Human-readable bundle name.
    pub name: String,
    /// How coordinates in every file are interpreted.
    #[serde(default)]
    pub space: CoordinateSpace,
    /// City boundary file.
    pub boundary: String,
    /// Point-of-interest files, one per (category, year).
    #[serde(default)]
    pub points: Vec<PointLayerEntry>,
    /// Population polygon files, one per year.
    #[serde(default)]
    pub population: Vec<PopulationEntry>,
}

/// One point-of-interest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLayerEntry {
    /// Category of every point in the file.
    pub category: PoiCategory,
    /// Snapshot year.
    pub year: YearKey,
    /// File path, relative to the manifest.
    pub path: String,
}

/// One population polygon file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationEntry {
    /// Snapshot year.
    pub year: YearKey,
    /// File path, relative to the manifest.
    pub path: String,
}

impl DataManifest {
    /// Parses a manifest from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or names an unknown
    /// category or year.
    pub fn from_toml(toml_str: &str) -> Result<Self, DataError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Every file path the manifest references.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.boundary.as_str())
            .chain(self.points.iter().map(|entry| entry.path.as_str()))
            .chain(self.population.iter().map(|entry| entry.path.as_str()))
    }

    /// Reads and parses every listed file through `read`.
    ///
    /// Entries repeating a (category, year) pair are appended to the
    /// existing collection.
    ///
    /// # Errors
    ///
    /// Returns the first read or parse error encountered.
    pub fn assemble<F>(&self, mut read: F) -> Result<DataBundle, DataError>
    where
        F: FnMut(&str) -> Result<String, DataError>,
    {
        let access_err = |path: &str| {
            let path = path.to_string();
            move |source| DataError::Access { path, source }
        };

        let mut bundle = DataBundle {
            space: self.space,
            city_boundary: input::parse_boundary(&read(&self.boundary)?)
                .map_err(access_err(&self.boundary))?,
            ..DataBundle::default()
        };

        for entry in &self.points {
            let points = input::parse_points(&read(&entry.path)?, entry.category)
                .map_err(access_err(&entry.path))?;
            log::debug!(
                "Loaded {} {} points for {} from {}",
                points.len(),
                entry.category,
                entry.year,
                entry.path
            );
            bundle
                .points_mut(entry.category)
                .entry_or_default(entry.year)
                .extend(points);
        }

        for entry in &self.population {
            let polygons =
                input::parse_polygons(&read(&entry.path)?).map_err(access_err(&entry.path))?;
            bundle
                .population
                .entry_or_default(entry.year)
                .extend(polygons);
        }

        log::info!(
            "Loaded bundle '{}' ({} point files, {} population files)",
            self.name,
            self.points.len(),
            self.population.len()
        );

        Ok(bundle)
    }
}

/// Loads a manifest from disk and every file it lists, resolving paths
/// relative to the manifest's directory.
///
/// # Errors
///
/// Returns an error if any file cannot be read or parsed.
pub fn load_from_path(manifest_path: &Path) -> Result<DataBundle, DataError> {
    let read_file = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.display().to_string(),
            source,
        })
    };

    let manifest = DataManifest::from_toml(&read_file(manifest_path)?)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    manifest.assemble(|relative| read_file(&base.join(relative)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        name = "test"
        space = "planar"
        boundary = "boundary.geojson"

        [[points]]
        category = "grocery"
        year = 2025
        path = "groceries.geojson"

        [[points]]
        category = "grocery"
        year = 2025
        path = "more_groceries.geojson"
    "#;

    const BOUNDARY: &str = r#"{"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#;

    fn point(name: &str, x: f64) -> String {
        format!(
            r#"{{"type": "Feature", "properties": {{"name": "{name}"}},
                "geometry": {{"type": "Point", "coordinates": [{x}, 1.0]}}}}"#
        )
    }

    fn reader(path: &str) -> Result<String, DataError> {
        match path {
            "boundary.geojson" => Ok(BOUNDARY.to_string()),
            "groceries.geojson" => Ok(point("a", 1.0)),
            "more_groceries.geojson" => Ok(point("b", 2.0)),
            other => Err(DataError::MissingFile {
                path: other.to_string(),
            }),
        }
    }

    #[test]
    fn assembles_and_appends_repeated_entries() {
        let manifest = DataManifest::from_toml(MANIFEST).unwrap();
        let bundle = manifest.assemble(reader).unwrap();

        assert_eq!(bundle.space, CoordinateSpace::Planar);
        let names: Vec<_> = bundle
            .groceries
            .slice(YearKey::Y2025)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(bundle.pharmacies.is_empty());
    }

    #[test]
    fn unknown_year_is_rejected() {
        let bad = MANIFEST.replace("2025", "2021");
        assert!(matches!(
            DataManifest::from_toml(&bad),
            Err(DataError::Manifest(_))
        ));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let manifest = DataManifest::from_toml(MANIFEST).unwrap();
        let err = manifest
            .assemble(|path| {
                if path == "groceries.geojson" {
                    Ok("{ not geojson".to_string())
                } else {
                    reader(path)
                }
            })
            .unwrap_err();
        assert!(
            matches!(&err, DataError::Access { path, .. } if path == "groceries.geojson"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn loads_from_disk_relative_to_manifest() {
        let dir = std::env::temp_dir().join(format!("seattle_access_manifest_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("manifest.toml"), MANIFEST).unwrap();
        std::fs::write(dir.join("boundary.geojson"), BOUNDARY).unwrap();
        std::fs::write(dir.join("groceries.geojson"), point("a", 1.0)).unwrap();
        std::fs::write(dir.join("more_groceries.geojson"), point("b", 2.0)).unwrap();

        let bundle = load_from_path(&dir.join("manifest.toml")).unwrap();
        assert_eq!(bundle.groceries.slice(YearKey::Y2025).len(), 2);

        std::fs::remove_file(dir.join("groceries.geojson")).unwrap();
        let err = load_from_path(&dir.join("manifest.toml")).unwrap_err();
        assert!(matches!(err, DataError::Read { .. }), "unexpected error: {err}");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
