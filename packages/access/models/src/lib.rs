#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data types shared by the access calculator and its consumers.
//!
//! Point and polygon features, year-keyed slices of them, and the
//! [`ControlState`] the presentation layer hands to the calculator. All
//! geographic data is read-only once loaded; only [`ControlState`] changes
//! at runtime.

use std::collections::BTreeMap;

use geo::{Coord, MultiPolygon};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Snapshot years the data is published for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(try_from = "u16", into = "u16")]
pub enum YearKey {
    /// 2015 baseline.
    #[strum(serialize = "2015")]
    Y2015 = 2015,
    /// 2020 midpoint.
    #[strum(serialize = "2020")]
    Y2020 = 2020,
    /// 2025 current.
    #[default]
    #[strum(serialize = "2025")]
    Y2025 = 2025,
}

impl YearKey {
    /// Returns the calendar year.
    #[must_use]
    pub const fn value(self) -> u16 {
        self as u16
    }

    /// Creates a year key from a calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is not one of the published snapshots.
    pub const fn from_value(value: u16) -> Result<Self, InvalidYearError> {
        match value {
            2015 => Ok(Self::Y2015),
            2020 => Ok(Self::Y2020),
            2025 => Ok(Self::Y2025),
            _ => Err(InvalidYearError { value }),
        }
    }

    /// Returns all variants in chronological order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Y2015, Self::Y2020, Self::Y2025]
    }
}

impl TryFrom<u16> for YearKey {
    type Error = InvalidYearError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<YearKey> for u16 {
    fn from(year: YearKey) -> Self {
        year.value()
    }
}

/// Error returned when a calendar year has no published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidYearError {
    /// The year that was provided.
    pub value: u16,
}

impl std::fmt::Display for InvalidYearError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid year {}: expected one of 2015, 2020, 2025",
            self.value
        )
    }
}

impl std::error::Error for InvalidYearError {}

/// A mapping from snapshot year to a value. A missing key means "no data
/// for that year".
#[derive(Debug, Clone, PartialEq)]
pub struct YearMap<T> {
    entries: BTreeMap<YearKey, T>,
}

impl<T> YearMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or replaces the value for `year`.
    pub fn insert(&mut self, year: YearKey, value: T) -> Option<T> {
        self.entries.insert(year, value)
    }

    /// Returns the value for `year`, if any.
    #[must_use]
    pub fn get(&self, year: YearKey) -> Option<&T> {
        self.entries.get(&year)
    }

    /// Returns a mutable reference to the value for `year`, inserting the
    /// default if absent.
    pub fn entry_or_default(&mut self, year: YearKey) -> &mut T
    where
        T: Default,
    {
        self.entries.entry(year).or_default()
    }

    /// Years that have data, in chronological order.
    pub fn years(&self) -> impl Iterator<Item = YearKey> + '_ {
        self.entries.keys().copied()
    }

    /// Returns `true` if no year has data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> YearMap<Vec<T>> {
    /// Returns the collection for `year`, or an empty slice when the year
    /// has no data.
    #[must_use]
    pub fn slice(&self, year: YearKey) -> &[T] {
        self.entries.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<T> Default for YearMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(YearKey, T)> for YearMap<T> {
    fn from_iter<I: IntoIterator<Item = (YearKey, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Point-of-interest categories that contribute to access coverage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PoiCategory {
    /// Full-service grocery stores.
    Grocery,
    /// Pharmacies.
    Pharmacy,
    /// Farmers markets (seasonal, limited hours).
    Market,
}

impl PoiCategory {
    /// Returns all variants in fold order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Grocery, Self::Pharmacy, Self::Market]
    }

    /// Human-readable label used when a feature has no name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grocery => "Grocery store",
            Self::Pharmacy => "Pharmacy",
            Self::Market => "Farmers market",
        }
    }
}

/// How feature coordinates are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Projected coordinates in meters.
    Planar,
    /// Longitude/latitude in degrees (WGS84).
    #[default]
    Geographic,
}

/// A named location with a single coordinate and a category.
///
/// The coordinate may be non-finite when the source feature was malformed;
/// the buffer step rejects such points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    /// Display name (`properties.name`), empty when absent.
    pub name: String,
    /// Category tag.
    pub category: PoiCategory,
    /// Location (x = longitude / easting, y = latitude / northing).
    pub position: Coord<f64>,
}

impl PointFeature {
    /// Creates a point feature.
    #[must_use]
    pub fn new(name: impl Into<String>, category: PoiCategory, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            category,
            position: Coord { x, y },
        }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite()
    }

    /// Name for popups and log lines, falling back to the category label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.category.label()
        } else {
            &self.name
        }
    }
}

/// A closed planar region with optional properties. Always stored as a
/// multipolygon; a single polygon is a one-element multipolygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    /// Region geometry.
    pub geometry: MultiPolygon<f64>,
    /// Arbitrary `GeoJSON` properties carried through from the source.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl PolygonFeature {
    /// Creates a feature with no properties.
    #[must_use]
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    /// Sets a property, returning the updated feature.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Population density (`properties.density`), if present and numeric.
    #[must_use]
    pub fn density(&self) -> Option<f64> {
        self.properties
            .get("density")
            .and_then(serde_json::Value::as_f64)
            .filter(|d| d.is_finite())
    }

    /// Returns `true` if the geometry has no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }
}

impl Default for PolygonFeature {
    fn default() -> Self {
        Self::new(MultiPolygon::new(Vec::new()))
    }
}

/// Which categories the user has switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerVisibility {
    /// Grocery stores shown.
    pub groceries: bool,
    /// Pharmacies shown.
    pub pharmacies: bool,
    /// Farmers markets shown.
    pub markets: bool,
}

impl LayerVisibility {
    /// Returns whether `category` is shown.
    #[must_use]
    pub const fn is_shown(&self, category: PoiCategory) -> bool {
        match category {
            PoiCategory::Grocery => self.groceries,
            PoiCategory::Pharmacy => self.pharmacies,
            PoiCategory::Market => self.markets,
        }
    }

    /// Sets whether `category` is shown.
    pub const fn set_shown(&mut self, category: PoiCategory, shown: bool) {
        match category {
            PoiCategory::Grocery => self.groceries = shown,
            PoiCategory::Pharmacy => self.pharmacies = shown,
            PoiCategory::Market => self.markets = shown,
        }
    }
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            groceries: true,
            pharmacies: true,
            markets: true,
        }
    }
}

/// The UI-facing configuration. The only input that changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    /// Selected snapshot year.
    pub year: YearKey,
    /// Per-category visibility.
    pub enabled: LayerVisibility,
    /// Whether farmers markets count towards access.
    pub include_markets: bool,
    /// Buffer radius in meters.
    pub radius_meters: f64,
}

impl ControlState {
    /// Smallest radius the slider allows.
    pub const RADIUS_MIN: f64 = 200.0;
    /// Largest radius the slider allows.
    pub const RADIUS_MAX: f64 = 2000.0;
    /// Slider step.
    pub const RADIUS_STEP: f64 = 50.0;
    /// Default radius (about half a mile).
    pub const RADIUS_DEFAULT: f64 = 800.0;

    /// Meters per statute mile.
    const METERS_PER_MILE: f64 = 1609.34;

    /// Sets the radius from raw slider input, snapping to the step and
    /// clamping to the slider range. Non-finite input resets to the default.
    pub fn set_radius(&mut self, meters: f64) {
        self.radius_meters = Self::clamp_radius(meters);
    }

    /// Snaps and clamps a raw radius to the slider range.
    #[must_use]
    pub fn clamp_radius(meters: f64) -> f64 {
        if !meters.is_finite() {
            return Self::RADIUS_DEFAULT;
        }
        let snapped = (meters / Self::RADIUS_STEP).round() * Self::RADIUS_STEP;
        snapped.clamp(Self::RADIUS_MIN, Self::RADIUS_MAX)
    }

    /// The radius expressed in miles, for labels.
    #[must_use]
    pub fn radius_miles(&self) -> f64 {
        self.radius_meters / Self::METERS_PER_MILE
    }

    /// Whether `category` contributes to the access calculation.
    ///
    /// Markets must be both shown and explicitly included.
    #[must_use]
    pub const fn contributes(&self, category: PoiCategory) -> bool {
        match category {
            PoiCategory::Market => self.enabled.markets && self.include_markets,
            other => self.enabled.is_shown(other),
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            year: YearKey::Y2025,
            enabled: LayerVisibility::default(),
            include_markets: false,
            radius_meters: Self::RADIUS_DEFAULT,
        }
    }
}

/// Everything the calculator reads: the city boundary plus year-keyed
/// point and population collections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataBundle {
    /// How coordinates are interpreted.
    pub space: CoordinateSpace,
    /// City limits. Not year-keyed.
    pub city_boundary: PolygonFeature,
    /// Population polygons carrying `properties.density`.
    pub population: YearMap<Vec<PolygonFeature>>,
    /// Grocery store locations.
    pub groceries: YearMap<Vec<PointFeature>>,
    /// Pharmacy locations.
    pub pharmacies: YearMap<Vec<PointFeature>>,
    /// Farmers market locations.
    pub markets: YearMap<Vec<PointFeature>>,
}

impl DataBundle {
    /// Returns the year map for `category`.
    #[must_use]
    pub const fn points(&self, category: PoiCategory) -> &YearMap<Vec<PointFeature>> {
        match category {
            PoiCategory::Grocery => &self.groceries,
            PoiCategory::Pharmacy => &self.pharmacies,
            PoiCategory::Market => &self.markets,
        }
    }

    /// Returns the mutable year map for `category`.
    pub const fn points_mut(&mut self, category: PoiCategory) -> &mut YearMap<Vec<PointFeature>> {
        match category {
            PoiCategory::Grocery => &mut self.groceries,
            PoiCategory::Pharmacy => &mut self.pharmacies,
            PoiCategory::Market => &mut self.markets,
        }
    }
}

/// Which services reach an area. Drives the fixed fill color of the
/// service layer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceLevel {
    /// Both a grocery and a pharmacy are within reach.
    BothServices,
    /// Only a grocery is within reach.
    GroceryOnly,
    /// Only a pharmacy is within reach.
    PharmacyOnly,
    /// Neither is within reach.
    Neither,
}

impl ServiceLevel {
    /// Classifies from per-service reachability.
    #[must_use]
    pub const fn from_flags(grocery: bool, pharmacy: bool) -> Self {
        match (grocery, pharmacy) {
            (true, true) => Self::BothServices,
            (true, false) => Self::GroceryOnly,
            (false, true) => Self::PharmacyOnly,
            (false, false) => Self::Neither,
        }
    }
}
