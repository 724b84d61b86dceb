//! Tagged style descriptors and the fixed palettes behind them.
//!
//! Every drawable feature carries a [`StyleDescriptor`]; the descriptor
//! alone decides its color and opacity.

use geojson::JsonObject;
use seattle_access_models::{PoiCategory, ServiceLevel};
use serde::Serialize;

use crate::choropleth::DensityClass;

/// Stroke and fill of a polygon overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Outline color.
    pub color: &'static str,
    /// Outline width in pixels.
    pub weight: f64,
    /// Interior color.
    pub fill_color: &'static str,
    /// Interior opacity in `[0, 1]`.
    pub fill_opacity: f64,
}

/// Circle marker drawn for a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    /// Marker radius in pixels.
    pub radius: f64,
    /// Outline and fill color.
    pub color: &'static str,
    /// Outline width in pixels.
    pub weight: f64,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
}

/// Green coverage overlay.
pub const COVERAGE_STYLE: PathStyle = PathStyle {
    color: "#16a34a",
    weight: 1.0,
    fill_color: "#22c55e",
    fill_opacity: 0.15,
};

/// Dark desert overlay.
pub const DESERT_STYLE: PathStyle = PathStyle {
    color: "#111827",
    weight: 0.6,
    fill_color: "#111827",
    fill_opacity: 0.08,
};

const DENSITY_OUTLINE: &str = "#666";
const SERVICE_OUTLINE: &str = "#ffffff";
const UNDERSERVED_OUTLINE: &str = "#dc2626";

/// Fill color for a service classification.
#[must_use]
pub const fn service_color(level: ServiceLevel) -> &'static str {
    match level {
        ServiceLevel::BothServices => "#22c55e",
        ServiceLevel::GroceryOnly | ServiceLevel::PharmacyOnly => "#f59e0b",
        ServiceLevel::Neither => "#ef4444",
    }
}

/// Marker color for a category.
#[must_use]
pub const fn poi_color(category: PoiCategory) -> &'static str {
    match category {
        PoiCategory::Grocery => "#1f9d55",
        PoiCategory::Pharmacy => "#e3342f",
        PoiCategory::Market => "#f59e0b",
    }
}

/// What a feature is, which fixes how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleDescriptor {
    /// Population polygon in a density class.
    Density(DensityClass),
    /// Population polygon classified by service reach.
    Service(ServiceLevel),
    /// Uncovered part of the boundary.
    Desert,
    /// Union of all enabled buffers.
    Coverage,
    /// A point of interest.
    Poi(PoiCategory),
}

/// Resolved style of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedStyle {
    /// Polygon outline and fill.
    Path(PathStyle),
    /// Circle marker.
    Marker(MarkerStyle),
}

impl StyleDescriptor {
    /// Resolves the descriptor to its concrete style.
    #[must_use]
    pub const fn resolve(self) -> ResolvedStyle {
        match self {
            Self::Density(class) => ResolvedStyle::Path(PathStyle {
                color: DENSITY_OUTLINE,
                weight: 0.5,
                fill_color: class.color(),
                fill_opacity: 0.55,
            }),
            Self::Service(level) => ResolvedStyle::Path(PathStyle {
                color: if matches!(level, ServiceLevel::Neither) {
                    UNDERSERVED_OUTLINE
                } else {
                    SERVICE_OUTLINE
                },
                weight: 1.0,
                fill_color: service_color(level),
                fill_opacity: 0.6,
            }),
            Self::Desert => ResolvedStyle::Path(DESERT_STYLE),
            Self::Coverage => ResolvedStyle::Path(COVERAGE_STYLE),
            Self::Poi(category) => ResolvedStyle::Marker(MarkerStyle {
                radius: 5.0,
                color: poi_color(category),
                weight: 1.0,
                fill_opacity: 0.9,
            }),
        }
    }

    /// `simplestyle` properties for `GeoJSON` viewers.
    #[must_use]
    pub fn simplestyle(self) -> JsonObject {
        let mut props = JsonObject::new();
        match self.resolve() {
            ResolvedStyle::Path(path) => {
                props.insert("stroke".to_string(), path.color.into());
                props.insert("stroke-width".to_string(), path.weight.into());
                props.insert("fill".to_string(), path.fill_color.into());
                props.insert("fill-opacity".to_string(), path.fill_opacity.into());
            }
            ResolvedStyle::Marker(marker) => {
                props.insert("marker-color".to_string(), marker.color.into());
                props.insert("marker-size".to_string(), "small".into());
            }
        }
        props
    }
}
