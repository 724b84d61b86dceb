//! Projection of an [`AccessResult`] into styled map layers.

use geojson::{Feature, JsonObject};
use seattle_access::service::classify_areas;
use seattle_access::{AccessResult, input, output};
use seattle_access_models::{ControlState, DataBundle, PoiCategory};

use crate::choropleth::DensityBreaks;
use crate::style::StyleDescriptor;

/// Layer identity. Variant order is draw order: earlier layers are drawn
/// underneath later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Population density choropleth.
    Density,
    /// Service-level classification of population polygons.
    Service,
    /// Uncovered part of the boundary.
    Desert,
    /// Coverage union.
    Coverage,
    /// Points of interest of one category.
    Poi(PoiCategory),
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Density => f.write_str("density"),
            Self::Service => f.write_str("service"),
            Self::Desert => f.write_str("desert"),
            Self::Coverage => f.write_str("coverage"),
            Self::Poi(category) => write!(f, "poi_{category}"),
        }
    }
}

/// One feature with its style and optional popup text.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    /// `GeoJSON` feature carrying the source properties.
    pub feature: Feature,
    /// How to draw it.
    pub style: StyleDescriptor,
    /// Popup label, for clickable features.
    pub popup: Option<String>,
}

/// A homogeneous set of styled features.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledLayer {
    /// Layer identity.
    pub kind: LayerKind,
    /// Features in source order.
    pub features: Vec<StyledFeature>,
}

/// Which optional layers to emit. Coverage and desert are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Emit the density choropleth.
    pub density: bool,
    /// Emit the service classification.
    pub service: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            density: true,
            service: true,
        }
    }
}

/// Builds every layer for `result`, in draw order.
///
/// Population layers come from `data` for the result's year; POI layers
/// are emitted for each category `control` shows, whether or not it
/// counted towards coverage. Empty layers are omitted.
#[must_use]
pub fn project(
    data: &DataBundle,
    control: &ControlState,
    result: &AccessResult,
    options: ProjectionOptions,
) -> Vec<StyledLayer> {
    let inputs = input::select(data, result.year);
    let mut layers = Vec::new();

    if options.density {
        let breaks = DensityBreaks::from_features(inputs.population);
        layers.push(StyledLayer {
            kind: LayerKind::Density,
            features: inputs
                .population
                .iter()
                .map(|area| StyledFeature {
                    feature: output::polygon_to_feature(area, JsonObject::new()),
                    style: StyleDescriptor::Density(breaks.classify(area.density())),
                    popup: None,
                })
                .collect(),
        });
    }

    if options.service {
        layers.push(StyledLayer {
            kind: LayerKind::Service,
            features: classify_areas(inputs.population, &result.by_category)
                .into_iter()
                .map(|classified| {
                    let mut extra = JsonObject::new();
                    extra.insert("service".to_string(), classified.level.as_ref().into());
                    StyledFeature {
                        feature: output::polygon_to_feature(classified.area, extra),
                        style: StyleDescriptor::Service(classified.level),
                        popup: None,
                    }
                })
                .collect(),
        });
    }

    layers.push(StyledLayer {
        kind: LayerKind::Desert,
        features: vec![StyledFeature {
            feature: output::polygon_to_feature(&result.desert, JsonObject::new()),
            style: StyleDescriptor::Desert,
            popup: None,
        }],
    });

    if let Some(coverage) = &result.coverage {
        layers.push(StyledLayer {
            kind: LayerKind::Coverage,
            features: vec![StyledFeature {
                feature: output::polygon_to_feature(coverage, JsonObject::new()),
                style: StyleDescriptor::Coverage,
                popup: None,
            }],
        });
    }

    for &category in PoiCategory::all() {
        if !control.enabled.is_shown(category) {
            continue;
        }
        layers.push(StyledLayer {
            kind: LayerKind::Poi(category),
            features: inputs
                .points(category)
                .iter()
                .filter_map(|point| {
                    let feature = output::point_to_feature(point, JsonObject::new())?;
                    Some(StyledFeature {
                        feature,
                        style: StyleDescriptor::Poi(category),
                        popup: Some(point.display_name().to_string()),
                    })
                })
                .collect(),
        });
    }

    layers.retain(|layer| !layer.features.is_empty());
    log::debug!("Projected {} layers for {}", layers.len(), result.year);
    layers
}
