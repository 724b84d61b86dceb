//! A [`MapAdapter`] that renders into a single `GeoJSON` document.
//!
//! Every drawn feature keeps its source properties and gains `layer`,
//! `popup` (when present) and `simplestyle` keys, so the output opens
//! styled in geojson.io and similar viewers.

use geojson::{Feature, GeoJson};
use seattle_access::output;

use crate::RenderError;
use crate::adapter::MapAdapter;
use crate::layers::StyledLayer;

/// Collects drawn layers into one `FeatureCollection`.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonDocument {
    mounted: bool,
    features: Vec<Feature>,
    layer_names: Vec<String>,
}

impl GeoJsonDocument {
    /// Creates an empty, unmounted document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the layers drawn last, bottom first.
    #[must_use]
    pub fn layer_names(&self) -> &[String] {
        &self.layer_names
    }

    /// Number of features drawn.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// The drawn features as a `FeatureCollection`.
    #[must_use]
    pub fn to_geojson(&self) -> GeoJson {
        output::collection(self.features.clone())
    }

    /// Pretty-printed `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string_pretty(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }
}

impl MapAdapter for GeoJsonDocument {
    fn mount(&mut self) -> Result<(), RenderError> {
        if self.mounted {
            return Err(RenderError::Mount {
                message: "document is already mounted".to_string(),
            });
        }
        self.mounted = true;
        self.features.clear();
        self.layer_names.clear();
        Ok(())
    }

    fn add_layer(&mut self, layer: &StyledLayer) -> Result<(), RenderError> {
        if !self.mounted {
            return Err(RenderError::Mount {
                message: format!("cannot draw layer {} before mounting", layer.kind),
            });
        }

        let layer_name = layer.kind.to_string();
        for styled in &layer.features {
            let mut feature = styled.feature.clone();
            let properties = feature.properties.get_or_insert_with(Default::default);
            properties.insert("layer".to_string(), layer_name.clone().into());
            if let Some(popup) = &styled.popup {
                properties.insert("popup".to_string(), popup.clone().into());
            }
            properties.extend(styled.style.simplestyle());
            self.features.push(feature);
        }

        log::debug!(
            "Drew layer {layer_name} with {} features",
            layer.features.len()
        );
        self.layer_names.push(layer_name);
        Ok(())
    }

    fn clear_layers(&mut self) {
        if self.mounted {
            self.features.clear();
            self.layer_names.clear();
        }
    }

    /// Drawn features are kept until the next mount so the document can
    /// still be written after its session closes.
    fn teardown(&mut self) {
        self.mounted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MapSession, NoEvents};
    use crate::layers::{LayerKind, StyledFeature};
    use crate::style::StyleDescriptor;
    use geo::{LineString, MultiPolygon, Polygon};
    use geojson::JsonObject;
    use seattle_access_models::{PoiCategory, PointFeature, PolygonFeature};

    fn layers() -> Vec<StyledLayer> {
        let square = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            vec![],
        )]);
        let coverage = PolygonFeature::new(square).with_property("name", "served");
        let point = PointFeature::new("Pike Place", PoiCategory::Market, 0.5, 0.5);

        vec![
            StyledLayer {
                kind: LayerKind::Coverage,
                features: vec![StyledFeature {
                    feature: output::polygon_to_feature(&coverage, JsonObject::new()),
                    style: StyleDescriptor::Coverage,
                    popup: None,
                }],
            },
            StyledLayer {
                kind: LayerKind::Poi(PoiCategory::Market),
                features: vec![StyledFeature {
                    feature: output::point_to_feature(&point, JsonObject::new()).unwrap(),
                    style: StyleDescriptor::Poi(PoiCategory::Market),
                    popup: Some("Pike Place".to_string()),
                }],
            },
        ]
    }

    #[test]
    fn document_survives_session_close() {
        let mut document = GeoJsonDocument::new();
        {
            let mut events = NoEvents;
            let mut session = MapSession::open(&mut document, &mut events).unwrap();
            session.show(layers()).unwrap();
        }

        assert_eq!(document.layer_names(), ["coverage", "poi_market"]);
        let GeoJson::FeatureCollection(collection) = document.to_geojson() else {
            panic!("expected a feature collection");
        };
        let coverage = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(coverage["layer"], "coverage");
        assert_eq!(coverage["name"], "served");
        assert_eq!(coverage["fill"], "#22c55e");

        let market = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(market["popup"], "Pike Place");
        assert_eq!(market["marker-color"], "#f59e0b");
    }

    #[test]
    fn drawing_requires_a_mount() {
        let mut document = GeoJsonDocument::new();
        let result = document.add_layer(&layers()[0]);
        assert!(matches!(result, Err(RenderError::Mount { .. })));
    }

    #[test]
    fn remount_starts_fresh() {
        let mut document = GeoJsonDocument::new();
        let mut events = NoEvents;
        {
            let mut session = MapSession::open(&mut document, &mut events).unwrap();
            session.show(layers()).unwrap();
        }
        {
            let _session = MapSession::open(&mut document, &mut events).unwrap();
        }
        assert_eq!(document.feature_count(), 0);
        assert!(document.to_string_pretty().unwrap().contains("FeatureCollection"));
    }
}
