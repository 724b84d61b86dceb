//! Map backend lifecycle.
//!
//! A [`MapSession`] mounts its [`MapAdapter`] when opened and tears it down
//! when dropped, however the session ends. Event handlers are passed in
//! explicitly when the session is opened.

use crate::RenderError;
use crate::layers::{LayerKind, StyledFeature, StyledLayer};

/// A map backend that can draw styled layers.
pub trait MapAdapter {
    /// Acquires the backend. Called once per session, before any layer is
    /// added.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Mount`] if the backend is unavailable.
    fn mount(&mut self) -> Result<(), RenderError>;

    /// Draws `layer` above every previously added layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer cannot be drawn.
    fn add_layer(&mut self, layer: &StyledLayer) -> Result<(), RenderError>;

    /// Removes every drawn layer.
    fn clear_layers(&mut self);

    /// Releases the backend. Called exactly once per successful mount.
    fn teardown(&mut self);
}

/// Callbacks for interaction with drawn layers.
pub trait LayerEvents {
    /// A layer finished drawing.
    fn layer_added(&mut self, _kind: LayerKind, _feature_count: usize) {}

    /// A feature was clicked. `popup` is its popup label, if it has one.
    fn feature_clicked(&mut self, _kind: LayerKind, _feature: &StyledFeature, _popup: Option<&str>) {}
}

/// [`LayerEvents`] that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl LayerEvents for NoEvents {}

/// A mounted adapter plus the layers currently drawn on it.
pub struct MapSession<'a, A: MapAdapter> {
    adapter: &'a mut A,
    events: &'a mut dyn LayerEvents,
    shown: Vec<StyledLayer>,
}

impl<'a, A: MapAdapter> MapSession<'a, A> {
    /// Mounts `adapter` and starts a session.
    ///
    /// # Errors
    ///
    /// Returns the adapter's mount error. Nothing is torn down in that case.
    pub fn open(adapter: &'a mut A, events: &'a mut dyn LayerEvents) -> Result<Self, RenderError> {
        adapter.mount()?;
        Ok(Self {
            adapter,
            events,
            shown: Vec::new(),
        })
    }

    /// Replaces everything drawn with `layers`, drawn in the given order.
    ///
    /// # Errors
    ///
    /// Returns the first layer error. Layers drawn before it stay drawn.
    pub fn show(&mut self, layers: Vec<StyledLayer>) -> Result<(), RenderError> {
        self.adapter.clear_layers();
        self.shown.clear();

        for layer in layers {
            self.adapter.add_layer(&layer)?;
            self.events.layer_added(layer.kind, layer.features.len());
            self.shown.push(layer);
        }
        Ok(())
    }

    /// Routes a click on feature `index` of layer `kind` to the event
    /// handlers. Returns `false` if no such feature is drawn.
    pub fn click(&mut self, kind: LayerKind, index: usize) -> bool {
        let Some(feature) = self
            .shown
            .iter()
            .find(|layer| layer.kind == kind)
            .and_then(|layer| layer.features.get(index))
        else {
            return false;
        };

        self.events
            .feature_clicked(kind, feature, feature.popup.as_deref());
        true
    }

    /// Layers currently drawn, bottom first.
    #[must_use]
    pub fn shown(&self) -> &[StyledLayer] {
        &self.shown
    }
}

impl<A: MapAdapter> Drop for MapSession<'_, A> {
    fn drop(&mut self) {
        self.adapter.teardown();
        log::debug!("Map session closed");
    }
}
