// src/surface/mod.rs
// Map surface: owns the map instance and makes every mount call idempotent
// RELEVANT FILES: src/surface/renderer.rs, src/surface/headless.rs, src/atlas/mod.rs

pub mod headless;
pub mod renderer;

pub use headless::{HeadlessFactory, HeadlessScene};
pub use renderer::{Container, MapFactory, MapRenderer, RendererCall, RendererError};

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::MapOptions;
use crate::error::{AtlasError, AtlasResult};
use crate::layers::style::LayerSpec;
use crate::markers::popup::{MarkerSpec, Popup};

/// Lifecycle of a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceState {
    /// No instance yet, or the instance has not signalled load.
    Uninitialized,
    Ready,
    Destroyed,
}

/// A mounted renderer layer with its paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedLayer {
    pub spec: LayerSpec,
    pub z: i32,
}

/// Owns the underlying map instance and everything mounted on it.
///
/// The surface keeps its own record of mounted sources, layers and markers.
/// That record is updated immediately; renderer calls are forwarded while
/// `Ready` and queued while `Uninitialized`. After `destroy` every call is
/// ignored.
pub struct MapSurface {
    state: SurfaceState,
    renderer: Option<Box<dyn MapRenderer>>,
    container: Option<String>,
    pending: Vec<RendererCall>,
    sources: BTreeMap<String, serde_json::Value>,
    layers: Vec<MountedLayer>,
    markers: BTreeMap<String, MarkerSpec>,
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSurface")
            .field("state", &self.state)
            .field("container", &self.container)
            .field("pending", &self.pending.len())
            .field("sources", &self.sources.len())
            .field("layers", &self.layer_ids())
            .field("markers", &self.markers.len())
            .finish()
    }
}

impl MapSurface {
    pub fn new() -> Self {
        Self {
            state: SurfaceState::Uninitialized,
            renderer: None,
            container: None,
            pending: Vec::new(),
            sources: BTreeMap::new(),
            layers: Vec::new(),
            markers: BTreeMap::new(),
        }
    }

    // ---------- lifecycle ----------

    /// Create the map instance in `container`.
    ///
    /// A missing container or a factory refusal is fatal and reported as
    /// `ContainerUnavailable`; it is never retried. Mounting twice is a no-op.
    pub fn mount(
        &mut self,
        factory: &mut dyn MapFactory,
        container: Option<&Container>,
        options: &MapOptions,
    ) -> AtlasResult<()> {
        match self.state {
            SurfaceState::Destroyed => {
                return Err(AtlasError::not_ready("surface was destroyed; create a new one"))
            }
            _ if self.renderer.is_some() => {
                debug!("map surface already mounted in {:?}", self.container);
                return Ok(());
            }
            _ => {}
        }

        let container = container
            .ok_or_else(|| AtlasError::container_unavailable("no container element"))?;
        let renderer = factory
            .create(container, options)
            .map_err(|e| AtlasError::container_unavailable(format!("{}: {e}", container.id)))?;

        info!(
            "map created in '{}' ({}x{}) at ({}, {}) zoom {}",
            container.id,
            container.width,
            container.height,
            options.center.lon,
            options.center.lat,
            options.zoom
        );
        self.renderer = Some(renderer);
        self.container = Some(container.id.clone());
        Ok(())
    }

    /// The map's load signal: `Uninitialized -> Ready`, then flush queued calls.
    pub fn mark_ready(&mut self) {
        if self.state != SurfaceState::Uninitialized {
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            warn!("ready signal before a map instance exists; ignoring");
            return;
        };

        self.state = SurfaceState::Ready;
        let queued = std::mem::take(&mut self.pending);
        info!("map surface ready; flushing {} queued call(s)", queued.len());
        for call in &queued {
            if let Err(e) = call.apply(renderer.as_mut()) {
                warn!("queued {} failed: {e}", call.name());
            }
        }
    }

    /// Release the instance. Idempotent, safe in any state.
    pub fn destroy(&mut self) {
        if self.state == SurfaceState::Destroyed {
            return;
        }
        if !self.pending.is_empty() {
            let err = AtlasError::not_ready("destroyed before load");
            warn!(
                "[{}] dropping {} queued call(s): {err}",
                err.category(),
                self.pending.len()
            );
        }
        if let Some(mut renderer) = self.renderer.take() {
            renderer.remove();
        }
        info!("map surface destroyed ({:?})", self.container);
        self.pending.clear();
        self.sources.clear();
        self.layers.clear();
        self.markers.clear();
        self.state = SurfaceState::Destroyed;
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Renderer calls waiting for the load signal.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.ignored("resize", "") {
            return;
        }
        self.dispatch(RendererCall::Resize { width, height });
    }

    // ---------- sources ----------

    /// Add a source, or update its data in place when it already exists.
    pub fn add_source(&mut self, id: &str, data: serde_json::Value) -> bool {
        if self.ignored("add_source", id) {
            return false;
        }
        match self.sources.get(id) {
            Some(existing) if *existing == data => false,
            Some(_) => {
                self.sources.insert(id.to_string(), data.clone());
                self.dispatch(RendererCall::SetSourceData {
                    id: id.to_string(),
                    data,
                });
                true
            }
            None => {
                self.sources.insert(id.to_string(), data.clone());
                self.dispatch(RendererCall::AddSource {
                    id: id.to_string(),
                    data,
                });
                true
            }
        }
    }

    /// Remove a source and every layer reading from it.
    pub fn remove_source(&mut self, id: &str) -> bool {
        if self.ignored("remove_source", id) || !self.sources.contains_key(id) {
            return false;
        }
        let dependents: Vec<String> = self
            .layers
            .iter()
            .filter(|l| l.spec.source == id)
            .map(|l| l.spec.id.clone())
            .collect();
        for layer_id in dependents {
            self.remove_layer(&layer_id);
        }
        self.sources.remove(id);
        self.dispatch(RendererCall::RemoveSource { id: id.to_string() });
        true
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn source_data(&self, id: &str) -> Option<&serde_json::Value> {
        self.sources.get(id)
    }

    // ---------- layers ----------

    /// Mount a layer at paint order `z`.
    ///
    /// An identical layer already mounted is left alone; a stale layer with
    /// the same id is removed first. The layer's source must be mounted.
    pub fn add_layer(&mut self, spec: LayerSpec, z: i32) -> bool {
        if self.ignored("add_layer", &spec.id) {
            return false;
        }
        if !self.sources.contains_key(&spec.source) {
            warn!("layer '{}' references unmounted source '{}'", spec.id, spec.source);
            return false;
        }
        if let Some(existing) = self.layers.iter().find(|l| l.spec.id == spec.id) {
            if existing.spec == spec && existing.z == z {
                return false;
            }
            debug!("{}; replacing stale layer", AtlasError::DuplicateLayerId(spec.id.clone()));
            let id = spec.id.clone();
            self.remove_layer(&id);
        }

        let index = self
            .layers
            .iter()
            .position(|l| l.z > z)
            .unwrap_or(self.layers.len());
        let before = self.layers.get(index).map(|l| l.spec.id.clone());
        self.layers.insert(index, MountedLayer { spec: spec.clone(), z });
        self.dispatch(RendererCall::AddLayer { layer: spec, before });
        true
    }

    pub fn remove_layer(&mut self, id: &str) -> bool {
        if self.ignored("remove_layer", id) {
            return false;
        }
        let Some(index) = self.layers.iter().position(|l| l.spec.id == id) else {
            return false;
        };
        self.layers.remove(index);
        self.dispatch(RendererCall::RemoveLayer { id: id.to_string() });
        true
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.spec.id == id)
    }

    pub fn layer(&self, id: &str) -> Option<&MountedLayer> {
        self.layers.iter().find(|l| l.spec.id == id)
    }

    /// Mounted layer ids, bottom to top.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.spec.id.as_str()).collect()
    }

    // ---------- markers ----------

    /// Mount a marker. No-op when the id is already mounted.
    pub fn add_marker(&mut self, marker: MarkerSpec) -> bool {
        if self.ignored("add_marker", &marker.id) || self.markers.contains_key(&marker.id) {
            return false;
        }
        self.markers.insert(marker.id.clone(), marker.clone());
        self.dispatch(RendererCall::AddMarker { marker });
        true
    }

    /// Swap the popup content of a mounted marker without recreating it.
    pub fn set_marker_popup(&mut self, id: &str, popup: Popup) -> bool {
        if self.ignored("set_marker_popup", id) {
            return false;
        }
        let Some(marker) = self.markers.get_mut(id) else {
            return false;
        };
        if marker.popup == popup {
            return false;
        }
        marker.popup = popup.clone();
        self.dispatch(RendererCall::SetMarkerPopup {
            id: id.to_string(),
            popup,
        });
        true
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        if self.ignored("remove_marker", id) || self.markers.remove(id).is_none() {
            return false;
        }
        self.dispatch(RendererCall::RemoveMarker { id: id.to_string() });
        true
    }

    pub fn has_marker(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn markers(&self) -> &BTreeMap<String, MarkerSpec> {
        &self.markers
    }

    // ---------- internals ----------

    fn ignored(&self, op: &str, id: &str) -> bool {
        if self.state == SurfaceState::Destroyed {
            debug!("ignoring {op}('{id}') on destroyed surface");
            return true;
        }
        false
    }

    fn dispatch(&mut self, call: RendererCall) {
        match (self.state, self.renderer.as_mut()) {
            (SurfaceState::Ready, Some(renderer)) => {
                if let Err(e) = call.apply(renderer.as_mut()) {
                    warn!("{} failed: {e}", call.name());
                }
            }
            _ => self.pending.push(call),
        }
    }
}

impl Drop for MapSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::style::FillPaint;

    fn water() -> LayerSpec {
        LayerSpec::fill("water-layer", "water-source", FillPaint::new("#0080ff", 0.6))
    }

    fn ready_surface(factory: &mut HeadlessFactory) -> MapSurface {
        let mut surface = MapSurface::new();
        surface
            .mount(factory, Some(&Container::new("map", 800, 600)), &MapOptions::default())
            .unwrap();
        surface.mark_ready();
        surface
    }

    #[test]
    fn missing_container_is_fatal() {
        let mut factory = HeadlessFactory::new();
        let mut surface = MapSurface::new();
        let err = surface.mount(&mut factory, None, &MapOptions::default()).unwrap_err();
        assert!(matches!(err, AtlasError::ContainerUnavailable(_)));
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
    }

    #[test]
    fn calls_before_ready_are_queued_then_flushed_in_order() {
        let mut factory = HeadlessFactory::new();
        let mut surface = MapSurface::new();
        surface
            .mount(&mut factory, Some(&Container::new("map", 800, 600)), &MapOptions::default())
            .unwrap();

        assert!(surface.add_source("water-source", serde_json::json!({})));
        assert!(surface.add_layer(water(), 20));
        assert_eq!(surface.pending_len(), 2);
        assert!(factory.calls().is_empty());

        surface.mark_ready();
        assert_eq!(surface.pending_len(), 0);
        let names: Vec<_> = factory.calls().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["add_source", "add_layer"]);
    }

    #[test]
    fn duplicate_layer_add_leaves_one_layer() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        surface.add_source("water-source", serde_json::json!({}));
        surface.add_layer(water(), 20);
        assert!(!surface.add_layer(water(), 20));
        assert_eq!(surface.layer_ids(), ["water-layer"]);

        let mut restyled = water();
        restyled.paint = Some(FillPaint::new("#0080ff", 0.3));
        assert!(surface.add_layer(restyled, 20));
        assert_eq!(surface.layer_ids(), ["water-layer"]);
        assert_eq!(factory.scene("map").unwrap().layers, ["osm", "water-layer"]);
    }

    #[test]
    fn layers_inserted_in_paint_order() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        surface.add_source("water-source", serde_json::json!({}));
        surface.add_source("forest-source", serde_json::json!({}));
        surface.add_layer(water(), 20);
        surface.add_layer(
            LayerSpec::fill("forest-layer", "forest-source", FillPaint::new("#1a5f1a", 0.4)),
            10,
        );
        assert_eq!(surface.layer_ids(), ["forest-layer", "water-layer"]);
        assert_eq!(factory.scene("map").unwrap().layers, ["osm", "forest-layer", "water-layer"]);
    }

    #[test]
    fn removing_source_removes_dependent_layers() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        surface.add_source("water-source", serde_json::json!({}));
        surface.add_layer(water(), 20);
        assert!(surface.remove_source("water-source"));
        assert!(!surface.has_layer("water-layer"));
        assert!(!surface.remove_source("water-source"));
        let scene = factory.scene("map").unwrap();
        assert_eq!(scene.layers, ["osm"]);
        assert_eq!(scene.sources.keys().collect::<Vec<_>>(), ["osm"]);
    }

    #[test]
    fn re_adding_source_with_new_data_updates_in_place() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        let first = serde_json::json!({"type": "FeatureCollection", "features": []});
        let second = serde_json::json!({"type": "FeatureCollection", "features": [{"id": 1}]});
        surface.add_source("water-source", first.clone());
        surface.add_layer(water(), 20);
        factory.clear_calls();

        assert!(!surface.add_source("water-source", first));
        assert!(factory.calls().is_empty());

        assert!(surface.add_source("water-source", second.clone()));
        assert_eq!(
            factory.calls(),
            [RendererCall::SetSourceData {
                id: "water-source".into(),
                data: second.clone(),
            }]
        );
        assert_eq!(surface.source_data("water-source"), Some(&second));
        let scene = factory.scene("map").unwrap();
        assert_eq!(scene.sources["water-source"], second);
        assert_eq!(scene.layers, ["osm", "water-layer"]);
    }

    #[test]
    fn resize_waits_for_ready() {
        let mut factory = HeadlessFactory::new();
        let mut surface = MapSurface::new();
        surface
            .mount(&mut factory, Some(&Container::new("map", 800, 600)), &MapOptions::default())
            .unwrap();

        surface.resize(1024, 768);
        assert_eq!(surface.pending_len(), 1);
        assert_eq!(factory.scene("map").unwrap().size, (800, 600));

        surface.mark_ready();
        assert_eq!(factory.scene("map").unwrap().size, (1024, 768));

        surface.resize(640, 480);
        assert_eq!(factory.scene("map").unwrap().size, (640, 480));
        let names: Vec<_> = factory.calls().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["resize", "resize"]);
    }

    #[test]
    fn layer_without_source_is_refused() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        assert!(!surface.add_layer(water(), 20));
        assert!(factory.calls().is_empty());
    }

    #[test]
    fn destroy_is_idempotent_and_ignores_later_calls() {
        let mut factory = HeadlessFactory::new();
        let mut surface = ready_surface(&mut factory);
        surface.destroy();
        surface.destroy();
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert!(!surface.add_source("water-source", serde_json::json!({})));
        assert!(!surface.remove_marker("x"));
        let removes = factory.calls().iter().filter(|c| **c == RendererCall::Remove).count();
        assert_eq!(removes, 1);
    }

    #[test]
    fn destroy_before_ready_drops_queue() {
        let mut factory = HeadlessFactory::new();
        let mut surface = MapSurface::new();
        surface
            .mount(&mut factory, Some(&Container::new("map", 800, 600)), &MapOptions::default())
            .unwrap();
        surface.add_source("water-source", serde_json::json!({}));
        surface.destroy();
        surface.mark_ready();
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert_eq!(factory.calls(), [RendererCall::Remove]);
    }

    #[test]
    fn drop_releases_container() {
        let mut factory = HeadlessFactory::new();
        {
            let _surface = ready_surface(&mut factory);
            assert!(factory.is_occupied("map"));
        }
        assert!(!factory.is_occupied("map"));
    }
}
