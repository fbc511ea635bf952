//! Headless in-memory map library.
//!
//! Behaves like a strict browser map library: one instance per container,
//! errors on duplicate or unknown ids, nothing accepted after `remove`.
//! Every call is appended to a shared log so callers can assert on exactly
//! what reached the renderer. A new instance starts with the raster base
//! map from its [`MapOptions`] already in place.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::config::MapOptions;
use crate::features::geometry::LngLat;
use crate::layers::style::LayerSpec;
use crate::markers::popup::{MarkerSpec, Popup};
use crate::surface::renderer::{Container, MapFactory, MapRenderer, RendererCall, RendererError};

/// What one container currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessScene {
    pub sources: BTreeMap<String, serde_json::Value>,
    /// Layer ids bottom to top.
    pub layers: Vec<String>,
    pub markers: BTreeMap<String, MarkerSpec>,
    pub center: LngLat,
    pub zoom: f64,
    pub navigation_control: bool,
    pub size: (u32, u32),
    pub removed: bool,
}

impl HeadlessScene {
    fn new(container: &Container, options: &MapOptions) -> Self {
        let base = options.base_layer();
        Self {
            sources: BTreeMap::from([(base.source.clone(), options.base_source())]),
            layers: vec![base.id],
            markers: BTreeMap::new(),
            center: options.center,
            zoom: options.zoom,
            navigation_control: options.navigation_control,
            size: (container.width, container.height),
            removed: false,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<RendererCall>,
    scenes: BTreeMap<String, HeadlessScene>,
}

/// Factory handing out headless maps; clones share the same log and scenes.
#[derive(Debug, Clone, Default)]
pub struct HeadlessFactory {
    shared: Rc<RefCell<Shared>>,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every renderer call so far, in order.
    pub fn calls(&self) -> Vec<RendererCall> {
        self.shared.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.shared.borrow().calls.len()
    }

    pub fn clear_calls(&self) {
        self.shared.borrow_mut().calls.clear();
    }

    pub fn scene(&self, container: &str) -> Option<HeadlessScene> {
        self.shared.borrow().scenes.get(container).cloned()
    }

    /// True while a live map instance sits in the container.
    pub fn is_occupied(&self, container: &str) -> bool {
        self.shared
            .borrow()
            .scenes
            .get(container)
            .is_some_and(|s| !s.removed)
    }
}

impl MapFactory for HeadlessFactory {
    fn create(
        &mut self,
        container: &Container,
        options: &MapOptions,
    ) -> Result<Box<dyn MapRenderer>, RendererError> {
        if self.is_occupied(&container.id) {
            return Err(RendererError::ContainerInUse(container.id.clone()));
        }
        self.shared
            .borrow_mut()
            .scenes
            .insert(container.id.clone(), HeadlessScene::new(container, options));
        Ok(Box::new(HeadlessMap {
            container: container.id.clone(),
            shared: Rc::clone(&self.shared),
        }))
    }
}

struct HeadlessMap {
    container: String,
    shared: Rc<RefCell<Shared>>,
}

impl HeadlessMap {
    /// Log the call, then run `f` against this instance's scene.
    fn with_scene<F>(&mut self, call: RendererCall, f: F) -> Result<(), RendererError>
    where
        F: FnOnce(&mut HeadlessScene) -> Result<(), RendererError>,
    {
        let mut shared = self.shared.borrow_mut();
        shared.calls.push(call);
        let scene = shared
            .scenes
            .get_mut(&self.container)
            .ok_or_else(|| RendererError::ContainerMissing(self.container.clone()))?;
        if scene.removed {
            return Err(RendererError::Removed);
        }
        f(scene)
    }
}

impl MapRenderer for HeadlessMap {
    fn add_source(&mut self, id: &str, data: &serde_json::Value) -> Result<(), RendererError> {
        let call = RendererCall::AddSource {
            id: id.to_string(),
            data: data.clone(),
        };
        self.with_scene(call, |scene| {
            if scene.sources.contains_key(id) {
                return Err(RendererError::DuplicateId(id.to_string()));
            }
            scene.sources.insert(id.to_string(), data.clone());
            Ok(())
        })
    }

    fn set_source_data(&mut self, id: &str, data: &serde_json::Value) -> Result<(), RendererError> {
        let call = RendererCall::SetSourceData {
            id: id.to_string(),
            data: data.clone(),
        };
        self.with_scene(call, |scene| match scene.sources.get_mut(id) {
            Some(existing) => {
                *existing = data.clone();
                Ok(())
            }
            None => Err(RendererError::UnknownId(id.to_string())),
        })
    }

    fn remove_source(&mut self, id: &str) -> Result<(), RendererError> {
        let call = RendererCall::RemoveSource { id: id.to_string() };
        self.with_scene(call, |scene| {
            scene
                .sources
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| RendererError::UnknownId(id.to_string()))
        })
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<(), RendererError> {
        let call = RendererCall::AddLayer {
            layer: layer.clone(),
            before: before.map(str::to_string),
        };
        self.with_scene(call, |scene| {
            if scene.layers.iter().any(|l| *l == layer.id) {
                return Err(RendererError::DuplicateId(layer.id.clone()));
            }
            if !scene.sources.contains_key(&layer.source) {
                return Err(RendererError::UnknownId(layer.source.clone()));
            }
            let index = match before {
                Some(b) => scene
                    .layers
                    .iter()
                    .position(|l| l == b)
                    .ok_or_else(|| RendererError::UnknownId(b.to_string()))?,
                None => scene.layers.len(),
            };
            scene.layers.insert(index, layer.id.clone());
            Ok(())
        })
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), RendererError> {
        let call = RendererCall::RemoveLayer { id: id.to_string() };
        self.with_scene(call, |scene| {
            let index = scene
                .layers
                .iter()
                .position(|l| l == id)
                .ok_or_else(|| RendererError::UnknownId(id.to_string()))?;
            scene.layers.remove(index);
            Ok(())
        })
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<(), RendererError> {
        let call = RendererCall::AddMarker {
            marker: marker.clone(),
        };
        self.with_scene(call, |scene| {
            if scene.markers.contains_key(&marker.id) {
                return Err(RendererError::DuplicateId(marker.id.clone()));
            }
            scene.markers.insert(marker.id.clone(), marker.clone());
            Ok(())
        })
    }

    fn set_marker_popup(&mut self, id: &str, popup: &Popup) -> Result<(), RendererError> {
        let call = RendererCall::SetMarkerPopup {
            id: id.to_string(),
            popup: popup.clone(),
        };
        self.with_scene(call, |scene| match scene.markers.get_mut(id) {
            Some(marker) => {
                marker.popup = popup.clone();
                Ok(())
            }
            None => Err(RendererError::UnknownId(id.to_string())),
        })
    }

    fn remove_marker(&mut self, id: &str) -> Result<(), RendererError> {
        let call = RendererCall::RemoveMarker { id: id.to_string() };
        self.with_scene(call, |scene| {
            scene
                .markers
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| RendererError::UnknownId(id.to_string()))
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let _ = self.with_scene(RendererCall::Resize { width, height }, |scene| {
            scene.size = (width, height);
            Ok(())
        });
    }

    fn remove(&mut self) {
        let _ = self.with_scene(RendererCall::Remove, |scene| {
            scene.sources.clear();
            scene.layers.clear();
            scene.markers.clear();
            scene.removed = true;
            Ok(())
        });
    }
}
