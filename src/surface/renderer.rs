// src/surface/renderer.rs
// Seam between the map surface and the underlying map library
// RELEVANT FILES: src/surface/mod.rs, src/surface/headless.rs

use serde::Serialize;

use crate::config::MapOptions;
use crate::layers::style::LayerSpec;
use crate::markers::popup::{MarkerSpec, Popup};

/// Failures reported by the underlying map library.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RendererError {
    #[error("container '{0}' already hosts a map")]
    ContainerInUse(String),

    #[error("container '{0}' not found")]
    ContainerMissing(String),

    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    #[error("unknown id '{0}'")]
    UnknownId(String),

    #[error("map instance already removed")]
    Removed,
}

/// DOM-like element the map is created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Container {
    pub fn new(id: &str, width: u32, height: u32) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
        }
    }
}

/// One live map instance. Implementations may fail like real map
/// libraries do (duplicate ids, unknown ids); the surface never lets
/// those reach the caller.
pub trait MapRenderer {
    fn add_source(&mut self, id: &str, data: &serde_json::Value) -> Result<(), RendererError>;
    fn set_source_data(&mut self, id: &str, data: &serde_json::Value) -> Result<(), RendererError>;
    fn remove_source(&mut self, id: &str) -> Result<(), RendererError>;
    /// Insert below `before` when given, otherwise on top of all layers.
    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<(), RendererError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), RendererError>;
    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<(), RendererError>;
    fn set_marker_popup(&mut self, id: &str, popup: &Popup) -> Result<(), RendererError>;
    fn remove_marker(&mut self, id: &str) -> Result<(), RendererError>;
    fn resize(&mut self, width: u32, height: u32);
    /// Release the instance and detach every listener.
    fn remove(&mut self);
}

/// Creates map instances inside containers.
pub trait MapFactory {
    fn create(
        &mut self,
        container: &Container,
        options: &MapOptions,
    ) -> Result<Box<dyn MapRenderer>, RendererError>;
}

/// A renderer invocation, queued while the map is loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RendererCall {
    AddSource { id: String, data: serde_json::Value },
    SetSourceData { id: String, data: serde_json::Value },
    RemoveSource { id: String },
    AddLayer { layer: LayerSpec, before: Option<String> },
    RemoveLayer { id: String },
    AddMarker { marker: MarkerSpec },
    SetMarkerPopup { id: String, popup: Popup },
    RemoveMarker { id: String },
    Resize { width: u32, height: u32 },
    Remove,
}

impl RendererCall {
    /// Forward the call to a live renderer.
    pub fn apply(&self, renderer: &mut dyn MapRenderer) -> Result<(), RendererError> {
        match self {
            RendererCall::AddSource { id, data } => renderer.add_source(id, data),
            RendererCall::SetSourceData { id, data } => renderer.set_source_data(id, data),
            RendererCall::RemoveSource { id } => renderer.remove_source(id),
            RendererCall::AddLayer { layer, before } => renderer.add_layer(layer, before.as_deref()),
            RendererCall::RemoveLayer { id } => renderer.remove_layer(id),
            RendererCall::AddMarker { marker } => renderer.add_marker(marker),
            RendererCall::SetMarkerPopup { id, popup } => renderer.set_marker_popup(id, popup),
            RendererCall::RemoveMarker { id } => renderer.remove_marker(id),
            RendererCall::Resize { width, height } => {
                renderer.resize(*width, *height);
                Ok(())
            }
            RendererCall::Remove => {
                renderer.remove();
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RendererCall::AddSource { .. } => "add_source",
            RendererCall::SetSourceData { .. } => "set_source_data",
            RendererCall::RemoveSource { .. } => "remove_source",
            RendererCall::AddLayer { .. } => "add_layer",
            RendererCall::RemoveLayer { .. } => "remove_layer",
            RendererCall::AddMarker { .. } => "add_marker",
            RendererCall::SetMarkerPopup { .. } => "set_marker_popup",
            RendererCall::RemoveMarker { .. } => "remove_marker",
            RendererCall::Resize { .. } => "resize",
            RendererCall::Remove => "remove",
        }
    }
}
