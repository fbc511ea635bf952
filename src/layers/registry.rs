//! Immutable overlay catalog and paint order.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::ConfigError;
use crate::layers::overlay::{ActiveLayer, OverlayLayer};

/// Source and layer id of the raster base map, painted below every overlay.
pub const BASE_MAP_ID: &str = "osm";

/// Paint order of claim markers. Every overlay renders below it.
pub const MARKER_Z: i32 = 1000;

/// Paint order for ids the registry does not know.
pub const DEFAULT_OVERLAY_Z: i32 = 500;

/// One layer-toggle button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerOption {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Catalog of overlay definitions, kept sorted by z-order.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    overlays: Vec<OverlayLayer>,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self {
            overlays: default_overlays(),
        }
    }
}

/// Forest cover, water bodies and community-rights polygons.
pub fn default_overlays() -> Vec<OverlayLayer> {
    vec![
        OverlayLayer::forest_cover(),
        OverlayLayer::water_bodies(),
        OverlayLayer::community_rights(),
    ]
}

impl LayerRegistry {
    /// Build a registry, rejecting duplicate ids, invalid overlays and any
    /// overlay that would paint above the markers.
    pub fn new(mut overlays: Vec<OverlayLayer>) -> Result<Self, ConfigError> {
        let mut ids = HashSet::new();
        let mut sources = HashSet::new();
        for overlay in &overlays {
            if !ids.insert(overlay.id.as_str()) {
                return Err(ConfigError::new(format!("duplicate overlay id '{}'", overlay.id)));
            }
            if !sources.insert(overlay.source.as_str()) {
                return Err(ConfigError::new(format!(
                    "overlay '{}' reuses source '{}'",
                    overlay.id, overlay.source
                )));
            }
            if overlay.id == BASE_MAP_ID || overlay.source == BASE_MAP_ID {
                return Err(ConfigError::new(format!(
                    "overlay '{}' uses the base map id '{BASE_MAP_ID}'",
                    overlay.id
                )));
            }
            if overlay.z_order >= MARKER_Z {
                return Err(ConfigError::new(format!(
                    "overlay '{}' z-order {} must be below markers ({MARKER_Z})",
                    overlay.id, overlay.z_order
                )));
            }
            overlay.validate().map_err(ConfigError::new)?;
        }
        overlays.sort_by_key(|o| o.z_order);
        Ok(Self { overlays })
    }

    /// All overlays in paint order.
    pub fn overlays(&self) -> &[OverlayLayer] {
        &self.overlays
    }

    pub fn get(&self, id: &str) -> Option<&OverlayLayer> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Overlays to mount for a selection, in paint order.
    ///
    /// Static overlays are always included; bucketed ones only when the
    /// active layer admits their category.
    pub fn definitions_for(&self, active: &ActiveLayer) -> Vec<&OverlayLayer> {
        self.overlays
            .iter()
            .filter(|o| o.bucket.map_or(true, |category| active.admits(category)))
            .collect()
    }

    /// Fixed paint order. Unknown ids still sort below markers.
    pub fn z_order(&self, layer_id: &str) -> i32 {
        self.get(layer_id)
            .map(|o| o.z_order)
            .unwrap_or(DEFAULT_OVERLAY_Z)
    }

    /// Layer-toggle buttons, "all claims" first.
    pub fn layer_options(&self) -> Vec<LayerOption> {
        ActiveLayer::OPTIONS
            .iter()
            .map(|layer| LayerOption {
                id: layer.id().to_string(),
                name: layer.display_name().to_string(),
                color: layer.color().to_string(),
            })
            .collect()
    }
}
