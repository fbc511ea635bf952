// src/config/mod.rs
// Atlas configuration: map options, region catalog, default selection, overlays
// RELEVANT FILES: src/config/regions.rs, src/layers/registry.rs, src/cli/mod.rs

pub mod regions;

#[cfg(test)]
mod tests;

pub use regions::{DistrictEntry, RegionCatalog, RegionEntry};

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AtlasResult;
use crate::features::geometry::LngLat;
use crate::filter::ALL_SUB_REGIONS;
use crate::layers::overlay::{ActiveLayer, OverlayLayer};
use crate::layers::registry::{default_overlays, LayerRegistry, BASE_MAP_ID};
use crate::layers::style::LayerSpec;

#[derive(Debug, Clone)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtlasConfig validation failed: {}", self.message)
    }
}

impl Error for ConfigError {}

/// Options handed to the map library when the instance is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub center: LngLat,
    pub zoom: f64,
    /// Raster tile template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    pub tile_size: u32,
    pub attribution: String,
    pub navigation_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LngLat::new(81.2849, 19.1383),
            zoom: 8.0,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_size: 256,
            attribution: "© OpenStreetMap contributors".to_string(),
            navigation_control: true,
        }
    }
}

impl MapOptions {
    /// Raster tile source for the base map, in style-spec shape.
    pub fn base_source(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "raster",
            "tiles": [self.tile_url],
            "tileSize": self.tile_size,
            "attribution": self.attribution,
        })
    }

    pub fn base_layer(&self) -> LayerSpec {
        LayerSpec::raster(BASE_MAP_ID, BASE_MAP_ID)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.center.is_valid() {
            return Err(ConfigError::new(format!(
                "map.center ({}, {}) is not a valid longitude/latitude",
                self.center.lon, self.center.lat
            )));
        }
        if !(0.0..=24.0).contains(&self.zoom) {
            return Err(ConfigError::new("map.zoom must be within [0, 24]"));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::new("map.tileSize must be greater than zero"));
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_url.contains(placeholder) {
                return Err(ConfigError::new(format!(
                    "map.tileUrl must contain {placeholder}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything the atlas needs besides the claims themselves.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasConfig {
    pub map: MapOptions,
    pub regions: RegionCatalog,
    pub default_region: String,
    pub default_sub_region: String,
    pub default_layer: ActiveLayer,
    pub overlays: Vec<OverlayLayer>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            map: MapOptions::default(),
            regions: RegionCatalog::default(),
            default_region: "chhattisgarh".to_string(),
            default_sub_region: ALL_SUB_REGIONS.to_string(),
            default_layer: ActiveLayer::FraClaims,
            overlays: default_overlays(),
        }
    }
}

impl AtlasConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> AtlasResult<Self> {
        let config: AtlasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.validate()?;

        if self.regions.regions().is_empty() {
            return Err(ConfigError::new("regions must list at least one region"));
        }
        let mut ids = HashSet::new();
        for (index, region) in self.regions.regions().iter().enumerate() {
            let label = format!("regions[{index}]");
            if region.id.trim().is_empty() {
                return Err(ConfigError::new(format!("{label}.id must be non-empty")));
            }
            if !ids.insert(region.id.as_str()) {
                return Err(ConfigError::new(format!(
                    "{label}.id '{}' is duplicated",
                    region.id
                )));
            }
            let mut districts = HashSet::new();
            for district in &region.districts {
                if district.id == ALL_SUB_REGIONS {
                    return Err(ConfigError::new(format!(
                        "{label}: district id '{ALL_SUB_REGIONS}' is reserved"
                    )));
                }
                if !districts.insert(district.id.as_str()) {
                    return Err(ConfigError::new(format!(
                        "{label}: district '{}' is duplicated",
                        district.id
                    )));
                }
            }
        }

        if !self.regions.contains_region(&self.default_region) {
            return Err(ConfigError::new(format!(
                "defaultRegion '{}' is not in the region catalog",
                self.default_region
            )));
        }
        if self.default_sub_region != ALL_SUB_REGIONS
            && !self
                .regions
                .districts(&self.default_region)
                .iter()
                .any(|d| d.id == self.default_sub_region)
        {
            return Err(ConfigError::new(format!(
                "defaultSubRegion '{}' is not a district of '{}'",
                self.default_sub_region, self.default_region
            )));
        }
        if let ActiveLayer::Other(id) = &self.default_layer {
            return Err(ConfigError::new(format!("defaultLayer '{id}' is not a known layer")));
        }

        self.registry().map(|_| ())
    }

    /// Overlay catalog built from the configured overlays.
    pub fn registry(&self) -> Result<LayerRegistry, ConfigError> {
        LayerRegistry::new(self.overlays.clone())
    }
}
