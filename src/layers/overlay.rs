// src/layers/overlay.rs
// Static thematic overlays and the claim layer selection they are gated by
// RELEVANT FILES: src/layers/registry.rs, src/layers/style.rs, src/features/geometry.rs

use serde::{Deserialize, Serialize};

use crate::features::claim::ClaimCategory;
use crate::features::geometry::{GeoFeature, Geometry, GeometryCollection, LngLat};
use crate::layers::style::{FillPaint, LayerSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    #[default]
    Polygon,
}

/// Thematic overlay (forest cover, water bodies, community-rights polygons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    /// Renderer layer id, unique within the registry.
    pub id: String,
    /// Renderer source id backing the layer.
    pub source: String,
    #[serde(default)]
    pub geometry_type: GeometryType,
    pub style: FillPaint,
    pub source_data: GeometryCollection,
    pub z_order: i32,
    /// Category this overlay belongs to. `None` means always mounted.
    #[serde(default)]
    pub bucket: Option<ClaimCategory>,
}

impl OverlayLayer {
    pub fn new(id: &str, source: &str, style: FillPaint, data: GeometryCollection, z: i32) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            geometry_type: GeometryType::Polygon,
            style,
            source_data: data,
            z_order: z,
            bucket: None,
        }
    }

    pub fn with_bucket(mut self, category: ClaimCategory) -> Self {
        self.bucket = Some(category);
        self
    }

    pub fn layer_spec(&self) -> LayerSpec {
        LayerSpec::fill(&self.id, &self.source, self.style.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() || self.source.trim().is_empty() {
            return Err("overlay id and source must be non-empty".into());
        }
        self.style.validate().map_err(|e| format!("{}: {e}", self.id))?;
        if !self.source_data.is_valid() {
            return Err(format!("{}: source data has an invalid polygon", self.id));
        }
        Ok(())
    }

    /// Dense forest block around the Bastar claims.
    pub fn forest_cover() -> Self {
        let data = GeometryCollection::new(vec![GeoFeature::new(Geometry::rectangle(
            LngLat::new(81.20, 19.08),
            LngLat::new(81.35, 19.18),
        ))
        .with_property("type", "dense_forest")]);
        Self::new("forest-layer", "forest-source", FillPaint::new("#1a5f1a", 0.4), data, 10)
    }

    /// Reservoir polygon.
    pub fn water_bodies() -> Self {
        let data = GeometryCollection::new(vec![GeoFeature::new(Geometry::rectangle(
            LngLat::new(81.25, 19.10),
            LngLat::new(81.30, 19.15),
        ))
        .with_property("type", "reservoir")]);
        Self::new("water-layer", "water-source", FillPaint::new("#0080ff", 0.6), data, 20)
    }

    /// Community forest-resource area, shown with community-rights claims.
    pub fn community_rights() -> Self {
        let data = GeometryCollection::new(vec![GeoFeature::new(Geometry::rectangle(
            LngLat::new(81.15, 19.01),
            LngLat::new(81.22, 19.07),
        ))
        .with_property("type", "community_forest_resource")]);
        Self::new(
            "community-rights-layer",
            "community-rights-source",
            FillPaint::new("#3b82f6", 0.25),
            data,
            30,
        )
        .with_bucket(ClaimCategory::Community)
    }
}

/// Which claim layer the user has toggled on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActiveLayer {
    /// Every claim category.
    #[default]
    FraClaims,
    CommunityRights,
    PendingClaims,
    /// Unrecognised selection; admits no claims.
    Other(String),
}

impl ActiveLayer {
    pub const OPTIONS: [ActiveLayer; 3] = [
        ActiveLayer::FraClaims,
        ActiveLayer::CommunityRights,
        ActiveLayer::PendingClaims,
    ];

    pub fn from_id(id: &str) -> Self {
        match id.trim() {
            "fra-claims" => ActiveLayer::FraClaims,
            "community-rights" => ActiveLayer::CommunityRights,
            "pending-claims" => ActiveLayer::PendingClaims,
            other => ActiveLayer::Other(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ActiveLayer::FraClaims => "fra-claims",
            ActiveLayer::CommunityRights => "community-rights",
            ActiveLayer::PendingClaims => "pending-claims",
            ActiveLayer::Other(id) => id,
        }
    }

    /// Whether claims of `category` belong to this selection.
    pub fn admits(&self, category: ClaimCategory) -> bool {
        match self {
            ActiveLayer::FraClaims => true,
            ActiveLayer::CommunityRights => category == ClaimCategory::Community,
            ActiveLayer::PendingClaims => category == ClaimCategory::Pending,
            ActiveLayer::Other(_) => false,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ActiveLayer::FraClaims => "FRA Claims",
            ActiveLayer::CommunityRights => "Community Rights",
            ActiveLayer::PendingClaims => "Pending Claims",
            ActiveLayer::Other(id) => id,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ActiveLayer::FraClaims => ClaimCategory::Approved.color(),
            ActiveLayer::CommunityRights => ClaimCategory::Community.color(),
            ActiveLayer::PendingClaims => ClaimCategory::Pending.color(),
            ActiveLayer::Other(_) => "#94a3b8",
        }
    }
}

impl From<String> for ActiveLayer {
    fn from(id: String) -> Self {
        ActiveLayer::from_id(&id)
    }
}

impl From<ActiveLayer> for String {
    fn from(layer: ActiveLayer) -> Self {
        layer.id().to_string()
    }
}
