//! Claim records as delivered by the claims-data collaborator and their
//! normalized, map-ready form.

use serde::{Deserialize, Serialize};

use crate::features::geometry::LngLat;

/// Claim record exactly as the data provider yields it.
///
/// Coordinates are optional here: validation happens in the feature store,
/// not at deserialization, so one bad record never fails a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClaim {
    pub id: String,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub beneficiary: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub land_area: f64,
    /// State name, e.g. "Chhattisgarh".
    #[serde(default)]
    pub state: Option<String>,
    /// District name, e.g. "Bastar".
    #[serde(default)]
    pub district: Option<String>,
}

impl RawClaim {
    pub fn new(id: &str, lon: f64, lat: f64, category: &str) -> Self {
        Self {
            id: id.to_string(),
            lon: Some(lon),
            lat: Some(lat),
            category: category.to_string(),
            ..Default::default()
        }
    }

    pub fn with_beneficiary(mut self, name: &str, village: &str, land_area: f64) -> Self {
        self.beneficiary = name.to_string();
        self.village = village.to_string();
        self.land_area = land_area;
        self
    }

    pub fn with_area(mut self, state: &str, district: &str) -> Self {
        self.state = Some(state.to_string());
        self.district = Some(district.to_string());
        self
    }
}

/// Claim category. Drives marker colour and legend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    Approved,
    Pending,
    Community,
}

impl ClaimCategory {
    pub const ALL: [ClaimCategory; 3] = [
        ClaimCategory::Approved,
        ClaimCategory::Pending,
        ClaimCategory::Community,
    ];

    /// Case-insensitive parse; unknown statuses yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "approved" => Some(ClaimCategory::Approved),
            "pending" => Some(ClaimCategory::Pending),
            "community" => Some(ClaimCategory::Community),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimCategory::Approved => "approved",
            ClaimCategory::Pending => "pending",
            ClaimCategory::Community => "community",
        }
    }

    /// Marker fill colour.
    pub fn color(self) -> &'static str {
        match self {
            ClaimCategory::Approved => "#22c55e",
            ClaimCategory::Pending => "#f59e0b",
            ClaimCategory::Community => "#3b82f6",
        }
    }

    /// Legend caption.
    pub fn legend_label(self) -> &'static str {
        match self {
            ClaimCategory::Approved => "Approved Claims",
            ClaimCategory::Pending => "Pending Claims",
            ClaimCategory::Community => "Community Rights",
        }
    }
}

/// Display payload. Opaque to the map beyond popup rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAttributes {
    pub claim_id: String,
    pub beneficiary: String,
    pub village: String,
    /// Acres.
    pub land_area: f64,
}

/// Resolved administrative area as lowercase slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminArea {
    pub region: Option<String>,
    pub district: Option<String>,
}

/// One map-visible claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimFeature {
    pub id: String,
    pub position: LngLat,
    pub category: ClaimCategory,
    pub attributes: ClaimAttributes,
    #[serde(default)]
    pub area: AdminArea,
}

/// Lowercase slug used for region and district matching ("Bastar" -> "bastar").
pub fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
