// src/features/geometry.rs
// WGS84 positions, bounds and GeoJSON-equivalent polygon collections
// RELEVANT FILES: src/features/claim.rs, src/layers/overlay.rs

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in WGS84 decimal degrees.
///
/// Serialized as a `[lon, lat]` array, matching GeoJSON position order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build a position only if both components are finite and in range.
    pub fn checked(lon: f64, lat: f64) -> Option<Self> {
        let p = Self::new(lon, lat);
        p.is_valid().then_some(p)
    }

    /// True when finite and inside [-180, 180] x [-90, 90].
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lon, p.lat]
    }
}

impl From<DVec2> for LngLat {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Axis-aligned geographic extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl Bounds {
    /// Extent of a set of positions, `None` when the set is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LngLat>,
    {
        let mut iter = points.into_iter().map(|p| p.as_dvec2());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self {
            min: min.into(),
            max: max.into(),
        })
    }

    pub fn contains(&self, p: LngLat) -> bool {
        let v = p.as_dvec2();
        v.cmpge(self.min.as_dvec2()).all() && v.cmple(self.max.as_dvec2()).all()
    }
}

/// Supported geometry kinds. Overlays are polygon-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Exterior ring first, then holes. Rings are closed.
    Polygon { coordinates: Vec<Vec<LngLat>> },
}

impl Geometry {
    /// Polygon from a single exterior ring; the ring is closed if needed.
    pub fn polygon(exterior: Vec<LngLat>) -> Self {
        let mut ring = exterior;
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if !first.as_dvec2().abs_diff_eq(last.as_dvec2(), 1e-12) {
                ring.push(first);
            }
        }
        Geometry::Polygon {
            coordinates: vec![ring],
        }
    }

    /// Axis-aligned rectangle, convenient for catalog defaults.
    pub fn rectangle(min: LngLat, max: LngLat) -> Self {
        Self::polygon(vec![
            min,
            LngLat::new(max.lon, min.lat),
            max,
            LngLat::new(min.lon, max.lat),
        ])
    }

    /// Every ring is closed, has at least four positions, and every position is valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Polygon { coordinates } => {
                !coordinates.is_empty()
                    && coordinates.iter().all(|ring| {
                        ring.len() >= 4
                            && ring.iter().all(LngLat::is_valid)
                            && ring[0]
                                .as_dvec2()
                                .abs_diff_eq(ring[ring.len() - 1].as_dvec2(), 1e-12)
                    })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// One GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type", default)]
    pub kind: FeatureTag,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl GeoFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: FeatureTag::Feature,
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// GeoJSON FeatureCollection used as overlay source data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    #[serde(rename = "type", default)]
    pub kind: CollectionTag,
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

impl GeometryCollection {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.features.iter().all(|f| f.geometry.is_valid())
    }

    /// Serialize to the JSON value handed to the renderer as source data.
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
