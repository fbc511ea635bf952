// src/features/mod.rs
// Feature store: claim records normalized into map-ready point features
// RELEVANT FILES: src/features/claim.rs, src/features/geometry.rs, src/features/store.rs

pub mod claim;
pub mod geometry;
pub mod store;

pub use claim::{AdminArea, ClaimAttributes, ClaimCategory, ClaimFeature, RawClaim};
pub use geometry::{Bounds, GeoFeature, Geometry, GeometryCollection, LngLat};
pub use store::{bounds_of, normalize, to_features, FeatureStore};
