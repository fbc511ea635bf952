//! Geospatial claims atlas: forest-rights claims on an interactive map.
//!
//! Raw claim records are normalized into point features, filtered by region,
//! district and claim layer, and kept mounted on a map surface as markers
//! above a fixed stack of thematic overlays. The map library sits behind the
//! [`surface::MapFactory`]/[`surface::MapRenderer`] traits; a headless
//! implementation backs the CLI and the tests.

pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod layers;
pub mod markers;
pub mod surface;

pub use atlas::{AtlasView, MapPanel, Sidebar, ViewerRole};
pub use config::{AtlasConfig, ConfigError, MapOptions};
pub use error::{AtlasError, AtlasResult};
pub use features::{ClaimCategory, ClaimFeature, FeatureStore, LngLat, RawClaim};
pub use filter::{FilterChange, FilterMachine, FilterState, ALL_SUB_REGIONS};
pub use layers::{ActiveLayer, LayerRegistry, OverlayLayer};
pub use surface::{Container, HeadlessFactory, MapSurface, SurfaceState};
