//! Layer registry: overlay catalog, paint styles and the claim layer selection.
//!
//! Overlays are described in MapLibre style-spec terms (`fill` layers with
//! `fill-color`/`fill-opacity` paint) so they can be handed to a renderer
//! unchanged. Paint order is fixed: forest < water < community < markers.

pub mod overlay;
pub mod registry;
pub mod style;

pub use overlay::{ActiveLayer, GeometryType, OverlayLayer};
pub use registry::{
    default_overlays, LayerOption, LayerRegistry, BASE_MAP_ID, DEFAULT_OVERLAY_Z, MARKER_Z,
};
pub use style::{parse_color_string, FillPaint, LayerKind, LayerSpec};
