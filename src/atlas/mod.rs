// src/atlas/mod.rs
// Atlas view: composition root wiring store, registry, filter and map surface
// RELEVANT FILES: src/atlas/legend.rs, src/atlas/overlays.rs, src/surface/mod.rs, src/filter/mod.rs

pub mod controls;
pub mod legend;
pub mod overlays;

pub use controls::{Panel, PanelState, ViewerRole};
pub use legend::{category_counts, layer_buttons, legend, quick_stats, LayerButton, LegendEntry, QuickStats};
pub use overlays::{sync_overlays, MountedOverlay};

use std::rc::Rc;

use log::{info, warn};
use serde::Serialize;

use crate::config::AtlasConfig;
use crate::error::AtlasResult;
use crate::features::claim::{ClaimFeature, RawClaim};
use crate::features::store::FeatureStore;
use crate::filter::{FilterChange, FilterMachine, FilterState, SelectOption};
use crate::layers::registry::LayerRegistry;
use crate::markers::controller::reconcile;
use crate::surface::{Container, MapFactory, MapSurface, SurfaceState};

/// What the map area of the page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapPanel {
    /// Not mounted yet.
    Empty,
    Map,
    /// The map could not be created; the sidebar keeps working.
    Unavailable { reason: String },
}

/// Everything the sidebar renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub view_label: String,
    pub filter: FilterState,
    pub region_options: Vec<SelectOption>,
    pub sub_region_options: Vec<SelectOption>,
    pub layers: Vec<LayerButton>,
    pub legend: Vec<LegendEntry>,
    pub stats: QuickStats,
    pub panels: PanelState,
}

/// Atlas page state.
///
/// Every selection commits the filter first, then brings overlays and
/// markers in line with it, so the map never lags the selectors.
#[derive(Debug)]
pub struct AtlasView {
    config: AtlasConfig,
    registry: LayerRegistry,
    store: FeatureStore,
    filter: FilterMachine,
    surface: MapSurface,
    role: ViewerRole,
    panels: PanelState,
    panel: MapPanel,
}

impl AtlasView {
    pub fn new(config: AtlasConfig, role: ViewerRole) -> AtlasResult<Self> {
        config.validate()?;
        let registry = config.registry()?;
        let initial = FilterState {
            region: config.default_region.clone(),
            sub_region: config.default_sub_region.clone(),
            active_layer: config.default_layer.clone(),
        };
        Ok(Self {
            filter: FilterMachine::new(config.regions.clone(), initial),
            store: FeatureStore::new(config.regions.clone()),
            registry,
            surface: MapSurface::new(),
            role,
            panels: PanelState::default(),
            panel: MapPanel::Empty,
            config,
        })
    }

    /// Create the map in `container`. Failure degrades to
    /// [`MapPanel::Unavailable`]; the rest of the page stays usable.
    pub fn mount(&mut self, factory: &mut dyn MapFactory, container: Option<&Container>) -> &MapPanel {
        if self.surface.state() == SurfaceState::Destroyed {
            self.surface = MapSurface::new();
        }
        self.panel = match self.surface.mount(factory, container, &self.config.map) {
            Ok(()) => MapPanel::Map,
            Err(err) => {
                warn!("[{}] {err}", err.category());
                MapPanel::Unavailable {
                    reason: err.to_string(),
                }
            }
        };
        &self.panel
    }

    /// The map's load event: flush queued calls, then mount the current selection.
    pub fn on_map_ready(&mut self) {
        self.surface.mark_ready();
        self.sync(true);
    }

    pub fn select_region(&mut self, region: &str) -> FilterChange {
        let change = self.filter.set_region(region);
        self.commit(change)
    }

    pub fn select_sub_region(&mut self, sub_region: &str) -> FilterChange {
        let change = self.filter.set_sub_region(sub_region);
        self.commit(change)
    }

    pub fn select_layer(&mut self, layer_id: &str) -> FilterChange {
        let change = self.filter.set_active_layer(layer_id);
        self.commit(change)
    }

    /// Replace the claim dataset.
    pub fn set_claims(&mut self, raw: Vec<RawClaim>) {
        self.store.replace(raw);
        self.sync(false);
    }

    pub fn toggle_panel(&mut self, panel: Panel) -> bool {
        self.panels.toggle(panel)
    }

    /// Destroy the map surface. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.surface.destroy();
        self.panel = MapPanel::Empty;
    }

    pub fn sidebar(&mut self) -> Sidebar {
        let features = self.store.snapshot();
        let visible = self.filter.visible(&features);
        Sidebar {
            view_label: self.role.view_label().to_string(),
            filter: self.filter.state().clone(),
            region_options: self.filter.region_options(),
            sub_region_options: self.filter.sub_region_options(),
            layers: layer_buttons(self.registry.layer_options(), &features, &self.filter),
            legend: legend(&visible),
            stats: quick_stats(&features, &self.filter),
            panels: self.panels,
        }
    }

    pub fn features(&mut self) -> Rc<[ClaimFeature]> {
        self.store.snapshot()
    }

    pub fn filter(&self) -> &FilterMachine {
        &self.filter
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn panel(&self) -> &MapPanel {
        &self.panel
    }

    pub fn role(&self) -> ViewerRole {
        self.role
    }

    fn commit(&mut self, change: FilterChange) -> FilterChange {
        if !change.is_empty() {
            info!("filter -> {:?}", self.filter.state());
            self.sync(change.affects_overlays());
        }
        change
    }

    /// Bring markers, and overlays when asked, in line with the committed
    /// filter and data.
    fn sync(&mut self, overlays: bool) {
        if self.panel != MapPanel::Map {
            return;
        }
        if overlays {
            let active = self.filter.active_layer().clone();
            sync_overlays(&mut self.surface, &self.registry, &active);
        }
        let features = self.store.snapshot();
        reconcile(&mut self.surface, &features, &self.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessFactory;

    fn claims() -> Vec<RawClaim> {
        vec![
            RawClaim::new("FRA/CGH/BST/2024/001", 81.2849, 19.1383, "approved"),
            RawClaim::new("FRA/CGH/BST/2024/002", 81.3849, 19.2383, "pending"),
            RawClaim::new("FRA/CGH/KNK/2024/003", 81.1849, 19.0383, "community"),
        ]
    }

    fn mounted(factory: &mut HeadlessFactory) -> AtlasView {
        let mut atlas = AtlasView::new(AtlasConfig::default(), ViewerRole::Officer).unwrap();
        atlas.set_claims(claims());
        atlas.mount(factory, Some(&Container::new("map", 800, 600)));
        atlas.on_map_ready();
        atlas
    }

    #[test]
    fn ready_mounts_overlays_and_markers() {
        let mut factory = HeadlessFactory::new();
        let atlas = mounted(&mut factory);
        let scene = factory.scene("map").unwrap();
        assert_eq!(scene.layers.len(), 4);
        assert_eq!(scene.layers[..2], ["osm", "forest-layer"]);
        assert_eq!(scene.markers.len(), 3);
        assert_eq!(atlas.panel(), &MapPanel::Map);
    }

    #[test]
    fn selections_before_ready_are_applied_on_ready() {
        let mut factory = HeadlessFactory::new();
        let mut atlas = AtlasView::new(AtlasConfig::default(), ViewerRole::User).unwrap();
        atlas.set_claims(claims());
        atlas.mount(&mut factory, Some(&Container::new("map", 800, 600)));
        atlas.select_layer("pending-claims");
        assert!(factory.calls().is_empty());

        atlas.on_map_ready();
        let scene = factory.scene("map").unwrap();
        assert_eq!(scene.layers, ["osm", "forest-layer", "water-layer"]);
        assert_eq!(scene.markers.keys().collect::<Vec<_>>(), ["FRA/CGH/BST/2024/002"]);
    }

    #[test]
    fn district_selection_uses_claim_id_codes() {
        let mut factory = HeadlessFactory::new();
        let mut atlas = mounted(&mut factory);
        atlas.select_sub_region("kanker");
        assert_eq!(atlas.surface().markers().len(), 1);
        assert!(atlas.surface().has_marker("FRA/CGH/KNK/2024/003"));

        let change = atlas.select_region("chhattisgarh");
        assert!(change.sub_region);
        assert_eq!(atlas.surface().markers().len(), 3);
    }

    #[test]
    fn area_selection_leaves_overlays_alone() {
        let mut factory = HeadlessFactory::new();
        let mut atlas = mounted(&mut factory);
        factory.clear_calls();

        atlas.select_sub_region("bastar");
        atlas.select_region("odisha");
        let calls = factory.calls();
        assert!(!calls.is_empty());
        assert!(calls.iter().all(|c| c.name().ends_with("_marker")));
    }

    #[test]
    fn missing_container_falls_back() {
        let mut factory = HeadlessFactory::new();
        let mut atlas = AtlasView::new(AtlasConfig::default(), ViewerRole::Admin).unwrap();
        atlas.set_claims(claims());
        let panel = atlas.mount(&mut factory, None).clone();
        assert!(matches!(panel, MapPanel::Unavailable { .. }));

        atlas.select_layer("pending-claims");
        let sidebar = atlas.sidebar();
        assert_eq!(sidebar.view_label, "State View");
        assert_eq!(sidebar.legend.len(), 1);
        assert!(factory.calls().is_empty());
    }

    #[test]
    fn unmount_then_mount_starts_empty() {
        let mut factory = HeadlessFactory::new();
        let mut atlas = mounted(&mut factory);
        atlas.unmount();
        atlas.unmount();
        assert!(!factory.is_occupied("map"));

        let panel = atlas.mount(&mut factory, Some(&Container::new("map", 800, 600))).clone();
        assert_eq!(panel, MapPanel::Map);
        assert_eq!(factory.scene("map").unwrap().layers, ["osm"]);
        atlas.on_map_ready();
        assert_eq!(factory.scene("map").unwrap().markers.len(), 3);
    }
}
