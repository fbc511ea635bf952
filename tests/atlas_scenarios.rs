// tests/atlas_scenarios.rs
//! End-to-end atlas scenarios against the headless map: layer switching,
//! region resets, reconciliation and surface lifecycle.

use std::collections::BTreeMap;

use fra_atlas::atlas::{AtlasView, MapPanel, Panel, ViewerRole};
use fra_atlas::config::AtlasConfig;
use fra_atlas::features::{ClaimCategory, RawClaim};
use fra_atlas::markers::{reconcile, Diff, MarkerSpec};
use fra_atlas::surface::{Container, HeadlessFactory, RendererCall};

fn three_claims() -> Vec<RawClaim> {
    vec![
        RawClaim::new("c-approved", 81.28, 19.14, "approved").with_beneficiary("Ramesh Kumar", "Kondagaon", 2.5),
        RawClaim::new("c-pending", 81.38, 19.24, "pending").with_beneficiary("Sunita Devi", "Tokapal", 1.8),
        RawClaim::new("c-community", 81.18, 19.04, "community").with_beneficiary("Mohan Lal", "Bhanupratappur", 3.2),
    ]
}

fn container() -> Container {
    Container::new("map", 1024, 768)
}

fn ready_atlas(factory: &mut HeadlessFactory, claims: Vec<RawClaim>) -> AtlasView {
    let mut atlas = AtlasView::new(AtlasConfig::default(), ViewerRole::User).expect("default config");
    atlas.set_claims(claims);
    assert_eq!(atlas.mount(factory, Some(&container())), &MapPanel::Map);
    atlas.on_map_ready();
    atlas
}

fn legend_counts(atlas: &mut AtlasView) -> BTreeMap<ClaimCategory, usize> {
    atlas.sidebar().legend.into_iter().map(|e| (e.category, e.count)).collect()
}

#[test]
fn three_claims_all_layers_then_pending_only() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());

    assert_eq!(atlas.surface().markers().len(), 3);
    assert_eq!(
        legend_counts(&mut atlas),
        BTreeMap::from([
            (ClaimCategory::Approved, 1),
            (ClaimCategory::Pending, 1),
            (ClaimCategory::Community, 1)
        ])
    );

    factory.clear_calls();
    atlas.select_layer("pending-claims");

    let markers: Vec<_> = atlas.surface().markers().keys().cloned().collect();
    assert_eq!(markers, ["c-pending"]);
    assert_eq!(legend_counts(&mut atlas), BTreeMap::from([(ClaimCategory::Pending, 1)]));

    let removed: Vec<_> = factory
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RendererCall::RemoveMarker { id } => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(removed, ["c-approved", "c-community"]);
    assert!(!factory.calls().iter().any(|c| matches!(c, RendererCall::AddMarker { .. })));

    // static overlays stay, the community overlay goes
    let scene = factory.scene("map").unwrap();
    assert_eq!(scene.layers, ["osm", "forest-layer", "water-layer"]);
}

#[test]
fn reconcile_is_idempotent_through_the_public_api() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());
    let before = factory.call_count();

    atlas.select_layer("fra-claims");
    atlas.select_region("chhattisgarh");
    atlas.set_claims(three_claims());
    assert_eq!(factory.call_count(), before);
}

#[test]
fn direct_reconcile_twice_yields_empty_diff() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());
    let features = atlas.features();
    let filter = atlas.filter().clone();

    let mut surface = fra_atlas::MapSurface::new();
    surface
        .mount(&mut factory, Some(&Container::new("second", 400, 300)), &AtlasConfig::default().map)
        .unwrap();
    surface.mark_ready();

    let first: Diff<MarkerSpec> = reconcile(&mut surface, &features, &filter);
    assert_eq!(first.add.len(), 3);
    assert!(reconcile(&mut surface, &features, &filter).is_empty());
}

#[test]
fn region_change_resets_district_selector() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());

    atlas.select_sub_region("bastar");
    assert_eq!(atlas.sidebar().filter.sub_region, "bastar");

    atlas.select_region("odisha");
    let sidebar = atlas.sidebar();
    assert_eq!(sidebar.filter.sub_region, "all");
    let districts: Vec<_> = sidebar.sub_region_options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(districts, ["all", "mayurbhanj", "koraput"]);
}

#[test]
fn unknown_region_shows_zero_claims_without_error() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());
    atlas.select_region("atlantis");

    let sidebar = atlas.sidebar();
    assert_eq!(sidebar.stats.total, 0);
    assert!(sidebar.legend.is_empty());
    assert!(atlas.surface().markers().is_empty());
    assert!(sidebar.layers.iter().all(|b| b.count == 0));
}

#[test]
fn district_without_state_stays_in_its_region() {
    let mut claims = three_claims();
    claims.push(RawClaim {
        district: Some("Bastar".into()),
        ..RawClaim::new("c-bastar", 81.9, 19.1, "approved")
    });
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, claims);

    atlas.select_sub_region("bastar");
    assert!(atlas.surface().markers().contains_key("c-bastar"));

    // claims without any area still follow every region, the Bastar one does not
    atlas.select_region("odisha");
    assert!(!atlas.surface().markers().contains_key("c-bastar"));
    assert_eq!(atlas.surface().markers().len(), 3);
}

#[test]
fn invalid_records_are_excluded_not_placed_at_origin() {
    let mut claims = three_claims();
    claims.push(RawClaim::new("broken", f64::NAN, 19.0, "approved"));
    claims.push(RawClaim {
        id: "no-coords".into(),
        category: "pending".into(),
        ..Default::default()
    });
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, claims);

    assert_eq!(atlas.sidebar().stats.total, 3);
    let scene = factory.scene("map").unwrap();
    assert_eq!(scene.markers.len(), 3);
    assert!(scene.markers.values().all(|m| m.position.is_valid()));
}

#[test]
fn popup_changes_patch_markers_in_place() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());
    factory.clear_calls();

    let mut updated = three_claims();
    updated[0].village = "Keshkal".into();
    atlas.set_claims(updated);

    let names: Vec<_> = factory.calls().iter().map(RendererCall::name).collect();
    assert_eq!(names, ["set_marker_popup"]);
    let scene = factory.scene("map").unwrap();
    assert_eq!(scene.markers["c-approved"].popup.attributes.village, "Keshkal");
}

#[test]
fn destroy_then_mount_in_same_container() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = ready_atlas(&mut factory, three_claims());
    atlas.unmount();
    assert!(!factory.is_occupied("map"));

    assert_eq!(atlas.mount(&mut factory, Some(&container())), &MapPanel::Map);
    let fresh = factory.scene("map").unwrap();
    assert!(fresh.markers.is_empty());
    assert_eq!(fresh.layers, ["osm"]);
    assert_eq!(fresh.sources.keys().collect::<Vec<_>>(), ["osm"]);

    atlas.on_map_ready();
    assert_eq!(factory.scene("map").unwrap().markers.len(), 3);
}

#[test]
fn second_atlas_in_occupied_container_falls_back() {
    let mut factory = HeadlessFactory::new();
    let _first = ready_atlas(&mut factory, three_claims());

    let mut second = AtlasView::new(AtlasConfig::default(), ViewerRole::Admin).unwrap();
    let panel = second.mount(&mut factory, Some(&container())).clone();
    match panel {
        MapPanel::Unavailable { reason } => assert!(reason.contains("already hosts a map")),
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[test]
fn sidebar_reflects_role_and_panels() {
    let mut factory = HeadlessFactory::new();
    let mut atlas = AtlasView::new(AtlasConfig::default(), ViewerRole::Officer).unwrap();
    atlas.mount(&mut factory, Some(&container()));
    atlas.toggle_panel(Panel::Stats);

    let sidebar = atlas.sidebar();
    assert_eq!(sidebar.view_label, "District View");
    assert!(!sidebar.panels.stats);

    let json = serde_json::to_value(&sidebar).unwrap();
    assert_eq!(json["filter"]["activeLayer"], "fra-claims");
    assert_eq!(json["layers"][0]["id"], "fra-claims");
}
