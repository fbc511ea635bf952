use super::*;
use crate::error::AtlasError;

#[test]
fn default_config_serializes_and_validates() {
    let cfg = AtlasConfig::default();
    let json = serde_json::to_string(&cfg).expect("serialize default config");
    let de = AtlasConfig::from_json_str(&json).expect("deserialize default config");
    assert_eq!(de.map, cfg.map);
    assert_eq!(de.regions, cfg.regions);
    assert_eq!(de.overlays, cfg.overlays);
}

#[test]
fn empty_object_takes_defaults() {
    let cfg = AtlasConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg.map.center, LngLat::new(81.2849, 19.1383));
    assert_eq!(cfg.map.zoom, 8.0);
    assert_eq!(cfg.default_region, "chhattisgarh");
    assert_eq!(cfg.default_sub_region, "all");
    assert_eq!(cfg.default_layer, ActiveLayer::FraClaims);
    assert_eq!(cfg.overlays.len(), 3);
}

#[test]
fn partial_map_section_keeps_other_defaults() {
    let cfg = AtlasConfig::from_json_str(r#"{"map": {"zoom": 10}, "defaultLayer": "pending-claims"}"#)
        .unwrap();
    assert_eq!(cfg.map.zoom, 10.0);
    assert_eq!(cfg.map.tile_size, 256);
    assert_eq!(cfg.default_layer, ActiveLayer::PendingClaims);
}

#[test]
fn rejects_out_of_range_zoom() {
    let err = AtlasConfig::from_json_str(r#"{"map": {"zoom": 30}}"#).unwrap_err();
    assert!(matches!(err, AtlasError::Config(_)));
    assert!(err.to_string().contains("map.zoom"));
}

#[test]
fn rejects_tile_url_without_placeholders() {
    let mut cfg = AtlasConfig::default();
    cfg.map.tile_url = "https://tiles.example/static.png".into();
    let err = cfg.validate().unwrap_err();
    assert!(err.message().contains("{z}"));
}

#[test]
fn default_region_must_exist() {
    let mut cfg = AtlasConfig::default();
    cfg.default_region = "kerala".into();
    assert!(cfg.validate().is_err());

    cfg.default_region = "odisha".into();
    cfg.default_sub_region = "bastar".into();
    assert!(cfg.validate().is_err());

    cfg.default_sub_region = "koraput".into();
    assert!(cfg.validate().is_ok());
}

#[test]
fn unknown_default_layer_is_rejected() {
    let err = AtlasConfig::from_json_str(r#"{"defaultLayer": "rejected-claims"}"#).unwrap_err();
    assert!(err.to_string().contains("rejected-claims"));
}

#[test]
fn duplicate_overlays_are_rejected() {
    let mut cfg = AtlasConfig::default();
    cfg.overlays.push(OverlayLayer::water_bodies());
    assert!(cfg.validate().is_err());
}

#[test]
fn reserved_district_id_is_rejected() {
    let mut cfg = AtlasConfig::default();
    cfg.regions = RegionCatalog::new(vec![
        RegionEntry::new("chhattisgarh", "Chhattisgarh", "CGH").with_district("all", "All", "ALL"),
    ]);
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_reports_json_error() {
    let err = AtlasConfig::from_json_str("{ not json").unwrap_err();
    assert_eq!(err.category(), "JSON");
}

#[test]
fn base_source_carries_tile_options() {
    let cfg = AtlasConfig::from_json_str(
        r#"{"map": {"tileUrl": "https://tiles.example.org/{z}/{x}/{y}.png", "tileSize": 512}}"#,
    )
    .unwrap();
    let source = cfg.map.base_source();
    assert_eq!(source["type"], "raster");
    assert_eq!(source["tiles"][0], "https://tiles.example.org/{z}/{x}/{y}.png");
    assert_eq!(source["tileSize"], 512);
    assert_eq!(source["attribution"], "© OpenStreetMap contributors");
    assert_eq!(cfg.map.base_layer().source, "osm");
}
