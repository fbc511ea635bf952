//! Keeps mounted overlays equal to what the registry wants for the active layer.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::layers::overlay::{ActiveLayer, OverlayLayer};
use crate::layers::registry::LayerRegistry;
use crate::layers::style::LayerSpec;
use crate::markers::reconcile::{plan, Change, Diff};
use crate::surface::MapSurface;

/// An overlay as it sits on the surface: layer, paint order and source data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountedOverlay {
    pub layer: LayerSpec,
    pub z: i32,
    pub data: serde_json::Value,
}

impl From<&OverlayLayer> for MountedOverlay {
    fn from(overlay: &OverlayLayer) -> Self {
        Self {
            layer: overlay.layer_spec(),
            z: overlay.z_order,
            data: overlay.source_data.to_geojson(),
        }
    }
}

/// New data alone is pushed into the existing source; anything else remounts.
fn overlay_change(mounted: &MountedOverlay, desired: &MountedOverlay) -> Change {
    if mounted == desired {
        Change::Same
    } else if mounted.layer == desired.layer && mounted.z == desired.z {
        Change::Update
    } else {
        Change::Replace
    }
}

/// Registry overlays currently on the surface, keyed by layer id.
fn mounted_overlays(surface: &MapSurface, registry: &LayerRegistry) -> BTreeMap<String, MountedOverlay> {
    registry
        .overlays()
        .iter()
        .filter_map(|o| {
            let mounted = surface.layer(&o.id)?;
            Some((
                o.id.clone(),
                MountedOverlay {
                    layer: mounted.spec.clone(),
                    z: mounted.z,
                    data: surface
                        .source_data(&mounted.spec.source)
                        .cloned()
                        .unwrap_or(serde_json::Value::Null),
                },
            ))
        })
        .collect()
}

/// Mount the overlays `active` admits and unmount the rest.
///
/// Static overlays are admitted by every selection, so they are mounted
/// once and never touched again.
pub fn sync_overlays(surface: &mut MapSurface, registry: &LayerRegistry, active: &ActiveLayer) -> Diff<MountedOverlay> {
    let desired: BTreeMap<String, MountedOverlay> = registry
        .definitions_for(active)
        .into_iter()
        .map(|o| (o.id.clone(), MountedOverlay::from(o)))
        .collect();
    let mounted = mounted_overlays(surface, registry);
    let diff = plan(&mounted, &desired, overlay_change);

    for id in &diff.remove {
        if let Some(current) = mounted.get(id) {
            surface.remove_source(&current.layer.source);
        }
        surface.remove_layer(id);
    }
    for overlay in &diff.add {
        surface.add_source(&overlay.layer.source, overlay.data.clone());
        surface.add_layer(overlay.layer.clone(), overlay.z);
    }
    for overlay in &diff.update {
        surface.add_source(&overlay.layer.source, overlay.data.clone());
    }
    if !diff.is_empty() {
        debug!(
            "overlays for '{}': +{} ~{} -{} -> {:?}",
            active.id(),
            diff.add.len(),
            diff.update.len(),
            diff.remove.len(),
            surface.layer_ids()
        );
    }
    diff
}
