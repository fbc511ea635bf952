// src/markers/controller.rs
// Keeps mounted claim markers equal to the filtered feature set
// RELEVANT FILES: src/markers/reconcile.rs, src/markers/popup.rs, src/surface/mod.rs

use std::collections::BTreeMap;

use log::debug;

use crate::features::claim::ClaimFeature;
use crate::filter::FilterMachine;
use crate::markers::popup::MarkerSpec;
use crate::markers::reconcile::{plan, Change, Diff};
use crate::surface::{MapSurface, SurfaceState};

/// Markers that should be mounted for the current filter, keyed by claim id.
pub fn desired_markers(features: &[ClaimFeature], filter: &FilterMachine) -> BTreeMap<String, MarkerSpec> {
    filter
        .visible(features)
        .into_iter()
        .map(|f| (f.id.clone(), MarkerSpec::for_feature(f)))
        .collect()
}

/// Popup-only differences are patched; a moved or recoloured marker is rebuilt.
pub fn marker_change(mounted: &MarkerSpec, desired: &MarkerSpec) -> Change {
    if mounted == desired {
        Change::Same
    } else if mounted.same_anchor(desired) {
        Change::Update
    } else {
        Change::Replace
    }
}

/// Bring the surface's markers in line with `features` under `filter`.
///
/// Removals run before additions so a replaced marker never coexists with
/// its successor. A second call with the same inputs returns an empty diff.
pub fn reconcile(surface: &mut MapSurface, features: &[ClaimFeature], filter: &FilterMachine) -> Diff<MarkerSpec> {
    if surface.state() == SurfaceState::Destroyed {
        return Diff::default();
    }
    let desired = desired_markers(features, filter);
    let diff = plan(surface.markers(), &desired, marker_change);
    if diff.is_empty() {
        return diff;
    }

    for id in &diff.remove {
        surface.remove_marker(id);
    }
    for marker in &diff.add {
        surface.add_marker(marker.clone());
    }
    for marker in &diff.update {
        surface.set_marker_popup(&marker.id, marker.popup.clone());
    }
    debug!(
        "markers reconciled: +{} ~{} -{} ({} mounted)",
        diff.add.len(),
        diff.update.len(),
        diff.remove.len(),
        surface.markers().len()
    );
    diff
}
