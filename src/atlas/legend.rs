// src/atlas/legend.rs
// Sidebar aggregates: layer button counts, category legend, quick stats
// RELEVANT FILES: src/atlas/mod.rs, src/features/claim.rs, src/filter/mod.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::features::claim::{ClaimCategory, ClaimFeature};
use crate::features::geometry::Bounds;
use crate::features::store::bounds_of;
use crate::filter::FilterMachine;
use crate::layers::overlay::ActiveLayer;
use crate::layers::registry::LayerOption;

/// Layer toggle with the number of claims it would show in the current area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerButton {
    #[serde(flatten)]
    pub option: LayerOption,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: ClaimCategory,
    pub label: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub community: usize,
    /// Acres across approved claims.
    pub approved_land_area: f64,
    pub extent: Option<Bounds>,
}

/// Per-category counts of the given features.
pub fn category_counts<'a, I>(features: I) -> BTreeMap<ClaimCategory, usize>
where
    I: IntoIterator<Item = &'a ClaimFeature>,
{
    let mut counts = BTreeMap::new();
    for feature in features {
        *counts.entry(feature.category).or_insert(0) += 1;
    }
    counts
}

/// Legend rows for categories that actually appear, in category order.
pub fn legend(visible: &[&ClaimFeature]) -> Vec<LegendEntry> {
    let counts = category_counts(visible.iter().copied());
    ClaimCategory::ALL
        .iter()
        .filter_map(|&category| {
            let count = counts.get(&category).copied().unwrap_or(0);
            (count > 0).then(|| LegendEntry {
                category,
                label: category.legend_label().to_string(),
                color: category.color().to_string(),
                count,
            })
        })
        .collect()
}

/// One button per claim layer, counted over the selected area.
pub fn layer_buttons(options: Vec<LayerOption>, features: &[ClaimFeature], filter: &FilterMachine) -> Vec<LayerButton> {
    let in_area: Vec<&ClaimFeature> = features.iter().filter(|f| filter.in_selected_area(f)).collect();
    options
        .into_iter()
        .map(|option| {
            let layer = ActiveLayer::from_id(&option.id);
            let count = in_area.iter().filter(|f| layer.admits(f.category)).count();
            let active = layer == *filter.active_layer();
            LayerButton { option, count, active }
        })
        .collect()
}

/// Totals over the selected area, independent of the active layer.
pub fn quick_stats(features: &[ClaimFeature], filter: &FilterMachine) -> QuickStats {
    let in_area: Vec<&ClaimFeature> = features.iter().filter(|f| filter.in_selected_area(f)).collect();
    let counts = category_counts(in_area.iter().copied());
    let count = |c: ClaimCategory| counts.get(&c).copied().unwrap_or(0);
    QuickStats {
        total: in_area.len(),
        approved: count(ClaimCategory::Approved),
        pending: count(ClaimCategory::Pending),
        community: count(ClaimCategory::Community),
        approved_land_area: in_area
            .iter()
            .filter(|f| f.category == ClaimCategory::Approved)
            .map(|f| f.attributes.land_area)
            .sum(),
        extent: bounds_of(in_area.iter().copied()),
    }
}
