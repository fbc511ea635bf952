//! Filter state machine behind the region, district and layer selectors.
//!
//! Every transition is total: unknown values are stored as-is and simply
//! match nothing. Changing the region always resets the district to
//! [`ALL_SUB_REGIONS`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::regions::RegionCatalog;
use crate::features::claim::ClaimFeature;
use crate::layers::overlay::ActiveLayer;

/// District selector value meaning "no district restriction".
pub const ALL_SUB_REGIONS: &str = "all";

/// Current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub region: String,
    pub sub_region: String,
    pub active_layer: ActiveLayer,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            region: "chhattisgarh".to_string(),
            sub_region: ALL_SUB_REGIONS.to_string(),
            active_layer: ActiveLayer::FraClaims,
        }
    }
}

/// Which parts of the selection a transition touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChange {
    pub region: bool,
    pub sub_region: bool,
    pub layer: bool,
}

impl FilterChange {
    pub fn is_empty(&self) -> bool {
        !(self.region || self.sub_region || self.layer)
    }

    /// Bucketed overlays only depend on the active layer.
    pub fn affects_overlays(&self) -> bool {
        self.layer
    }
}

/// Value/label pair for a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct FilterMachine {
    state: FilterState,
    catalog: RegionCatalog,
}

impl FilterMachine {
    pub fn new(catalog: RegionCatalog, initial: FilterState) -> Self {
        Self {
            state: initial,
            catalog,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn active_layer(&self) -> &ActiveLayer {
        &self.state.active_layer
    }

    /// Select a region and reset the district to "all".
    pub fn set_region(&mut self, region: &str) -> FilterChange {
        let change = FilterChange {
            region: self.state.region != region,
            sub_region: self.state.sub_region != ALL_SUB_REGIONS,
            layer: false,
        };
        self.state.region = region.to_string();
        self.state.sub_region = ALL_SUB_REGIONS.to_string();
        if !self.catalog.contains_region(region) {
            debug!("region '{region}' is not in the catalog; no claims will match");
        }
        change
    }

    pub fn set_sub_region(&mut self, sub_region: &str) -> FilterChange {
        let change = FilterChange {
            sub_region: self.state.sub_region != sub_region,
            ..Default::default()
        };
        self.state.sub_region = sub_region.to_string();
        change
    }

    pub fn set_active_layer(&mut self, layer_id: &str) -> FilterChange {
        let layer = ActiveLayer::from_id(layer_id);
        let change = FilterChange {
            layer: self.state.active_layer != layer,
            ..Default::default()
        };
        if let ActiveLayer::Other(id) = &layer {
            debug!("layer '{id}' is not a claim layer; no claims will match");
        }
        self.state.active_layer = layer;
        change
    }

    /// Region and district test, ignoring the active layer.
    ///
    /// A feature without a resolved region sits in every region the catalog
    /// knows, but never in a concrete district.
    pub fn in_selected_area(&self, feature: &ClaimFeature) -> bool {
        let region_ok = match feature.area.region.as_deref() {
            Some(region) => region == self.state.region,
            None => self.catalog.contains_region(&self.state.region),
        };
        let district_ok = self.state.sub_region == ALL_SUB_REGIONS
            || feature.area.district.as_deref() == Some(self.state.sub_region.as_str());
        region_ok && district_ok
    }

    pub fn matches(&self, feature: &ClaimFeature) -> bool {
        self.state.active_layer.admits(feature.category) && self.in_selected_area(feature)
    }

    /// Features passing the current filter, input order preserved.
    pub fn visible<'a>(&self, features: &'a [ClaimFeature]) -> Vec<&'a ClaimFeature> {
        features.iter().filter(|f| self.matches(f)).collect()
    }

    pub fn region_options(&self) -> Vec<SelectOption> {
        self.catalog
            .regions()
            .iter()
            .map(|r| SelectOption {
                value: r.id.clone(),
                label: r.name.clone(),
            })
            .collect()
    }

    /// "All Districts" followed by the districts of the selected region.
    pub fn sub_region_options(&self) -> Vec<SelectOption> {
        std::iter::once(SelectOption {
            value: ALL_SUB_REGIONS.to_string(),
            label: "All Districts".to_string(),
        })
        .chain(self.catalog.districts(&self.state.region).iter().map(|d| SelectOption {
            value: d.id.clone(),
            label: d.name.clone(),
        }))
        .collect()
    }
}

impl Default for FilterMachine {
    fn default() -> Self {
        Self::new(RegionCatalog::default(), FilterState::default())
    }
}
