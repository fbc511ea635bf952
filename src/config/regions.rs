// src/config/regions.rs
// Region (state) and sub-region (district) catalog backing the dependent selectors
// RELEVANT FILES: src/config/mod.rs, src/filter/mod.rs, src/features/store.rs

use serde::{Deserialize, Serialize};

use crate::features::claim::{slug, AdminArea};

/// District entry within a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictEntry {
    /// Slug used as selector value, e.g. "bastar".
    pub id: String,
    pub name: String,
    /// Code used in claim ids, e.g. "BST".
    #[serde(default)]
    pub code: String,
}

/// Region (state) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub districts: Vec<DistrictEntry>,
}

impl RegionEntry {
    pub fn new(id: &str, name: &str, code: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            districts: Vec::new(),
        }
    }

    pub fn with_district(mut self, id: &str, name: &str, code: &str) -> Self {
        self.districts.push(DistrictEntry {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
        });
        self
    }

    /// Find a district by id, display name or claim-id code.
    pub fn district(&self, key: &str) -> Option<&DistrictEntry> {
        let key_slug = slug(key);
        self.districts.iter().find(|d| {
            d.id == key_slug || slug(&d.name) == key_slug || d.code.eq_ignore_ascii_case(key)
        })
    }
}

/// Ordered catalog of regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCatalog {
    regions: Vec<RegionEntry>,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::new(vec![
            RegionEntry::new("chhattisgarh", "Chhattisgarh", "CGH")
                .with_district("bastar", "Bastar", "BST")
                .with_district("kanker", "Kanker", "KNK")
                .with_district("kondagaon", "Kondagaon", "KDG"),
            RegionEntry::new("odisha", "Odisha", "ODI")
                .with_district("mayurbhanj", "Mayurbhanj", "MYB")
                .with_district("koraput", "Koraput", "KPT"),
            RegionEntry::new("jharkhand", "Jharkhand", "JHR")
                .with_district("ranchi", "Ranchi", "RNC")
                .with_district("gumla", "Gumla", "GML"),
        ])
    }
}

impl RegionCatalog {
    pub fn new(regions: Vec<RegionEntry>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    /// Find a region by id, display name or claim-id code.
    pub fn region(&self, key: &str) -> Option<&RegionEntry> {
        let key_slug = slug(key);
        self.regions.iter().find(|r| {
            r.id == key_slug || slug(&r.name) == key_slug || r.code.eq_ignore_ascii_case(key)
        })
    }

    pub fn contains_region(&self, id: &str) -> bool {
        self.regions.iter().any(|r| r.id == id)
    }

    /// Districts of a region; empty for unknown regions.
    pub fn districts(&self, region_id: &str) -> &[DistrictEntry] {
        self.regions
            .iter()
            .find(|r| r.id == region_id)
            .map(|r| r.districts.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve provider-supplied state/district names to catalog slugs.
    ///
    /// Names unknown to the catalog are kept as plain slugs, so they only
    /// ever match a selector value with the same spelling.
    /// A district given without a state takes its parent region from the
    /// catalog.
    pub fn resolve_names(&self, state: Option<&str>, district: Option<&str>) -> AdminArea {
        let mut region = state.map(|s| self.region(s).map(|r| r.id.clone()).unwrap_or_else(|| slug(s)));
        if region.is_none() {
            region = district
                .and_then(|d| self.regions.iter().find(|r| r.district(d).is_some()))
                .map(|r| r.id.clone());
        }
        let district = district.map(|d| {
            region
                .as_deref()
                .and_then(|r| self.regions.iter().find(|e| e.id == r))
                .and_then(|r| r.district(d))
                .map(|e| e.id.clone())
                .unwrap_or_else(|| slug(d))
        });
        AdminArea { region, district }
    }

    /// Infer the area from claim-id code segments, e.g. `FRA/CGH/BST/2024/001`.
    pub fn infer_from_claim_id(&self, claim_id: &str) -> AdminArea {
        let segments: Vec<&str> = claim_id.split('/').map(str::trim).collect();
        for (i, seg) in segments.iter().enumerate() {
            let Some(region) = self
                .regions
                .iter()
                .find(|r| !r.code.is_empty() && r.code.eq_ignore_ascii_case(seg))
            else {
                continue;
            };
            let district = segments.get(i + 1).and_then(|next| {
                region
                    .districts
                    .iter()
                    .find(|d| !d.code.is_empty() && d.code.eq_ignore_ascii_case(next))
                    .map(|d| d.id.clone())
            });
            return AdminArea {
                region: Some(region.id.clone()),
                district,
            };
        }
        AdminArea::default()
    }
}
