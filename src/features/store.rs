//! Feature store: raw claim records to map-ready features.

use std::collections::HashSet;
use std::rc::Rc;

use log::debug;

use crate::config::regions::RegionCatalog;
use crate::error::{AtlasError, AtlasResult};
use crate::features::claim::{ClaimAttributes, ClaimCategory, ClaimFeature, RawClaim};
use crate::features::geometry::{Bounds, LngLat};

/// Normalize a single record, or explain why it cannot be placed on the map.
pub fn normalize(raw: &RawClaim) -> AtlasResult<ClaimFeature> {
    if raw.id.trim().is_empty() {
        return Err(AtlasError::invalid_feature("<empty>", "missing claim id"));
    }
    let (lon, lat) = match (raw.lon, raw.lat) {
        (Some(lon), Some(lat)) => (lon, lat),
        _ => return Err(AtlasError::invalid_feature(&raw.id, "missing coordinate pair")),
    };
    let position = LngLat::checked(lon, lat).ok_or_else(|| {
        AtlasError::invalid_feature(&raw.id, format!("unusable coordinates ({lon}, {lat})"))
    })?;
    let category = ClaimCategory::parse(&raw.category).ok_or_else(|| {
        AtlasError::invalid_feature(&raw.id, format!("unknown category '{}'", raw.category))
    })?;

    Ok(ClaimFeature {
        id: raw.id.clone(),
        position,
        category,
        attributes: ClaimAttributes {
            claim_id: raw.id.clone(),
            beneficiary: raw.beneficiary.clone(),
            village: raw.village.clone(),
            land_area: if raw.land_area.is_finite() { raw.land_area } else { 0.0 },
        },
        area: Default::default(),
    })
}

/// Lazily convert raw claims into features.
///
/// Total: records without a finite coordinate pair, an id, or a known
/// category are skipped. Later records reusing an id are skipped too.
/// The iterator borrows `raw`; call again to restart.
pub fn to_features(raw: &[RawClaim]) -> impl Iterator<Item = ClaimFeature> + '_ {
    placed(raw).map(|(_, feature)| feature)
}

/// Placeable records paired with their normalized feature.
fn placed(raw: &[RawClaim]) -> impl Iterator<Item = (&RawClaim, ClaimFeature)> + '_ {
    let mut seen = HashSet::new();
    raw.iter().filter_map(move |record| match normalize(record) {
        Ok(feature) if seen.insert(feature.id.clone()) => Some((record, feature)),
        Ok(feature) => {
            debug!("dropping duplicate claim id '{}'", feature.id);
            None
        }
        Err(err) => {
            debug!("[{}] {}", err.category(), err);
            None
        }
    })
}

/// Extent of a feature set.
pub fn bounds_of<'a, I>(features: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a ClaimFeature>,
{
    Bounds::from_points(features.into_iter().map(|f| f.position))
}

/// Current raw dataset plus a snapshot memoized by revision.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    catalog: RegionCatalog,
    raw: Vec<RawClaim>,
    revision: u64,
    cached: Option<(u64, Rc<[ClaimFeature]>)>,
}

impl FeatureStore {
    pub fn new(catalog: RegionCatalog) -> Self {
        Self {
            catalog,
            raw: Vec::new(),
            revision: 0,
            cached: None,
        }
    }

    pub fn with_claims(catalog: RegionCatalog, raw: Vec<RawClaim>) -> Self {
        let mut store = Self::new(catalog);
        store.replace(raw);
        store
    }

    /// Swap in a new dataset; bumps the revision and invalidates the snapshot.
    pub fn replace(&mut self, raw: Vec<RawClaim>) {
        self.raw = raw;
        self.revision += 1;
        self.cached = None;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Features for the current revision, with administrative areas resolved.
    pub fn snapshot(&mut self) -> Rc<[ClaimFeature]> {
        if let Some((rev, features)) = &self.cached {
            if *rev == self.revision {
                return Rc::clone(features);
            }
        }

        let catalog = &self.catalog;
        let features: Rc<[ClaimFeature]> = placed(&self.raw)
            .map(|(raw, mut feature)| {
                feature.area = if raw.state.is_some() || raw.district.is_some() {
                    catalog.resolve_names(raw.state.as_deref(), raw.district.as_deref())
                } else {
                    catalog.infer_from_claim_id(&feature.id)
                };
                feature
            })
            .collect();

        debug!(
            "feature snapshot rev {}: {} of {} records placed",
            self.revision,
            features.len(),
            self.raw.len()
        );
        self.cached = Some((self.revision, Rc::clone(&features)));
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<RawClaim> {
        vec![
            RawClaim::new("FRA/CGH/BST/2024/001", 81.2849, 19.1383, "approved")
                .with_beneficiary("Ramesh Kumar", "Kondagaon", 2.5),
            RawClaim::new("FRA/CGH/BST/2024/002", 81.3849, 19.2383, "pending")
                .with_beneficiary("Sunita Devi", "Tokapal", 1.8),
            RawClaim::new("FRA/CGH/KNK/2024/003", 81.1849, 19.0383, "community")
                .with_beneficiary("Mohan Lal", "Bhanupratappur", 3.2),
        ]
    }

    #[test]
    fn drops_invalid_coordinates_without_placeholder() {
        let mut raw = sample();
        raw.push(RawClaim::new("nan", f64::NAN, 19.0, "approved"));
        raw.push(RawClaim::new("inf", 81.0, f64::NEG_INFINITY, "approved"));
        raw.push(RawClaim {
            id: "missing".into(),
            category: "pending".into(),
            ..Default::default()
        });

        let features: Vec<_> = to_features(&raw).collect();
        assert_eq!(features.len(), 3);
        assert!(features.iter().all(|f| f.position.is_valid()));
        assert!(features.iter().all(|f| f.position != LngLat::new(0.0, 0.0)));
    }

    #[test]
    fn output_never_longer_than_input() {
        let mut raw = sample();
        raw.push(raw[0].clone());
        raw.push(RawClaim::new("bad-cat", 81.0, 19.0, "rejected"));
        let count = to_features(&raw).count();
        assert!(count <= raw.len());
        assert_eq!(count, 3);
    }

    #[test]
    fn sequence_is_restartable() {
        let raw = sample();
        let first: Vec<_> = to_features(&raw).collect();
        let second: Vec<_> = to_features(&raw).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_is_memoized_by_revision() {
        let mut store = FeatureStore::with_claims(RegionCatalog::default(), sample());
        let a = store.snapshot();
        let b = store.snapshot();
        assert!(Rc::ptr_eq(&a, &b));

        store.replace(sample()[..1].to_vec());
        let c = store.snapshot();
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(c.len(), 1);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn snapshot_resolves_areas() {
        let mut raw = sample();
        raw.push(
            RawClaim::new("OD-1", 86.7, 21.9, "pending").with_area("Odisha", "Mayurbhanj"),
        );
        let mut store = FeatureStore::with_claims(RegionCatalog::default(), raw);
        let features = store.snapshot();

        assert_eq!(features[0].area.district.as_deref(), Some("bastar"));
        assert_eq!(features[2].area.district.as_deref(), Some("kanker"));
        assert_eq!(features[3].area.region.as_deref(), Some("odisha"));
        assert_eq!(features[3].area.district.as_deref(), Some("mayurbhanj"));
    }

    #[test]
    fn bounds_cover_all_features() {
        let features: Vec<_> = to_features(&sample()).collect();
        let b = bounds_of(&features).unwrap();
        assert!(features.iter().all(|f| b.contains(f.position)));
    }
}
