// src/markers/reconcile.rs
// Pure keyed diff between what is mounted and what should be
// RELEVANT FILES: src/markers/controller.rs, src/atlas/overlays.rs

use std::collections::BTreeMap;

use serde::Serialize;

/// How a desired item relates to the mounted item with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Same,
    /// Patch in place.
    Update,
    /// Remove then add.
    Replace,
}

/// Operations turning the mounted set into the desired set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diff<T> {
    pub add: Vec<T>,
    pub update: Vec<T>,
    pub remove: Vec<String>,
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            update: Vec::new(),
            remove: Vec::new(),
        }
    }
}

impl<T> Diff<T> {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.add.len() + self.update.len() + self.remove.len()
    }
}

/// Compute the diff. Keys present on both sides are classified by `compare`.
pub fn plan<T, F>(mounted: &BTreeMap<String, T>, desired: &BTreeMap<String, T>, compare: F) -> Diff<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Change,
{
    let mut diff = Diff::default();
    for (key, current) in mounted {
        match desired.get(key) {
            None => diff.remove.push(key.clone()),
            Some(wanted) => match compare(current, wanted) {
                Change::Same => {}
                Change::Update => diff.update.push(wanted.clone()),
                Change::Replace => {
                    diff.remove.push(key.clone());
                    diff.add.push(wanted.clone());
                }
            },
        }
    }
    for (key, wanted) in desired {
        if !mounted.contains_key(key) {
            diff.add.push(wanted.clone());
        }
    }
    diff
}
