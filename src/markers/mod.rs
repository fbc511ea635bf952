//! Marker/popup controller.
//!
//! Computes the markers the current filter wants, diffs them against the
//! surface's mounted set and applies the minimal add/update/remove plan.

pub mod controller;
pub mod popup;
pub mod reconcile;

pub use controller::{desired_markers, marker_change, reconcile};
pub use popup::{escape_html, MarkerSpec, Popup, PopupOptions};
pub use reconcile::{plan, Change, Diff};
