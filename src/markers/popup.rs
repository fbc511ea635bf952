// src/markers/popup.rs
// Marker and popup payloads built from claim features
// RELEVANT FILES: src/markers/reconcile.rs, src/surface/mod.rs

use serde::{Deserialize, Serialize};

use crate::features::claim::{ClaimAttributes, ClaimCategory, ClaimFeature};
use crate::features::geometry::LngLat;

/// Popup behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    /// Pixel offset from the marker anchor.
    pub offset: f32,
    pub close_button: bool,
    pub close_on_click: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            offset: 15.0,
            close_button: true,
            close_on_click: true,
        }
    }
}

/// Popup content for one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub category: ClaimCategory,
    pub attributes: ClaimAttributes,
    pub options: PopupOptions,
}

impl Popup {
    pub fn for_feature(feature: &ClaimFeature) -> Self {
        Self {
            title: feature.id.clone(),
            category: feature.category,
            attributes: feature.attributes.clone(),
            options: PopupOptions::default(),
        }
    }

    /// HTML body handed to the renderer's popup.
    pub fn to_html(&self) -> String {
        let a = &self.attributes;
        format!(
            concat!(
                "<div class=\"p-3\">",
                "<h3 class=\"font-semibold text-sm mb-2\">{title}</h3>",
                "<div class=\"space-y-1 text-xs\">",
                "<div><strong>Beneficiary:</strong> {beneficiary}</div>",
                "<div><strong>Village:</strong> {village}</div>",
                "<div><strong>Land Area:</strong> {area} acres</div>",
                "<div><strong>Status:</strong> ",
                "<span class=\"px-1.5 py-0.5 rounded text-xs font-medium {badge}\">{status}</span>",
                "</div></div></div>"
            ),
            title = escape_html(&self.title),
            beneficiary = escape_html(&a.beneficiary),
            village = escape_html(&a.village),
            area = a.land_area,
            badge = badge_class(self.category),
            status = self.category.as_str().to_uppercase(),
        )
    }
}

fn badge_class(category: ClaimCategory) -> &'static str {
    match category {
        ClaimCategory::Approved => "bg-green-100 text-green-800",
        ClaimCategory::Pending => "bg-yellow-100 text-yellow-800",
        ClaimCategory::Community => "bg-blue-100 text-blue-800",
    }
}

/// Provider strings go into markup; escape the five significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Interactive marker for one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: String,
    pub position: LngLat,
    pub color: String,
    pub popup: Popup,
}

impl MarkerSpec {
    pub fn for_feature(feature: &ClaimFeature) -> Self {
        Self {
            id: feature.id.clone(),
            position: feature.position,
            color: feature.category.color().to_string(),
            popup: Popup::for_feature(feature),
        }
    }

    /// Same marker element; only the popup differs.
    pub fn same_anchor(&self, other: &MarkerSpec) -> bool {
        self.id == other.id && self.position == other.position && self.color == other.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::claim::AdminArea;

    fn feature() -> ClaimFeature {
        ClaimFeature {
            id: "FRA/CGH/BST/2024/002".into(),
            position: LngLat::new(81.3849, 19.2383),
            category: ClaimCategory::Pending,
            attributes: ClaimAttributes {
                claim_id: "FRA/CGH/BST/2024/002".into(),
                beneficiary: "Sunita <Devi>".into(),
                village: "Tokapal".into(),
                land_area: 1.8,
            },
            area: AdminArea::default(),
        }
    }

    #[test]
    fn marker_colour_follows_category() {
        let marker = MarkerSpec::for_feature(&feature());
        assert_eq!(marker.color, "#f59e0b");
        assert_eq!(marker.popup.options.offset, 15.0);
    }

    #[test]
    fn popup_html_escapes_attributes() {
        let html = Popup::for_feature(&feature()).to_html();
        assert!(html.contains("Sunita &lt;Devi&gt;"));
        assert!(html.contains("1.8 acres"));
        assert!(html.contains(">PENDING<"));
        assert!(html.contains("bg-yellow-100"));
    }

    #[test]
    fn same_anchor_ignores_popup() {
        let a = MarkerSpec::for_feature(&feature());
        let mut b = a.clone();
        b.popup.attributes.village = "Jagdalpur".into();
        assert!(a.same_anchor(&b));
        assert_ne!(a, b);
    }
}
