//! Viewer role and sidebar panel flags. Presentation state only; nothing
//! here is shared with the map.

use serde::{Deserialize, Serialize};

/// Role of the signed-in user. Read-only for the atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    #[default]
    User,
    Officer,
    Admin,
}

impl ViewerRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" => Some(ViewerRole::User),
            "officer" => Some(ViewerRole::Officer),
            "admin" => Some(ViewerRole::Admin),
            _ => None,
        }
    }

    /// Badge shown next to the atlas title.
    pub fn view_label(self) -> &'static str {
        match self {
            ViewerRole::User => "Personal View",
            ViewerRole::Officer => "District View",
            ViewerRole::Admin => "State View",
        }
    }
}

/// Collapsible sidebar cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Filters,
    Layers,
    Legend,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub filters: bool,
    pub layers: bool,
    pub legend: bool,
    pub stats: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            filters: true,
            layers: true,
            legend: true,
            stats: true,
        }
    }
}

impl PanelState {
    pub fn is_expanded(&self, panel: Panel) -> bool {
        match panel {
            Panel::Filters => self.filters,
            Panel::Layers => self.layers,
            Panel::Legend => self.legend,
            Panel::Stats => self.stats,
        }
    }

    /// Flip a panel and return its new state.
    pub fn toggle(&mut self, panel: Panel) -> bool {
        let flag = match panel {
            Panel::Filters => &mut self.filters,
            Panel::Layers => &mut self.layers,
            Panel::Legend => &mut self.legend,
            Panel::Stats => &mut self.stats,
        };
        *flag = !*flag;
        *flag
    }
}
