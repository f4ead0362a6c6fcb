//! Contract for the panel that shows search results.

use serde::{Deserialize, Serialize};
use tapsearch_gesture::StateChangeReason;

/// What the panel should display for the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTermDisplay {
    pub search_term: String,
    pub display_text: String,
    #[serde(default)]
    pub alternate_term: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub quick_action_uri: Option<String>,
    #[serde(default)]
    pub quick_action_category: Option<String>,
    /// The raw selected text rather than a resolved term.
    #[serde(default)]
    pub is_literal: bool,
    /// Message for the user when resolution failed.
    #[serde(default)]
    pub status: Option<String>,
}

impl SearchTermDisplay {
    /// Search for the selected text as-is.
    pub fn literal(selected_text: impl Into<String>) -> Self {
        let text = selected_text.into();
        Self {
            search_term: text.clone(),
            display_text: text,
            is_literal: true,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Renders the search panel. Implemented by the host UI.
pub trait PanelDriver: Send + Sync {
    fn show_long_press(&self);

    fn show_tap_ui(&self);

    fn hide(&self, reason: StateChangeReason);

    fn set_search_term(&self, display: &SearchTermDisplay);

    fn is_showing(&self) -> bool;

    /// Showing only the collapsed bar.
    fn is_peeking(&self) -> bool;
}
