//! Contract for turning a selection into a search term.

use crate::panel::SearchTermDisplay;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the resolver needs to know about the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub selected_text: String,
    pub surrounding_text: String,
    /// Selection offsets within `surrounding_text`, in chars.
    pub selection_start: usize,
    pub selection_end: usize,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub content_language: Option<String>,
}

/// Resolver response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedSearchTerm {
    pub network_unavailable: bool,
    pub http_status: u16,
    pub search_term: String,
    pub display_text: String,
    pub alternate_term: Option<String>,
    pub entity_id: Option<String>,
    /// Negative values grow the selection to the left.
    pub selection_start_adjust: i32,
    /// Positive values grow the selection to the right.
    pub selection_end_adjust: i32,
    pub detected_language: Option<String>,
    pub caption: Option<String>,
    pub thumbnail_url: Option<String>,
    pub quick_action_uri: Option<String>,
    pub quick_action_category: Option<String>,
}

impl Default for ResolvedSearchTerm {
    fn default() -> Self {
        Self {
            network_unavailable: false,
            http_status: 200,
            search_term: String::new(),
            display_text: String::new(),
            alternate_term: None,
            entity_id: None,
            selection_start_adjust: 0,
            selection_end_adjust: 0,
            detected_language: None,
            caption: None,
            thumbnail_url: None,
            quick_action_uri: None,
            quick_action_category: None,
        }
    }
}

impl ResolvedSearchTerm {
    /// A response for when the network could not be reached.
    pub fn unavailable() -> Self {
        Self {
            network_unavailable: true,
            http_status: 0,
            ..Self::default()
        }
    }

    /// Why this response cannot be used, if it cannot.
    pub fn failure(&self) -> Option<&'static str> {
        if self.network_unavailable {
            Some("Network unavailable")
        } else if !(200..300).contains(&self.http_status) {
            Some("Search term could not be resolved")
        } else if self.search_term.is_empty() {
            Some("No search term returned")
        } else {
            None
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// Display for a successful response.
    pub fn to_display(&self) -> SearchTermDisplay {
        let display_text = if self.display_text.is_empty() {
            self.search_term.clone()
        } else {
            self.display_text.clone()
        };
        SearchTermDisplay {
            search_term: self.search_term.clone(),
            display_text,
            alternate_term: self.alternate_term.clone(),
            caption: self.caption.clone(),
            entity_id: self.entity_id.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            quick_action_uri: self.quick_action_uri.clone(),
            quick_action_category: self.quick_action_category.clone(),
            is_literal: false,
            status: None,
        }
    }
}

/// Resolves a selection into a search term over the network.
///
/// Implementations report transport failures through
/// [`ResolvedSearchTerm::network_unavailable`] and `http_status` instead of
/// an error; the pipeline falls back to a literal search either way.
#[async_trait]
pub trait SearchTermResolver: Send + Sync {
    async fn resolve(&self, request: ResolveRequest) -> ResolvedSearchTerm;
}

/// Resolver that searches for the selected text verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralResolver;

#[async_trait]
impl SearchTermResolver for LiteralResolver {
    async fn resolve(&self, request: ResolveRequest) -> ResolvedSearchTerm {
        ResolvedSearchTerm {
            search_term: request.selected_text.clone(),
            display_text: request.selected_text,
            ..ResolvedSearchTerm::default()
        }
    }
}
