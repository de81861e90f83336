//! Application state shared across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::ResponseSelector;
use crate::config::PaginationConfig;
use crate::llm::GenerationProvider;
use crate::quotes::QuoteStore;

/// Shared application state.
pub struct AppState {
    /// Loaded quotes.
    pub store: Arc<QuoteStore>,
    /// Chat reply selection.
    pub chat: ResponseSelector,
    /// Page size bounds for quote listing.
    pub pagination: PaginationConfig,
    /// Directory of static client files, if any.
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<QuoteStore>,
        provider: Option<Arc<dyn GenerationProvider>>,
        pagination: PaginationConfig,
    ) -> Self {
        let chat = ResponseSelector::new(Arc::clone(&store), provider);
        Self {
            store,
            chat,
            pagination,
            static_dir: None,
        }
    }

    /// Serve static files from `dir` for unmatched routes.
    #[must_use]
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Wrap in an `Arc` for the router.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
