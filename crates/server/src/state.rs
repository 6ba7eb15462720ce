use rfqmatch_matcher::RfqMatcher;
use std::sync::Arc;

/// Shared application state
///
/// Everything here is read-only once the server starts.
pub struct AppState {
    /// RFQ matcher over the startup catalog index
    pub matcher: Arc<RfqMatcher>,
}

impl AppState {
    /// Create new application state
    pub fn new(matcher: Arc<RfqMatcher>) -> Self {
        Self { matcher }
    }
}
