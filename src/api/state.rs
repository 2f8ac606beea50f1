//! Shared application state for request handlers

use crate::query::QueryEngine;

/// State handed to every handler through `State<Arc<AppState>>`
pub struct AppState {
    /// Read-only engine over the loaded snapshot
    pub engine: QueryEngine,

    /// Reject malformed `startDate`/`endDate` instead of ignoring them
    pub strict_dates: bool,
}

impl AppState {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            engine,
            strict_dates: false,
        }
    }

    pub fn with_strict_dates(mut self, strict_dates: bool) -> Self {
        self.strict_dates = strict_dates;
        self
    }
}
