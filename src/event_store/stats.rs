//! Snapshot statistics

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Counts describing a loaded store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Number of loaded events
    pub events: usize,
    /// Number of entries in the company index
    pub companies: usize,
    /// Number of distinct event types
    pub event_types: usize,
    /// Earliest `created_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_event: Option<DateTime<FixedOffset>>,
    /// Latest `created_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<DateTime<FixedOffset>>,
}

impl StoreStats {
    /// Whether the snapshot holds no events
    pub fn is_empty(&self) -> bool {
        self.events == 0
    }
}
