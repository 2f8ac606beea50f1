//! Usage event record

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One recorded usage action, as loaded from the dataset
///
/// `company_name` is left empty at load time and filled in when events are
/// returned from a search. `user` and `endpoint` hold the load-time
/// derivations from `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: String,
    pub created_at: DateTime<FixedOffset>,
    pub company_id: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub content: String,
    pub attribute: String,
    pub user: String,
    pub endpoint: String,
    pub updated_at: DateTime<FixedOffset>,
    pub original_timestamp: DateTime<FixedOffset>,
    pub value: Option<f64>,
}
