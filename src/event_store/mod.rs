//! Event Store Module
//!
//! Loads the usage dataset into memory exactly once and exposes it as an
//! immutable snapshot:
//! - `EventStore`: holds the ordered events and the auxiliary indexes
//! - `parse`: row, timestamp and value parsing plus load-time content derivation
//! - `StoreStats`: counts reported after loading
//!
//! # Architecture
//!
//! ```text
//! Load Path (startup, once):
//! ┌──────────┐    ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ CSV file │───►│ parse rows   │───►│ index companies  │───►│ sort by      │
//! │ (header) │    │ skip bad ones│    │ count types      │    │ created_at   │
//! └──────────┘    └──────────────┘    └──────────────────┘    └──────────────┘
//!
//! Read Path (per request):
//! ┌──────────────┐    ┌─────────────┐
//! │ Arc snapshot │───►│ QueryEngine │───► result records
//! └──────────────┘    └─────────────┘
//! ```

mod parse;
mod stats;
mod store;

pub use parse::{
    extract_company_name, extract_user_and_endpoint, parse_row, parse_timestamp, parse_value,
    RowError, TimestampParseError, COLUMN_COUNT,
};
pub use stats::StoreStats;
pub use store::{EventStore, LoadError, LoadReport, LoadResult};
