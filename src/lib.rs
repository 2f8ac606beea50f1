//! Usage Analytics
//!
//! An in-memory analytics engine over a fixed dataset of usage events,
//! loaded once from CSV and queried over HTTP.
//!
//! # Features
//!
//! - **Lenient loading**: malformed rows are skipped and counted, never fatal
//! - **Filter pipeline**: date range, companies, event types, free-text search
//! - **Trends**: daily, weekly (Monday start) and monthly buckets
//! - **Rankings**: top companies, event types, users and endpoints
//! - **Lock-free reads**: the store is immutable once loaded
//!
//! # Modules
//!
//! - `types`: Event model, query inputs and result records
//! - `event_store`: CSV loading, row parsing and indexes
//! - `query`: Filter, search, trend and aggregation operations
//! - `api`: Axum router and REST handlers
//! - `config`: CLI / environment configuration
//! - `utils`: Calendar helpers
//!
//! # Example
//!
//! ```no_run
//! use usage_analytics::{EventStore, QueryEngine};
//!
//! let mut store = EventStore::new("data/dataset.csv");
//! store.load().unwrap();
//! let engine = QueryEngine::new(store);
//! let metrics = engine.metrics("2024-01-01", "2024-01-31", &[], &[]);
//! println!("{} events", metrics.total_events);
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod query;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use event_store::{EventStore, LoadError, LoadReport};
pub use query::QueryEngine;
pub use types::{SearchRequest, Timeframe, UsageEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
