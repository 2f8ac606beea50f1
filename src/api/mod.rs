//! HTTP API over the query engine
//!
//! Handlers translate query strings into core inputs and marshal the core's
//! result structs to JSON. No analytics logic lives here.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
