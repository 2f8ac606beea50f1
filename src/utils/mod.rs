//! Utility functions and helpers
//!
//! This module contains calendar and timestamp helpers.

pub mod time;

pub use time::{
    bucket_key, end_of_day, format_utc_seconds, parse_date, parse_date_or_default, start_of_day,
    week_start,
};
