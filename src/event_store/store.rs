//! Event Store - in-memory dataset snapshot
//!
//! The EventStore reads the dataset once, keeps the events sorted by
//! `created_at`, and maintains the company and event-type indexes. After a
//! successful load it is never mutated, so it can be shared behind an `Arc`
//! and read from any number of threads without locking.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::parse::{extract_company_name, parse_row, RowError};
use super::stats::StoreStats;
use crate::types::{UsageEvent, UNKNOWN_COMPANY};

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Fatal load failures; row-level problems are logged and skipped instead
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open source file {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read header of {path}: {reason}")]
    HeaderRead { path: PathBuf, reason: String },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },
}

/// Outcome of a load call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Events held by the store after the call
    pub loaded: usize,
    /// Rows skipped by this call
    pub skipped: usize,
    /// True when the store was already loaded and nothing was read
    pub already_loaded: bool,
}

/// In-memory store of usage events
#[derive(Debug)]
pub struct EventStore {
    source_path: PathBuf,
    /// Ascending by `created_at`
    events: Vec<UsageEvent>,
    /// company id → company name, last write wins
    companies: HashMap<String, String>,
    /// event type → occurrences across the whole store
    event_types: HashMap<String, usize>,
    loaded: bool,
}

impl EventStore {
    /// Create an empty store for the dataset at `source_path`
    pub fn new<P: AsRef<Path>>(source_path: P) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            events: Vec::new(),
            companies: HashMap::new(),
            event_types: HashMap::new(),
            loaded: false,
        }
    }

    /// Get the dataset path
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Whether `load` has completed successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load the dataset into memory
    ///
    /// Calling this again after a successful load is a no-op.
    pub fn load(&mut self) -> LoadResult<LoadReport> {
        if self.loaded {
            debug!(path = %self.source_path.display(), "dataset already loaded");
            return Ok(LoadReport {
                loaded: self.events.len(),
                skipped: 0,
                already_loaded: true,
            });
        }

        let file = File::open(&self.source_path).map_err(|source| LoadError::SourceUnavailable {
            path: self.source_path.clone(),
            source,
        })?;

        self.load_from_reader(file)
    }

    /// Load the dataset from any reader; the same rules as `load` apply
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> LoadResult<LoadReport> {
        if self.loaded {
            return Ok(LoadReport {
                loaded: self.events.len(),
                skipped: 0,
                already_loaded: true,
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => {
                return Err(LoadError::HeaderRead {
                    path: self.source_path.clone(),
                    reason: "source is empty".to_string(),
                })
            }
            Err(e) => {
                return Err(LoadError::HeaderRead {
                    path: self.source_path.clone(),
                    reason: e.to_string(),
                })
            }
        }

        let mut events = Vec::new();
        let mut companies = HashMap::new();
        let mut event_types: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0;

        loop {
            let line = reader.position().line();
            let row = match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    let fields: Vec<&str> = record.iter().collect();
                    parse_row(&fields)
                }
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(LoadError::Read {
                        path: self.source_path.clone(),
                        source: e,
                    });
                }
                Err(e) => Err(RowError::from(e)),
            };

            match row {
                Ok(event) => {
                    companies.insert(event.company_id.clone(), extract_company_name(&event.content));
                    *event_types.entry(event.event_type.clone()).or_default() += 1;
                    events.push(event);
                }
                Err(e) => {
                    warn!(line, error = %e, "skipping row");
                    skipped += 1;
                }
            }
        }

        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        self.events = events;
        self.companies = companies;
        self.event_types = event_types;
        self.loaded = true;

        info!(
            events = self.events.len(),
            companies = self.companies.len(),
            event_types = self.event_types.len(),
            skipped,
            "dataset loaded"
        );

        Ok(LoadReport {
            loaded: self.events.len(),
            skipped,
            already_loaded: false,
        })
    }

    /// All events, ascending by `created_at`
    pub fn events(&self) -> &[UsageEvent] {
        &self.events
    }

    /// Total number of loaded events
    pub fn total_events(&self) -> usize {
        self.events.len()
    }

    /// The company id → company name index
    pub fn companies(&self) -> &HashMap<String, String> {
        &self.companies
    }

    /// Event type → occurrence count across the whole store
    pub fn event_type_counts(&self) -> &HashMap<String, usize> {
        &self.event_types
    }

    /// Company name for an id, or `"Unknown Company"` when it does not resolve
    pub fn resolve_company(&self, company_id: &str) -> &str {
        self.companies
            .get(company_id)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_COMPANY)
    }

    /// Every non-empty company name in the index, sorted and deduplicated
    pub fn company_names(&self) -> Vec<String> {
        self.companies
            .values()
            .filter(|name| !name.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Counts describing the loaded snapshot
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            events: self.events.len(),
            companies: self.companies.len(),
            event_types: self.event_types.len(),
            first_event: self.events.first().map(|e| e.created_at),
            last_event: self.events.last().map(|e| e.created_at),
        }
    }
}
