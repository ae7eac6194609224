//! Tags telling callers whether acquired records came from the network or from
//! the last snapshot on disk.

use chrono::{DateTime, Utc};
use std::fmt;

/// Where an acquisition's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from the API during this call.
    Live,
    /// The network call failed; records were read from the snapshot file
    /// written at `snapshot_taken`.
    Stale { snapshot_taken: DateTime<Utc> },
}

impl Freshness {
    pub fn is_live(&self) -> bool {
        matches!(self, Freshness::Live)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Live => write!(f, "live"),
            Freshness::Stale { snapshot_taken } => {
                write!(f, "stale snapshot from {}", snapshot_taken.format("%Y-%m-%d %H:%M:%S UTC"))
            }
        }
    }
}

/// The result of one acquisition: the full record set plus its [`Freshness`].
#[derive(Debug, Clone, PartialEq)]
pub struct Acquired<T> {
    pub records: Vec<T>,
    pub freshness: Freshness,
}

impl<T> Acquired<T> {
    pub fn new(records: Vec<T>, freshness: Freshness) -> Self {
        Self { records, freshness }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
