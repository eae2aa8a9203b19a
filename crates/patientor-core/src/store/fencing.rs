//! Fetch-generation fencing.
//!
//! Every remote read and entry submission takes a ticket when it is issued.
//! A response is applied only if its ticket is newer than the last write
//! applied to the same key, so a slow response can never overwrite state
//! that replaced it.

use std::collections::HashMap;
use std::fmt;

/// Store key a remote response writes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    PatientList,
    Diagnoses,
    Patient(String),
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKey::PatientList => f.write_str("patients"),
            FetchKey::Diagnoses => f.write_str("diagnoses"),
            FetchKey::Patient(id) => write!(f, "patients/{}", id),
        }
    }
}

/// Token issued when a request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: FetchKey,
    /// Strictly increasing across all keys
    pub sequence: u64,
}

/// Tracks issued tickets and the last applied write per key.
#[derive(Debug, Default)]
pub struct FetchFences {
    last_issued: u64,
    last_applied: HashMap<FetchKey, u64>,
}

impl FetchFences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a request about to start.
    pub fn issue(&mut self, key: FetchKey) -> FetchTicket {
        self.last_issued += 1;
        FetchTicket {
            key,
            sequence: self.last_issued,
        }
    }

    /// Whether a response carrying this ticket may still be applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.sequence > self.applied_sequence(&ticket.key)
    }

    /// Record that the ticket's response was applied.
    pub fn record(&mut self, ticket: &FetchTicket) {
        let applied = self.last_applied.entry(ticket.key.clone()).or_insert(0);
        *applied = (*applied).max(ticket.sequence);
    }

    fn applied_sequence(&self, key: &FetchKey) -> u64 {
        self.last_applied.get(key).copied().unwrap_or(0)
    }
}
