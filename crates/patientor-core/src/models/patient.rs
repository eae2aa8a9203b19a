//! Patient models.

use serde::{Deserialize, Serialize};

use super::Entry;

/// Patient gender as reported by the remote API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A patient record.
///
/// The list endpoint returns summaries (no `ssn`, no `entries`); the detail
/// endpoint and the entry mutation return the full record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Server-assigned identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Occupation
    pub occupation: String,
    /// Gender
    pub gender: Gender,
    /// Social security number (detail view only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    /// Date of birth, ISO date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Medical entries in server order (detail view only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

impl Patient {
    /// Create a summary patient record with required fields.
    pub fn new(id: String, name: String, occupation: String, gender: Gender) -> Self {
        Self {
            id,
            name,
            occupation,
            gender,
            ssn: None,
            date_of_birth: None,
            entries: None,
        }
    }

    /// Whether this record came from the detail endpoint.
    ///
    /// A missing or empty `ssn` marks a summary record that still needs a
    /// detail fetch.
    pub fn has_details(&self) -> bool {
        self.ssn.as_deref().is_some_and(|ssn| !ssn.is_empty())
    }

    /// Whether the entry list has been populated.
    pub fn has_entries(&self) -> bool {
        self.entries.is_some()
    }

    /// Entries, or an empty slice for summary records.
    pub fn entries(&self) -> &[Entry] {
        self.entries.as_deref().unwrap_or(&[])
    }
}
