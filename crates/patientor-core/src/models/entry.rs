//! Medical entry models.
//!
//! An entry is a set of common fields plus exactly one variant payload,
//! tagged on the wire by a `type` field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Entry variant tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EntryType {
    HealthCheck,
    /// Initial selection of the entry form
    #[default]
    Hospital,
    OccupationalHealthcare,
}

impl EntryType {
    /// All variants in display order.
    pub const ALL: [EntryType; 3] = [
        EntryType::HealthCheck,
        EntryType::Hospital,
        EntryType::OccupationalHealthcare,
    ];

    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::HealthCheck => "HealthCheck",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }

    /// Label for selection widgets.
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::HealthCheck => "Health check",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "Occupational Healthcare",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownEntryType(s.to_string()))
    }
}

/// Health check rating, ordered by severity.
///
/// Serialized as its ordinal (0 = Healthy .. 3 = CriticalRisk).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    #[default]
    Healthy,
    LowRisk,
    HighRisk,
    CriticalRisk,
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HealthCheckRating::Healthy),
            1 => Ok(HealthCheckRating::LowRisk),
            2 => Ok(HealthCheckRating::HighRisk),
            3 => Ok(HealthCheckRating::CriticalRisk),
            other => Err(ModelError::InvalidHealthCheckRating(other)),
        }
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        match rating {
            HealthCheckRating::Healthy => 0,
            HealthCheckRating::LowRisk => 1,
            HealthCheckRating::HighRisk => 2,
            HealthCheckRating::CriticalRisk => 3,
        }
    }
}

impl fmt::Display for HealthCheckRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "LowRisk",
            HealthCheckRating::HighRisk => "HighRisk",
            HealthCheckRating::CriticalRisk => "CriticalRisk",
        };
        f.write_str(name)
    }
}

/// Hospital release record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

impl Discharge {
    /// Both fields filled in.
    pub fn is_complete(&self) -> bool {
        !self.date.is_empty() && !self.criteria.is_empty()
    }
}

/// Sick leave date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

impl SickLeave {
    /// Neither date filled in.
    pub fn is_blank(&self) -> bool {
        self.start_date.is_empty() && self.end_date.is_empty()
    }
}

/// Fields shared by every entry variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryCommon {
    /// Free text description
    pub description: String,
    /// Entry date, ISO date
    pub date: String,
    /// Responsible specialist
    pub specialist: String,
    /// Referenced diagnosis codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
}

/// Variant-specific entry payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EntryDetails {
    #[serde(rename_all = "camelCase")]
    HealthCheck {
        health_check_rating: HealthCheckRating,
    },
    Hospital {
        discharge: Discharge,
    },
    #[serde(rename_all = "camelCase")]
    OccupationalHealthcare {
        employer_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
}

impl EntryDetails {
    /// Variant tag of this payload.
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryDetails::HealthCheck { .. } => EntryType::HealthCheck,
            EntryDetails::Hospital { .. } => EntryType::Hospital,
            EntryDetails::OccupationalHealthcare { .. } => EntryType::OccupationalHealthcare,
        }
    }
}

/// A persisted entry, as returned inside a detailed patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Server-assigned identifier, unique within the patient
    pub id: String,
    #[serde(flatten)]
    pub common: EntryCommon,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl Entry {
    pub fn entry_type(&self) -> EntryType {
        self.details.entry_type()
    }

    /// Diagnosis codes, or an empty slice when none were recorded.
    pub fn diagnosis_codes(&self) -> &[String] {
        self.common.diagnosis_codes.as_deref().unwrap_or(&[])
    }
}

/// An entry payload sent to the remote API; the server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    #[serde(flatten)]
    pub common: EntryCommon,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl NewEntry {
    pub fn entry_type(&self) -> EntryType {
        self.details.entry_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_from_str() {
        assert_eq!("Hospital".parse::<EntryType>().unwrap(), EntryType::Hospital);
        assert_eq!(
            "OccupationalHealthcare".parse::<EntryType>().unwrap(),
            EntryType::OccupationalHealthcare
        );
        assert_eq!(
            "Dental".parse::<EntryType>(),
            Err(ModelError::UnknownEntryType("Dental".into()))
        );
    }

    #[test]
    fn test_health_check_rating_ordinal() {
        assert_eq!(HealthCheckRating::try_from(2).unwrap(), HealthCheckRating::HighRisk);
        assert!(HealthCheckRating::try_from(4).is_err());
        assert!(HealthCheckRating::CriticalRisk > HealthCheckRating::LowRisk);
        assert_eq!(u8::from(HealthCheckRating::CriticalRisk), 3);
    }

    #[test]
    fn test_deserialize_health_check_entry() {
        let json = r#"{
            "id": "b4f4eca1",
            "date": "2019-10-20",
            "specialist": "MD House",
            "type": "HealthCheck",
            "description": "Yearly control visit. Cholesterol levels back to normal.",
            "healthCheckRating": 0
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id, "b4f4eca1");
        assert_eq!(entry.common.specialist, "MD House");
        assert!(entry.diagnosis_codes().is_empty());
        assert_eq!(
            entry.details,
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::Healthy
            }
        );
    }

    #[test]
    fn test_deserialize_occupational_entry_with_sick_leave() {
        let json = r#"{
            "id": "fcd59fa6",
            "date": "2019-08-05",
            "type": "OccupationalHealthcare",
            "specialist": "MD House",
            "employerName": "HyPD",
            "diagnosisCodes": ["Z57.1", "Z74.3", "M51.2"],
            "description": "Patient mistakenly found himself in a nuclear plant waste site without protection gear.",
            "sickLeave": { "startDate": "2019-08-05", "endDate": "2019-08-28" }
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.entry_type(), EntryType::OccupationalHealthcare);
        assert_eq!(entry.diagnosis_codes().len(), 3);
        match entry.details {
            EntryDetails::OccupationalHealthcare {
                employer_name,
                sick_leave,
            } => {
                assert_eq!(employer_name, "HyPD");
                assert_eq!(sick_leave.unwrap().end_date, "2019-08-28");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_rejects_unknown_type() {
        let json = r#"{"id":"x","date":"2020-01-01","specialist":"s","description":"d","type":"Dental"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn test_serialize_new_hospital_entry() {
        let entry = NewEntry {
            common: EntryCommon {
                description: "Healing time appr. 2 weeks.".into(),
                date: "2015-01-02".into(),
                specialist: "MD House".into(),
                diagnosis_codes: Some(vec!["S62.5".into()]),
            },
            details: EntryDetails::Hospital {
                discharge: Discharge {
                    date: "2015-01-16".into(),
                    criteria: "Thumb has healed.".into(),
                },
            },
        };
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "Hospital");
        assert_eq!(json["diagnosisCodes"][0], "S62.5");
        assert_eq!(json["discharge"]["criteria"], "Thumb has healed.");
        assert!(json.get("id").is_none());
    }
}
