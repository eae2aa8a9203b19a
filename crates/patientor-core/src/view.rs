//! Display summaries for patients and entries.
//!
//! Every entry variant is matched exhaustively here so a new variant fails
//! to compile until it has a rendering.

use crate::models::{
    diagnoses_for_codes, Diagnosis, Entry, EntryDetails, EntryType, Gender, HealthCheckRating,
    Patient,
};

/// Colour of the health-rating indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingIndicator {
    Green,
    Yellow,
    Orange,
    Red,
}

impl RatingIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingIndicator::Green => "green",
            RatingIndicator::Yellow => "yellow",
            RatingIndicator::Orange => "orange",
            RatingIndicator::Red => "red",
        }
    }
}

impl HealthCheckRating {
    pub fn indicator(&self) -> RatingIndicator {
        match self {
            HealthCheckRating::Healthy => RatingIndicator::Green,
            HealthCheckRating::LowRisk => RatingIndicator::Yellow,
            HealthCheckRating::HighRisk => RatingIndicator::Orange,
            HealthCheckRating::CriticalRisk => RatingIndicator::Red,
        }
    }
}

impl Gender {
    /// Icon name for the gender symbol.
    pub fn icon(&self) -> &'static str {
        match self {
            Gender::Male => "mars",
            Gender::Female => "venus",
            Gender::Other => "neuter",
        }
    }
}

/// Everything needed to render one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: String,
    pub entry_type: EntryType,
    pub date: String,
    pub description: String,
    /// Known diagnoses only; unknown codes are left out
    pub diagnoses: Vec<Diagnosis>,
    /// Variant-specific lines, in display order
    pub detail_lines: Vec<String>,
    /// Set for health checks only
    pub indicator: Option<RatingIndicator>,
}

impl EntryView {
    pub fn from_entry(entry: &Entry, diagnoses: &[Diagnosis]) -> Self {
        let (detail_lines, indicator) = match &entry.details {
            EntryDetails::HealthCheck {
                health_check_rating,
            } => (Vec::new(), Some(health_check_rating.indicator())),
            EntryDetails::Hospital { discharge } => (
                vec![
                    format!("Discharged: {}", discharge.date),
                    format!("Reason: {}", discharge.criteria),
                ],
                None,
            ),
            EntryDetails::OccupationalHealthcare {
                employer_name,
                sick_leave,
            } => {
                let sick_leave_line = match sick_leave {
                    Some(leave) => format!("Sick leave: {} - {}", leave.start_date, leave.end_date),
                    None => "Sick leave: no sick leave".to_string(),
                };
                (
                    vec![format!("Employer name: {}", employer_name), sick_leave_line],
                    None,
                )
            }
        };

        Self {
            id: entry.id.clone(),
            entry_type: entry.entry_type(),
            date: entry.common.date.clone(),
            description: entry.common.description.clone(),
            diagnoses: diagnoses_for_codes(entry.diagnosis_codes(), diagnoses)
                .into_iter()
                .cloned()
                .collect(),
            detail_lines,
            indicator,
        }
    }
}

/// Patient detail page content.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientView {
    pub id: String,
    pub name: String,
    pub gender_icon: &'static str,
    pub ssn: Option<String>,
    pub occupation: String,
    pub entries: Vec<EntryView>,
}

impl PatientView {
    pub fn from_patient(patient: &Patient, diagnoses: &[Diagnosis]) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            gender_icon: patient.gender.icon(),
            ssn: patient.ssn.clone(),
            occupation: patient.occupation.clone(),
            entries: patient
                .entries()
                .iter()
                .map(|e| EntryView::from_entry(e, diagnoses))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Discharge, EntryCommon, SickLeave};

    fn entry(details: EntryDetails, codes: Option<Vec<&str>>) -> Entry {
        Entry {
            id: "e1".into(),
            common: EntryCommon {
                description: "Visit".into(),
                date: "2019-08-05".into(),
                specialist: "MD House".into(),
                diagnosis_codes: codes.map(|c| c.into_iter().map(String::from).collect()),
            },
            details,
        }
    }

    #[test]
    fn test_rating_indicators() {
        assert_eq!(HealthCheckRating::Healthy.indicator(), RatingIndicator::Green);
        assert_eq!(HealthCheckRating::CriticalRisk.indicator().as_str(), "red");
    }

    #[test]
    fn test_hospital_view_lines() {
        let e = entry(
            EntryDetails::Hospital {
                discharge: Discharge {
                    date: "2015-01-16".into(),
                    criteria: "Thumb has healed.".into(),
                },
            },
            None,
        );
        let view = EntryView::from_entry(&e, &[]);
        assert_eq!(
            view.detail_lines,
            vec!["Discharged: 2015-01-16", "Reason: Thumb has healed."]
        );
        assert!(view.indicator.is_none());
    }

    #[test]
    fn test_occupational_view_sick_leave_lines() {
        let with_leave = entry(
            EntryDetails::OccupationalHealthcare {
                employer_name: "HyPD".into(),
                sick_leave: Some(SickLeave {
                    start_date: "2019-08-05".into(),
                    end_date: "2019-08-28".into(),
                }),
            },
            None,
        );
        assert_eq!(
            EntryView::from_entry(&with_leave, &[]).detail_lines[1],
            "Sick leave: 2019-08-05 - 2019-08-28"
        );

        let without = entry(
            EntryDetails::OccupationalHealthcare {
                employer_name: "HyPD".into(),
                sick_leave: None,
            },
            None,
        );
        assert_eq!(
            EntryView::from_entry(&without, &[]).detail_lines,
            vec!["Employer name: HyPD", "Sick leave: no sick leave"]
        );
    }

    #[test]
    fn test_unknown_diagnosis_codes_omitted() {
        let e = entry(
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::HighRisk,
            },
            Some(vec!["Z57.1", "M24.2"]),
        );
        let diagnoses = vec![Diagnosis::new("M24.2", "Disorder of ligament")];
        let view = EntryView::from_entry(&e, &diagnoses);

        assert_eq!(view.diagnoses.len(), 1);
        assert_eq!(view.diagnoses[0].code, "M24.2");
        assert_eq!(view.indicator, Some(RatingIndicator::Orange));
    }

    #[test]
    fn test_patient_view_summary_has_no_entries() {
        let patient = Patient::new("p1".into(), "Martin Riggs".into(), "Cop".into(), Gender::Male);
        let view = PatientView::from_patient(&patient, &[]);
        assert_eq!(view.gender_icon, "mars");
        assert!(view.entries.is_empty());
    }
}
