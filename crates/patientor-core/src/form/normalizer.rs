//! Shape a flat form record into a typed entry payload.
//!
//! Only the fields belonging to the selected type are carried over:
//! - Hospital: discharge
//! - HealthCheck: healthCheckRating
//! - OccupationalHealthcare: employerName, and sickLeave when either date is set

use super::EntryForm;
use crate::models::{EntryCommon, EntryDetails, EntryType, NewEntry};

/// Build the payload for the remote API.
pub fn normalize_entry(form: &EntryForm) -> NewEntry {
    let diagnosis_codes = form
        .diagnosis_codes
        .as_ref()
        .filter(|codes| !codes.is_empty())
        .cloned();

    let common = EntryCommon {
        description: form.description.clone(),
        date: form.date.clone(),
        specialist: form.specialist.clone(),
        diagnosis_codes,
    };

    let details = match form.entry_type {
        EntryType::Hospital => EntryDetails::Hospital {
            discharge: form.discharge.clone(),
        },
        EntryType::HealthCheck => EntryDetails::HealthCheck {
            health_check_rating: form.health_check_rating,
        },
        EntryType::OccupationalHealthcare => EntryDetails::OccupationalHealthcare {
            employer_name: form.employer_name.clone(),
            sick_leave: (!form.sick_leave.is_blank()).then(|| form.sick_leave.clone()),
        },
    };

    NewEntry { common, details }
}

impl EntryForm {
    /// See [`normalize_entry`].
    pub fn to_new_entry(&self) -> NewEntry {
        normalize_entry(self)
    }
}
