//! Entry form: values, validation and payload normalization.
//!
//! Pipeline: field change → validation → (submit) normalization → remote

mod normalizer;
mod state;
mod validator;

pub use normalizer::*;
pub use state::*;
pub use validator::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Discharge, EntryType, HealthCheckRating, SickLeave};

/// Flat form record holding the fields of every entry variant.
///
/// Fields irrelevant to the selected type are kept (the user may switch
/// back) and ignored by the normalizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub date: String,
    pub specialist: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    pub health_check_rating: HealthCheckRating,
    pub discharge: Discharge,
    pub employer_name: String,
    pub sick_leave: SickLeave,
}

/// Addressable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    EntryType,
    Date,
    Specialist,
    Description,
    DiagnosisCodes,
    HealthCheckRating,
    Discharge,
    EmployerName,
    SickLeave,
}

impl FormField {
    /// Field name as used in the form record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::EntryType => "type",
            FormField::Date => "date",
            FormField::Specialist => "specialist",
            FormField::Description => "description",
            FormField::DiagnosisCodes => "diagnosisCodes",
            FormField::HealthCheckRating => "healthCheckRating",
            FormField::Discharge => "discharge",
            FormField::EmployerName => "employerName",
            FormField::SickLeave => "sickLeave",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single edit made by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    EntryType(EntryType),
    Date(String),
    Specialist(String),
    Description(String),
    DiagnosisCodes(Vec<String>),
    HealthCheckRating(HealthCheckRating),
    DischargeDate(String),
    DischargeCriteria(String),
    EmployerName(String),
    SickLeaveStart(String),
    SickLeaveEnd(String),
}

impl FieldChange {
    /// The field this change touches.
    pub fn field(&self) -> FormField {
        match self {
            FieldChange::EntryType(_) => FormField::EntryType,
            FieldChange::Date(_) => FormField::Date,
            FieldChange::Specialist(_) => FormField::Specialist,
            FieldChange::Description(_) => FormField::Description,
            FieldChange::DiagnosisCodes(_) => FormField::DiagnosisCodes,
            FieldChange::HealthCheckRating(_) => FormField::HealthCheckRating,
            FieldChange::DischargeDate(_) | FieldChange::DischargeCriteria(_) => FormField::Discharge,
            FieldChange::EmployerName(_) => FormField::EmployerName,
            FieldChange::SickLeaveStart(_) | FieldChange::SickLeaveEnd(_) => FormField::SickLeave,
        }
    }

    /// Write the change into a form record.
    pub fn apply(self, form: &mut EntryForm) {
        match self {
            FieldChange::EntryType(t) => form.entry_type = t,
            FieldChange::Date(v) => form.date = v,
            FieldChange::Specialist(v) => form.specialist = v,
            FieldChange::Description(v) => form.description = v,
            FieldChange::DiagnosisCodes(codes) => form.diagnosis_codes = Some(codes),
            FieldChange::HealthCheckRating(r) => form.health_check_rating = r,
            FieldChange::DischargeDate(v) => form.discharge.date = v,
            FieldChange::DischargeCriteria(v) => form.discharge.criteria = v,
            FieldChange::EmployerName(v) => form.employer_name = v,
            FieldChange::SickLeaveStart(v) => form.sick_leave.start_date = v,
            FieldChange::SickLeaveEnd(v) => form.sick_leave.end_date = v,
        }
    }
}
