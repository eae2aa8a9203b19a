//! Entry form validation.
//!
//! Rules are independent and all run on every pass:
//! - date, description, specialist: always required
//! - discharge (date and criteria): required for Hospital entries
//! - employerName: required for OccupationalHealthcare entries
//!
//! Health check rating and sick leave have no rules.

use std::collections::BTreeMap;

use super::{EntryForm, FormField};
use crate::models::EntryType;

/// Message shown for a missing required field.
pub const REQUIRED_MESSAGE: &str = "Field is required";

/// Validation result: one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: &'static str) {
        self.errors.insert(field, message);
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failing fields in declaration order.
    pub fn fields(&self) -> Vec<FormField> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    /// Keep only errors for the given fields.
    pub fn retain(&mut self, mut keep: impl FnMut(FormField) -> bool) {
        self.errors.retain(|field, _| keep(*field));
    }
}

/// Validate a form record.
pub fn validate(form: &EntryForm) -> FormErrors {
    let mut errors = FormErrors::new();

    if form.date.is_empty() {
        errors.insert(FormField::Date, REQUIRED_MESSAGE);
    }
    if form.description.is_empty() {
        errors.insert(FormField::Description, REQUIRED_MESSAGE);
    }
    if form.specialist.is_empty() {
        errors.insert(FormField::Specialist, REQUIRED_MESSAGE);
    }
    if form.entry_type == EntryType::Hospital && !form.discharge.is_complete() {
        errors.insert(FormField::Discharge, REQUIRED_MESSAGE);
    }
    if form.entry_type == EntryType::OccupationalHealthcare && form.employer_name.is_empty() {
        errors.insert(FormField::EmployerName, REQUIRED_MESSAGE);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Discharge, HealthCheckRating};

    fn filled(entry_type: EntryType) -> EntryForm {
        EntryForm {
            entry_type,
            date: "2020-01-01".into(),
            specialist: "MD House".into(),
            description: "Checkup".into(),
            discharge: Discharge {
                date: "2020-01-05".into(),
                criteria: "recovered".into(),
            },
            employer_name: "FBI".into(),
            ..EntryForm::default()
        }
    }

    #[test]
    fn test_untouched_form_requires_common_fields() {
        let errors = validate(&EntryForm::default());
        assert_eq!(
            errors.fields(),
            vec![
                FormField::Date,
                FormField::Specialist,
                FormField::Description,
                FormField::Discharge
            ]
        );
        assert_eq!(errors.get(FormField::Date), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_hospital_missing_discharge_date_only() {
        let mut form = filled(EntryType::Hospital);
        form.discharge.date = String::new();

        let errors = validate(&form);
        assert_eq!(errors.fields(), vec![FormField::Discharge]);
    }

    #[test]
    fn test_hospital_missing_discharge_criteria() {
        let mut form = filled(EntryType::Hospital);
        form.discharge.criteria = String::new();
        assert!(validate(&form).contains(FormField::Discharge));
    }

    #[test]
    fn test_employer_name_only_for_occupational() {
        let mut form = filled(EntryType::OccupationalHealthcare);
        form.employer_name = String::new();
        assert!(validate(&form).contains(FormField::EmployerName));

        form.entry_type = EntryType::Hospital;
        assert!(!validate(&form).contains(FormField::EmployerName));
    }

    #[test]
    fn test_discharge_ignored_for_other_types() {
        let mut form = filled(EntryType::HealthCheck);
        form.discharge = Discharge::default();
        form.health_check_rating = HealthCheckRating::CriticalRisk;
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn test_sick_leave_never_required() {
        let form = filled(EntryType::OccupationalHealthcare);
        assert!(form.sick_leave.is_blank());
        assert!(validate(&form).is_empty());
    }
}
