//! Entry form state across edits.

use std::collections::BTreeSet;

use super::{normalize_entry, validate, EntryForm, FieldChange, FormErrors, FormField};
use crate::models::NewEntry;

/// Tracks one editing session of the add-entry form.
#[derive(Debug, Clone)]
pub struct EntryFormState {
    initial: EntryForm,
    values: EntryForm,
    errors: FormErrors,
    touched: BTreeSet<FormField>,
    /// Message from the last failed submission, shown until reset
    submit_error: Option<String>,
}

impl Default for EntryFormState {
    fn default() -> Self {
        Self::new(EntryForm::default())
    }
}

impl EntryFormState {
    pub fn new(initial: EntryForm) -> Self {
        let errors = validate(&initial);
        Self {
            values: initial.clone(),
            initial,
            errors,
            touched: BTreeSet::new(),
            submit_error: None,
        }
    }

    /// Apply a user edit and re-run validation.
    pub fn change(&mut self, change: FieldChange) -> &FormErrors {
        self.touched.insert(change.field());
        change.apply(&mut self.values);
        self.errors = validate(&self.values);
        &self.errors
    }

    /// Mark a field as visited without changing it.
    pub fn touch(&mut self, field: FormField) {
        self.touched.insert(field);
    }

    pub fn values(&self) -> &EntryForm {
        &self.values
    }

    /// All current validation errors.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Errors for fields the user has visited.
    pub fn visible_errors(&self) -> FormErrors {
        let mut visible = self.errors.clone();
        visible.retain(|field| self.touched.contains(&field));
        visible
    }

    /// Values differ from the initial values.
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// Submit is enabled only for a valid, modified form.
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty() && self.is_dirty()
    }

    /// Normalized payload, or the blocking errors.
    pub fn submission(&self) -> Result<NewEntry, FormErrors> {
        if self.errors.is_empty() {
            Ok(normalize_entry(&self.values))
        } else {
            Err(self.errors.clone())
        }
    }

    pub fn set_submit_error(&mut self, message: impl Into<String>) {
        self.submit_error = Some(message.into());
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Back to the initial values; clears touched fields and submit error.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors = validate(&self.values);
        self.touched.clear();
        self.submit_error = None;
    }
}
