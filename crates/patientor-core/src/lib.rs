//! Patientor Core Library
//!
//! Client core for the patient record viewer: a cache of patients and
//! diagnoses, the add-entry form, and the remote API it all talks to.
//!
//! # Architecture
//!
//! ```text
//!   UI event ──► EntryFormState ──► validate ──► normalize_entry
//!                                                     │
//!                                              NewEntry (typed)
//!                                                     │
//!                                    PatientApi ──► HttpTransport ──► server
//!                                                     │
//!                                              full Patient record
//!                                                     │
//!                      ┌──────────────────────────────▼──────────────────┐
//!                      │  Store: reduce(state, action) + fetch fences   │
//!                      └──────────────────────────────┬──────────────────┘
//!                                                     │
//!                                              UI re-render (views)
//! ```
//!
//! # Core Principle
//!
//! **The server is authoritative.** The client never inserts entries
//! locally; after a mutation the cached patient is replaced by the server's
//! record, and late read responses never overwrite newer state.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Entry, Diagnosis, ...)
//! - [`store`]: Reducer, state and fetch fencing
//! - [`form`]: Entry form validation, normalization and edit state
//! - [`api`]: Remote API over a pluggable transport
//! - [`session`]: Context object tying store and API together
//! - [`view`]: Display summaries

pub mod api;
pub mod form;
pub mod models;
pub mod session;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use api::{ApiError, HttpTransport, MockTransport, PatientApi, RemoteApi, TransportError};
pub use form::{normalize_entry, validate, EntryForm, EntryFormState, FieldChange, FormErrors, FormField};
pub use models::{
    Diagnosis, Discharge, Entry, EntryCommon, EntryDetails, EntryType, Gender, HealthCheckRating,
    NewEntry, Patient, SickLeave,
};
pub use session::{PatientorSession, SessionError, SubmitError};
pub use store::{reduce, Action, State, Store};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientorError {
    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<SessionError> for PatientorError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Api(e) => PatientorError::RemoteError(e.user_message()),
            SessionError::Poisoned => PatientorError::InternalError("Store lock poisoned".into()),
        }
    }
}

impl From<SubmitError> for PatientorError {
    fn from(e: SubmitError) -> Self {
        match &e {
            SubmitError::Invalid(errors) => PatientorError::InvalidForm(
                errors
                    .fields()
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            SubmitError::Unchanged => PatientorError::InvalidForm(e.to_string()),
            SubmitError::Remote(api) => PatientorError::RemoteError(api.user_message()),
            SubmitError::Poisoned => PatientorError::InternalError(e.to_string()),
        }
    }
}

impl From<models::ModelError> for PatientorError {
    fn from(e: models::ModelError) -> Self {
        PatientorError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a session that reaches the API through `transport`.
#[uniffi::export]
pub fn new_session(transport: Arc<dyn HttpTransport>) -> Arc<PatientorCore> {
    Arc::new(PatientorCore {
        session: PatientorSession::with_transport(transport),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PatientorCore {
    session: PatientorSession,
}

#[uniffi::export]
impl PatientorCore {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Ping and load both reference lists; failures are logged only.
    pub fn initialize(&self) {
        self.session.initialize();
    }

    /// Returns false if a newer list already landed.
    pub fn load_patient_list(&self) -> Result<bool, PatientorError> {
        Ok(self.session.load_patient_list()?)
    }

    pub fn load_diagnoses(&self) -> Result<bool, PatientorError> {
        Ok(self.session.load_diagnoses()?)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Cached patients ordered by id.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, PatientorError> {
        let patients = self.session.patients()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Patient for the detail page, fetching details on first visit.
    pub fn open_patient(&self, id: String) -> Result<Option<FfiPatient>, PatientorError> {
        let patient = self.session.open_patient(&id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Cached patient, without fetching.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, PatientorError> {
        let patient = self.session.patient(&id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Render-ready patient page.
    pub fn patient_view(&self, id: String) -> Result<Option<FfiPatientView>, PatientorError> {
        let view = self.session.patient_view(&id)?;
        Ok(view.map(|v| v.into()))
    }

    // =========================================================================
    // Diagnosis Operations
    // =========================================================================

    pub fn list_diagnoses(&self) -> Result<Vec<FfiDiagnosis>, PatientorError> {
        let diagnoses = self.session.diagnoses()?;
        Ok(diagnoses.into_iter().map(|d| d.into()).collect())
    }

    pub fn find_diagnosis(&self, code: String) -> Result<Option<FfiDiagnosis>, PatientorError> {
        let diagnosis = self.session.find_diagnosis(&code)?;
        Ok(diagnosis.map(|d| d.into()))
    }

    /// Ranked diagnoses for the picker.
    pub fn search_diagnoses(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiScoredDiagnosis>, PatientorError> {
        let hits = self.session.search_diagnoses(&query, limit as usize)?;
        Ok(hits.into_iter().map(|h| h.into()).collect())
    }

    // =========================================================================
    // Entry Operations
    // =========================================================================

    /// Validation errors for the form; empty when it may be submitted.
    pub fn validate_entry(&self, form: FfiEntryForm) -> Result<Vec<FfiFieldError>, PatientorError> {
        let form = EntryForm::try_from(form)?;
        Ok(validate(&form)
            .iter()
            .map(|(field, message)| FfiFieldError {
                field: field.as_str().to_string(),
                message: message.to_string(),
            })
            .collect())
    }

    /// Submit a new entry; returns the server's updated patient.
    pub fn submit_entry(
        &self,
        patient_id: String,
        form: FfiEntryForm,
    ) -> Result<FfiPatient, PatientorError> {
        let form = EntryForm::try_from(form)?;
        let patient = self.session.submit_entry(&patient_id, &form)?;
        Ok(patient.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe gender.
#[derive(Debug, Clone, Copy, PartialEq, uniffi::Enum)]
pub enum FfiGender {
    Male,
    Female,
    Other,
}

impl From<Gender> for FfiGender {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => FfiGender::Male,
            Gender::Female => FfiGender::Female,
            Gender::Other => FfiGender::Other,
        }
    }
}

/// FFI-safe entry type.
#[derive(Debug, Clone, Copy, PartialEq, uniffi::Enum)]
pub enum FfiEntryType {
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl From<FfiEntryType> for EntryType {
    fn from(t: FfiEntryType) -> Self {
        match t {
            FfiEntryType::HealthCheck => EntryType::HealthCheck,
            FfiEntryType::Hospital => EntryType::Hospital,
            FfiEntryType::OccupationalHealthcare => EntryType::OccupationalHealthcare,
        }
    }
}

impl From<EntryType> for FfiEntryType {
    fn from(t: EntryType) -> Self {
        match t {
            EntryType::HealthCheck => FfiEntryType::HealthCheck,
            EntryType::Hospital => FfiEntryType::Hospital,
            EntryType::OccupationalHealthcare => FfiEntryType::OccupationalHealthcare,
        }
    }
}

/// FFI-safe diagnosis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiagnosis {
    pub code: String,
    pub name: String,
    pub latin: Option<String>,
}

impl From<Diagnosis> for FfiDiagnosis {
    fn from(d: Diagnosis) -> Self {
        Self {
            code: d.code,
            name: d.name,
            latin: d.latin,
        }
    }
}

/// FFI-safe search hit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScoredDiagnosis {
    pub diagnosis: FfiDiagnosis,
    pub score: f64,
}

impl From<models::ScoredDiagnosis> for FfiScoredDiagnosis {
    fn from(hit: models::ScoredDiagnosis) -> Self {
        Self {
            diagnosis: hit.diagnosis.into(),
            score: hit.score,
        }
    }
}

/// FFI-safe discharge.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDischarge {
    pub date: String,
    pub criteria: String,
}

/// FFI-safe sick leave.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSickLeave {
    pub start_date: String,
    pub end_date: String,
}

/// FFI-safe entry payload.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiEntryDetails {
    HealthCheck {
        health_check_rating: u8,
    },
    Hospital {
        discharge: FfiDischarge,
    },
    OccupationalHealthcare {
        employer_name: String,
        sick_leave: Option<FfiSickLeave>,
    },
}

/// FFI-safe entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEntry {
    pub id: String,
    pub date: String,
    pub specialist: String,
    pub description: String,
    pub diagnosis_codes: Vec<String>,
    pub details: FfiEntryDetails,
}

impl From<Entry> for FfiEntry {
    fn from(entry: Entry) -> Self {
        let details = match entry.details {
            EntryDetails::HealthCheck {
                health_check_rating,
            } => FfiEntryDetails::HealthCheck {
                health_check_rating: health_check_rating.into(),
            },
            EntryDetails::Hospital { discharge } => FfiEntryDetails::Hospital {
                discharge: FfiDischarge {
                    date: discharge.date,
                    criteria: discharge.criteria,
                },
            },
            EntryDetails::OccupationalHealthcare {
                employer_name,
                sick_leave,
            } => FfiEntryDetails::OccupationalHealthcare {
                employer_name,
                sick_leave: sick_leave.map(|s| FfiSickLeave {
                    start_date: s.start_date,
                    end_date: s.end_date,
                }),
            },
        };

        Self {
            id: entry.id,
            date: entry.common.date,
            specialist: entry.common.specialist,
            description: entry.common.description,
            diagnosis_codes: entry.common.diagnosis_codes.unwrap_or_default(),
            details,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub occupation: String,
    pub gender: FfiGender,
    pub ssn: Option<String>,
    pub date_of_birth: Option<String>,
    /// None for summary records
    pub entries: Option<Vec<FfiEntry>>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            occupation: patient.occupation,
            gender: patient.gender.into(),
            ssn: patient.ssn,
            date_of_birth: patient.date_of_birth,
            entries: patient
                .entries
                .map(|entries| entries.into_iter().map(|e| e.into()).collect()),
        }
    }
}

/// FFI-safe add-entry form values.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEntryForm {
    pub entry_type: FfiEntryType,
    pub date: String,
    pub specialist: String,
    pub description: String,
    pub diagnosis_codes: Option<Vec<String>>,
    /// 0 = Healthy .. 3 = CriticalRisk
    pub health_check_rating: u8,
    pub discharge: FfiDischarge,
    pub employer_name: String,
    pub sick_leave: FfiSickLeave,
}

impl TryFrom<FfiEntryForm> for EntryForm {
    type Error = models::ModelError;

    fn try_from(form: FfiEntryForm) -> Result<Self, Self::Error> {
        Ok(EntryForm {
            entry_type: form.entry_type.into(),
            date: form.date,
            specialist: form.specialist,
            description: form.description,
            diagnosis_codes: form.diagnosis_codes,
            health_check_rating: HealthCheckRating::try_from(form.health_check_rating)?,
            discharge: Discharge {
                date: form.discharge.date,
                criteria: form.discharge.criteria,
            },
            employer_name: form.employer_name,
            sick_leave: SickLeave {
                start_date: form.sick_leave.start_date,
                end_date: form.sick_leave.end_date,
            },
        })
    }
}

/// FFI-safe validation failure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

/// FFI-safe entry view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEntryView {
    pub id: String,
    pub entry_type: FfiEntryType,
    pub date: String,
    pub description: String,
    pub diagnoses: Vec<FfiDiagnosis>,
    pub detail_lines: Vec<String>,
    /// Indicator colour name, health checks only
    pub indicator: Option<String>,
}

impl From<view::EntryView> for FfiEntryView {
    fn from(v: view::EntryView) -> Self {
        Self {
            id: v.id,
            entry_type: v.entry_type.into(),
            date: v.date,
            description: v.description,
            diagnoses: v.diagnoses.into_iter().map(|d| d.into()).collect(),
            detail_lines: v.detail_lines,
            indicator: v.indicator.map(|i| i.as_str().to_string()),
        }
    }
}

/// FFI-safe patient view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientView {
    pub id: String,
    pub name: String,
    pub gender_icon: String,
    pub ssn: Option<String>,
    pub occupation: String,
    pub entries: Vec<FfiEntryView>,
}

impl From<view::PatientView> for FfiPatientView {
    fn from(v: view::PatientView) -> Self {
        Self {
            id: v.id,
            name: v.name,
            gender_icon: v.gender_icon.to_string(),
            ssn: v.ssn,
            occupation: v.occupation,
            entries: v.entries.into_iter().map(|e| e.into()).collect(),
        }
    }
}
