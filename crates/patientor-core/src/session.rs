//! Session context handed to UI handlers.
//!
//! Owns the store and the remote API. Every store change goes through the
//! reducer under the store lock; the lock is never held across a remote
//! call, so reads and submissions from different threads interleave freely
//! and fetch fences decide which responses land: per key, in issue order.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::api::{ApiError, HttpTransport, PatientApi, RemoteApi};
use crate::form::{normalize_entry, validate, EntryForm, EntryFormState, FormErrors};
use crate::models::{self, Diagnosis, Patient, ScoredDiagnosis};
use crate::store::{Action, FetchKey, State, Store};
use crate::view::PatientView;

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Entry submission errors.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Entry form has {} invalid field(s)", .0.len())]
    Invalid(FormErrors),

    #[error("Entry form has no changes")]
    Unchanged,

    #[error("Entry rejected: {0}")]
    Remote(#[from] ApiError),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl SubmitError {
    /// Text for the form's error banner.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Remote(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<SessionError> for SubmitError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Api(e) => SubmitError::Remote(e),
            SessionError::Poisoned => SubmitError::Poisoned,
        }
    }
}

/// Patient/diagnosis cache plus the remote it is filled from.
pub struct PatientorSession {
    api: Arc<dyn PatientApi>,
    store: Mutex<Store>,
}

impl PatientorSession {
    pub fn new(api: Arc<dyn PatientApi>) -> Self {
        Self {
            api,
            store: Mutex::new(Store::new()),
        }
    }

    /// Session speaking JSON over the given transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(Arc::new(RemoteApi::new(transport)))
    }

    fn store(&self) -> SessionResult<MutexGuard<'_, Store>> {
        self.store.lock().map_err(|_| SessionError::Poisoned)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Liveness check. Failures are only logged.
    pub fn ping(&self) {
        match self.api.ping() {
            Ok(()) => tracing::debug!("remote is alive"),
            Err(e) => tracing::debug!(error = %e, "ping failed"),
        }
    }

    /// Startup loading: ping, then diagnoses and patients independently.
    ///
    /// Each failure is logged and leaves the store as it was. The two loads
    /// run one after the other on the calling thread; hosts that want them
    /// to proceed independently call [`load_diagnoses`](Self::load_diagnoses)
    /// and [`load_patient_list`](Self::load_patient_list) from separate threads.
    pub fn initialize(&self) {
        self.ping();
        if let Err(e) = self.load_diagnoses() {
            tracing::warn!(error = %e, "diagnosis list unavailable");
        }
        if let Err(e) = self.load_patient_list() {
            tracing::warn!(error = %e, "patient list unavailable");
        }
    }

    /// Fetch patient summaries and merge them into the cache.
    ///
    /// Returns whether the response was applied (`false` if a newer
    /// list response already landed).
    pub fn load_patient_list(&self) -> SessionResult<bool> {
        let ticket = self.store()?.begin_fetch(FetchKey::PatientList);
        let patients = self.api.list_patients()?;
        let count = patients.len();

        let applied = self
            .store()?
            .apply_fetched(&ticket, Action::SetPatientList(patients));
        if applied {
            tracing::info!(count, "patient list loaded");
        } else {
            tracing::debug!(sequence = ticket.sequence, "stale patient list dropped");
        }
        Ok(applied)
    }

    /// Fetch the diagnosis reference list and replace the cached one.
    pub fn load_diagnoses(&self) -> SessionResult<bool> {
        let ticket = self.store()?.begin_fetch(FetchKey::Diagnoses);
        let diagnoses = self.api.list_diagnoses()?;
        let count = diagnoses.len();

        let applied = self
            .store()?
            .apply_fetched(&ticket, Action::SetDiagnosisList(diagnoses));
        if applied {
            tracing::info!(count, "diagnosis list loaded");
        } else {
            tracing::debug!(sequence = ticket.sequence, "stale diagnosis list dropped");
        }
        Ok(applied)
    }

    /// Patient for the detail view, fetching details on first visit.
    ///
    /// Only records without an `ssn` are fetched; a filled record is never
    /// fetched again. Fetch failures are logged and the cached record (if
    /// any) is returned.
    pub fn open_patient(&self, id: &str) -> SessionResult<Option<Patient>> {
        let ticket = {
            let mut store = self.store()?;
            if !store.state().needs_detail(id) {
                return Ok(store.state().patient(id).cloned());
            }
            store.begin_fetch(FetchKey::Patient(id.to_string()))
        };

        match self.api.get_patient(id) {
            Ok(patient) if patient.id != id => {
                tracing::warn!(
                    patient_id = id,
                    returned_id = %patient.id,
                    "detail response for a different patient dropped"
                );
            }
            Ok(patient) => {
                let applied = self
                    .store()?
                    .apply_fetched(&ticket, Action::UpdatePatientInfo(patient));
                if applied {
                    tracing::debug!(patient_id = id, "patient details loaded");
                } else {
                    tracing::debug!(
                        patient_id = id,
                        sequence = ticket.sequence,
                        "stale patient details dropped"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(patient_id = id, error = %e, "failed to fetch patient details");
            }
        }

        Ok(self.store()?.state().patient(id).cloned())
    }

    // =========================================================================
    // Entry submission
    // =========================================================================

    /// Validate, normalize and send a new entry.
    ///
    /// On success the server's record is returned and replaces the cached
    /// patient, unless a response to a later submission or detail read for
    /// the same patient has already landed. On failure the store is untouched.
    pub fn submit_entry(&self, patient_id: &str, form: &EntryForm) -> Result<Patient, SubmitError> {
        let errors = validate(form);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let entry = normalize_entry(form);
        let ticket = self
            .store()?
            .begin_fetch(FetchKey::Patient(patient_id.to_string()));
        let patient = match self.api.add_entry(patient_id, &entry) {
            Ok(patient) => patient,
            Err(e) => {
                tracing::warn!(patient_id, error = %e, "entry submission failed");
                return Err(SubmitError::Remote(e));
            }
        };

        let applied = self.store()?.apply_mutation(&ticket, patient.clone());
        tracing::info!(
            patient_id,
            entry_type = %entry.entry_type(),
            "entry added"
        );
        if !applied {
            tracing::debug!(
                patient_id,
                sequence = ticket.sequence,
                "stale submission response not cached"
            );
        }
        Ok(patient)
    }

    /// Submit from the add-entry form.
    ///
    /// Only a valid form that differs from its initial values is sent.
    /// Resets the form on success; on failure records the user-visible
    /// message on the form so it stays open for correction.
    pub fn submit_form(
        &self,
        patient_id: &str,
        form: &mut EntryFormState,
    ) -> Result<Patient, SubmitError> {
        if !form.can_submit() {
            let err = if form.errors().is_empty() {
                SubmitError::Unchanged
            } else {
                SubmitError::Invalid(form.errors().clone())
            };
            form.set_submit_error(err.user_message());
            return Err(err);
        }

        match self.submit_entry(patient_id, form.values()) {
            Ok(patient) => {
                form.reset();
                Ok(patient)
            }
            Err(e) => {
                form.set_submit_error(e.user_message());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn state(&self) -> SessionResult<State> {
        Ok(self.store()?.state().clone())
    }

    /// Cached patients ordered by id.
    pub fn patients(&self) -> SessionResult<Vec<Patient>> {
        Ok(self
            .store()?
            .state()
            .patient_list()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Cached patient, without fetching.
    pub fn patient(&self, id: &str) -> SessionResult<Option<Patient>> {
        Ok(self.store()?.state().patient(id).cloned())
    }

    pub fn diagnoses(&self) -> SessionResult<Vec<Diagnosis>> {
        Ok(self.store()?.state().diagnoses().to_vec())
    }

    pub fn find_diagnosis(&self, code: &str) -> SessionResult<Option<Diagnosis>> {
        let store = self.store()?;
        Ok(models::find_diagnosis(code, store.state().diagnoses()).cloned())
    }

    pub fn search_diagnoses(&self, query: &str, limit: usize) -> SessionResult<Vec<ScoredDiagnosis>> {
        let store = self.store()?;
        Ok(models::search_diagnoses(query, store.state().diagnoses(), limit))
    }

    /// Render-ready view of a cached patient.
    pub fn patient_view(&self, id: &str) -> SessionResult<Option<PatientView>> {
        let store = self.store()?;
        let state = store.state();
        Ok(state
            .patient(id)
            .map(|p| PatientView::from_patient(p, state.diagnoses())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, MockTransport};
    use crate::form::{FieldChange, FormField};
    use crate::models::{EntryType, Gender};
    use serde_json::json;

    fn session(mock: MockTransport) -> (Arc<MockTransport>, PatientorSession) {
        let mock = Arc::new(mock);
        let session = PatientorSession::with_transport(mock.clone());
        (mock, session)
    }

    fn summaries() -> serde_json::Value {
        json!([
            {"id": "p1", "name": "John McClane", "occupation": "Cop", "gender": "male"},
            {"id": "p2", "name": "Martin Riggs", "occupation": "Cop", "gender": "male"}
        ])
    }

    #[test]
    fn test_initialize_loads_both_lists() {
        let (_, session) = session(
            MockTransport::new()
                .with_json(Method::Get, "/ping", &"pong")
                .with_json(Method::Get, "/patients", &summaries())
                .with_json(
                    Method::Get,
                    "/diagnoses",
                    &json!([{"code": "M24.2", "name": "Disorder of ligament"}]),
                ),
        );

        session.initialize();

        assert_eq!(session.patients().unwrap().len(), 2);
        assert_eq!(session.diagnoses().unwrap().len(), 1);
    }

    #[test]
    fn test_initialize_survives_failures() {
        let (_, session) = session(
            MockTransport::new()
                .with_status(Method::Get, "/diagnoses", 500, "boom")
                .with_json(Method::Get, "/patients", &summaries()),
        );

        session.initialize();

        assert!(session.diagnoses().unwrap().is_empty());
        assert_eq!(session.patients().unwrap().len(), 2);
    }

    #[test]
    fn test_open_patient_fetches_once() {
        let detail = json!({
            "id": "p1", "name": "John McClane", "occupation": "Cop", "gender": "male",
            "ssn": "090786-122X", "dateOfBirth": "1986-07-09", "entries": []
        });
        let (mock, session) = session(
            MockTransport::new()
                .with_json(Method::Get, "/patients", &summaries())
                .with_json(Method::Get, "/patients/p1", &detail),
        );
        session.load_patient_list().unwrap();

        let first = session.open_patient("p1").unwrap().unwrap();
        assert!(first.has_details());
        session.open_patient("p1").unwrap();

        assert_eq!(mock.requests_to(Method::Get, "/patients/p1").len(), 1);
    }

    #[test]
    fn test_open_patient_fetch_error_returns_cached() {
        let (_, session) = session(
            MockTransport::new()
                .with_json(Method::Get, "/patients", &summaries())
                .with_status(Method::Get, "/patients/p1", 500, "down"),
        );
        session.load_patient_list().unwrap();

        let patient = session.open_patient("p1").unwrap().unwrap();
        assert!(!patient.has_details());
        assert!(session.open_patient("missing").unwrap().is_none());
    }

    #[test]
    fn test_open_patient_drops_mismatched_record() {
        let (_, session) = session(MockTransport::new().with_json(
            Method::Get,
            "/patients/p1",
            &json!({"id": "p2", "name": "X", "occupation": "Y", "gender": "other", "ssn": "1"}),
        ));

        assert!(session.open_patient("p1").unwrap().is_none());
        assert!(session.patient("p2").unwrap().is_none());
    }

    #[test]
    fn test_submit_invalid_form_never_calls_remote() {
        let (mock, session) = session(MockTransport::new());

        let err = session.submit_entry("p1", &EntryForm::default()).unwrap_err();
        match err {
            SubmitError::Invalid(errors) => assert!(errors.contains(FormField::Date)),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_submit_form_keeps_remote_error_on_form() {
        let (_, session) = session(MockTransport::new().with_status(
            Method::Post,
            "/patients/p1/entries",
            400,
            "Incorrect or missing date",
        ));
        let mut form = EntryFormState::default();
        form.change(FieldChange::EntryType(EntryType::OccupationalHealthcare));
        form.change(FieldChange::Date("yesterday".into()));
        form.change(FieldChange::Specialist("MD House".into()));
        form.change(FieldChange::Description("Checkup".into()));
        form.change(FieldChange::EmployerName("HyPD".into()));

        assert!(session.submit_form("p1", &mut form).is_err());
        assert_eq!(form.submit_error(), Some("Incorrect or missing date"));
        assert!(form.is_dirty());
        assert!(session.patient("p1").unwrap().is_none());
    }

    #[test]
    fn test_submit_form_rejects_untouched_form() {
        let (mock, session) = session(MockTransport::new().with_json(
            Method::Post,
            "/patients/p1/entries",
            &json!({"id": "p1", "name": "A", "occupation": "B", "gender": "other", "ssn": "1"}),
        ));
        let mut filled = EntryFormState::default();
        filled.change(FieldChange::EntryType(EntryType::HealthCheck));
        filled.change(FieldChange::Date("2019-10-20".into()));
        filled.change(FieldChange::Specialist("MD House".into()));
        filled.change(FieldChange::Description("Checkup".into()));
        let mut form = EntryFormState::new(filled.values().clone());
        assert!(form.errors().is_empty());

        let err = session.submit_form("p1", &mut form).unwrap_err();

        assert!(matches!(err, SubmitError::Unchanged));
        assert_eq!(form.submit_error(), Some("Entry form has no changes"));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_patient_view_resolves_diagnoses() {
        let detail = json!({
            "id": "p1", "name": "John McClane", "occupation": "Cop", "gender": "male",
            "ssn": "090786-122X",
            "entries": [{
                "id": "e1", "date": "2015-01-02", "type": "Hospital", "specialist": "MD House",
                "diagnosisCodes": ["S62.5", "Z99.9"], "description": "Thumb fracture.",
                "discharge": {"date": "2015-01-16", "criteria": "Thumb has healed."}
            }]
        });
        let (_, session) = session(
            MockTransport::new()
                .with_json(Method::Get, "/patients/p1", &detail)
                .with_json(
                    Method::Get,
                    "/diagnoses",
                    &json!([{"code": "S62.5", "name": "Fracture of thumb", "latin": "Fractura [ossis] pollicis"}]),
                ),
        );
        session.load_diagnoses().unwrap();
        session.open_patient("p1").unwrap();

        let view = session.patient_view("p1").unwrap().unwrap();
        assert_eq!(view.gender_icon, Gender::Male.icon());
        assert_eq!(view.entries[0].diagnoses.len(), 1);
        assert_eq!(view.entries[0].detail_lines[0], "Discharged: 2015-01-16");
    }
}
