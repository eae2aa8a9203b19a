//! Typed client for the patient records API.
//!
//! | Operation      | Method | Path                     |
//! |----------------|--------|--------------------------|
//! | liveness       | GET    | `/ping`                  |
//! | list patients  | GET    | `/patients`              |
//! | list diagnoses | GET    | `/diagnoses`             |
//! | get patient    | GET    | `/patients/{id}`         |
//! | add entry      | POST   | `/patients/{id}/entries` |

mod mock;
mod transport;

pub use mock::*;
pub use transport::*;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Diagnosis, NewEntry, Patient};

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Connection { message } => ApiError::Connection(message),
            TransportError::Status { status, body } => ApiError::Status { status, body },
        }
    }
}

impl ApiError {
    /// Text to show the user: the server's response body for status errors.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Request paths. Ids are percent-encoded as a single path segment.
pub mod paths {
    use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS};

    pub const PING: &str = "/ping";
    pub const PATIENTS: &str = "/patients";
    pub const DIAGNOSES: &str = "/diagnoses";

    const SEGMENT: &AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'#')
        .add(b'%')
        .add(b'/')
        .add(b'<')
        .add(b'>')
        .add(b'?')
        .add(b'`')
        .add(b'{')
        .add(b'}');

    fn segment(id: &str) -> PercentEncode<'_> {
        utf8_percent_encode(id, SEGMENT)
    }

    pub fn patient(id: &str) -> String {
        format!("{}/{}", PATIENTS, segment(id))
    }

    pub fn patient_entries(id: &str) -> String {
        format!("{}/{}/entries", PATIENTS, segment(id))
    }
}

/// Remote operations used by the session.
pub trait PatientApi: Send + Sync {
    /// Liveness check; the response body is ignored.
    fn ping(&self) -> ApiResult<()>;

    /// Patient summaries (no `ssn`, no `entries`).
    fn list_patients(&self) -> ApiResult<Vec<Patient>>;

    fn list_diagnoses(&self) -> ApiResult<Vec<Diagnosis>>;

    /// Full patient record.
    fn get_patient(&self, id: &str) -> ApiResult<Patient>;

    /// Append an entry; returns the full updated patient.
    fn add_entry(&self, patient_id: &str, entry: &NewEntry) -> ApiResult<Patient>;
}

/// [`PatientApi`] over any [`HttpTransport`], speaking JSON.
pub struct RemoteApi {
    transport: Arc<dyn HttpTransport>,
}

impl RemoteApi {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    fn get_json<T: DeserializeOwned>(&self, path: String) -> ApiResult<T> {
        tracing::debug!(path = %path, "GET");
        let body = self.transport.get(path)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl PatientApi for RemoteApi {
    fn ping(&self) -> ApiResult<()> {
        self.transport.get(paths::PING.to_string())?;
        Ok(())
    }

    fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.get_json(paths::PATIENTS.to_string())
    }

    fn list_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
        self.get_json(paths::DIAGNOSES.to_string())
    }

    fn get_patient(&self, id: &str) -> ApiResult<Patient> {
        self.get_json(paths::patient(id))
    }

    fn add_entry(&self, patient_id: &str, entry: &NewEntry) -> ApiResult<Patient> {
        let path = paths::patient_entries(patient_id);
        let body = serde_json::to_string(entry)?;
        tracing::debug!(path = %path, entry_type = %entry.entry_type(), "POST");
        let response = self.transport.post(path, body)?;
        Ok(serde_json::from_str(&response)?)
    }
}
