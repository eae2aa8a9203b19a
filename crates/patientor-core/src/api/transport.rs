//! Transport seam between the core and an HTTP stack.
//!
//! Native shells may implement [`HttpTransport`] on their side of the FFI;
//! Rust hosts use `patientor-remote`.

use thiserror::Error;

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Error, uniffi::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, timeout, ...).
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TransportError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        TransportError::Connection { message: e.reason }
    }
}

/// Minimal JSON-over-HTTP transport.
///
/// Paths are relative to the API base (e.g. `/patients/abc`); the
/// implementation owns the base URL, headers and timeouts.
#[uniffi::export(with_foreign)]
pub trait HttpTransport: Send + Sync {
    /// GET `path`, returning the response body.
    fn get(&self, path: String) -> Result<String, TransportError>;

    /// POST a JSON `body` to `path`, returning the response body.
    fn post(&self, path: String, body: String) -> Result<String, TransportError>;
}
