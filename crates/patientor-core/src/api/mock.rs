//! In-memory transport for tests and previews.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::{HttpTransport, TransportError};

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

/// Serves canned responses per (method, path) and records every request.
///
/// Unknown routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Result<String, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw response for a route.
    pub fn respond(&self, method: Method, path: &str, response: Result<String, TransportError>) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert((method, path.to_string()), response);
        }
    }

    /// Answer a route with a serialized value.
    pub fn respond_json<T: Serialize>(&self, method: Method, path: &str, value: &T) {
        let body = serde_json::to_string(value).map_err(|e| TransportError::Status {
            status: 500,
            body: e.to_string(),
        });
        self.respond(method, path, body);
    }

    /// Builder form of [`respond_json`](Self::respond_json).
    pub fn with_json<T: Serialize>(self, method: Method, path: &str, value: &T) -> Self {
        self.respond_json(method, path, value);
        self
    }

    /// Builder form of [`respond`](Self::respond) for an error status.
    pub fn with_status(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.respond(
            method,
            path,
            Err(TransportError::Status {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Requests received for one route.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn handle(&self, method: Method, path: String, body: Option<String>) -> Result<String, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                method,
                path: path.clone(),
                body,
            });
        }

        let routes = self.routes.lock().map_err(|_| TransportError::Connection {
            message: "mock transport lock poisoned".into(),
        })?;
        routes
            .get(&(method, path.clone()))
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 404,
                    body: format!("Unknown endpoint: {}", path),
                })
            })
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, path: String) -> Result<String, TransportError> {
        self.handle(Method::Get, path, None)
    }

    fn post(&self, path: String, body: String) -> Result<String, TransportError> {
        self.handle(Method::Post, path, Some(body))
    }
}
