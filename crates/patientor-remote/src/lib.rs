//! Blocking HTTP transport for the patientor core.
//!
//! This crate provides [`ReqwestTransport`], an [`HttpTransport`] backed by
//! a blocking reqwest client, and the [`RemoteConfig`] it is built from.
//!
//! [`HttpTransport`]: patientor_core::HttpTransport

pub mod client;
pub mod config;

pub use client::*;
pub use config::*;

use thiserror::Error;

/// Errors raised while setting up the transport.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
