//
//  redmine-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Redmine REST API
//!
//! This module provides the error taxonomy shared by every layer of the client,
//! plus the pagination types re-exported from the [`pagination`] submodule.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`Result`] - Result alias using [`ApiError`]
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use redmine_client::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Authentication(_)) => println!("Check your API key"),
//!         Err(ApiError::Validation { errors }) => {
//!             for error in errors {
//!                 println!("Rejected: {}", error);
//!             }
//!         }
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Every failure the caller can act on gets its own variant
//! - Network faults and malformed payloads are separate kinds:
//!   the first is a connectivity problem, the second a protocol mismatch

use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for all Redmine API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `Authentication` | Credentials missing or invalid | 401 |
/// | `Authorization` | Authenticated, but not allowed | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `Validation` | Server rejected the payload | 422 |
/// | `Http` | Any other non-success status | other |
/// | `Communication` | Network or transport fault | N/A |
/// | `Format` | Body arrived but could not be decoded | N/A |
/// | `Configuration` | Invalid host or credentials at construction | N/A |
/// | `MissingIdentifier` | Update attempted on an entity without an id | N/A |
///
/// # Example
///
/// ```rust
/// use redmine_client::api::common::ApiError;
///
/// let error = ApiError::Validation {
///     errors: vec!["Name cannot be blank".to_string(), "Identifier is too short".to_string()],
/// };
///
/// assert_eq!(error.validation_errors().len(), 2);
/// ```
///
/// # Notes
///
/// - No variant is ever downgraded into another; a 404 is never reported as
///   a generic HTTP failure and a decode failure is never reported as a
///   network failure
/// - Nothing is retried by the library; `Communication` errors on idempotent
///   reads are safe to retry at the caller's discretion
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401).
    ///
    /// Raised when no credentials were supplied for a protected resource or
    /// when the API key / login / password is wrong.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The credentials are valid but lack permission (HTTP 403).
    #[error("Permission denied: {0}")]
    Authorization(String),

    /// The requested resource does not exist (HTTP 404).
    ///
    /// # Parameters
    ///
    /// - `body` - The raw response body, kept for diagnostics
    #[error("Resource not found: {body}")]
    NotFound {
        /// Raw response body returned with the 404.
        body: String,
    },

    /// The server rejected the request payload (HTTP 422).
    ///
    /// All messages from the response's `errors` array are preserved in
    /// order; callers should present every one of them.
    #[error("Validation failed: {}", .errors.join("; "))]
    Validation {
        /// Human readable messages, in the order the server sent them.
        errors: Vec<String>,
    },

    /// The server answered with a status this client does not classify.
    #[error("Unexpected HTTP status {status}: {body}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// A network-level error occurred (DNS, connect, timeout, broken body).
    ///
    /// The underlying `reqwest::Error` is always kept as the error source.
    #[error("Communication error while {context}: {source}")]
    Communication {
        /// What the client was doing when the fault happened.
        context: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The body arrived but was not valid JSON or not in the expected shape.
    #[error("Unexpected response format: {0}")]
    Format(String),

    /// Invalid settings supplied when building the client.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An update or delete needs the entity's id, and it has none.
    #[error("Cannot address {entity} without an id")]
    MissingIdentifier {
        /// Singular wire name of the entity.
        entity: &'static str,
    },
}

impl ApiError {
    /// Builds a [`ApiError::Communication`] wrapping a transport error.
    pub fn communication(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Communication {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` for [`ApiError::NotFound`].
    ///
    /// Handy for existence checks that treat absence as a normal outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for errors that indicate a decode problem rather than
    /// a network problem.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Returns the validation messages, or an empty slice for other kinds.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Format(format!("malformed JSON: {error}"))
    }
}
