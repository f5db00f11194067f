//
//  redmine-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Communicator
//!
//! This module performs one blocking HTTP round trip at a time and turns the
//! result into either a raw [`Response`] or a typed [`ApiError`].
//!
//! ## Features
//!
//! - Response bodies are read eagerly; the connection is released before a
//!   [`Response`] exists
//! - Status codes map onto the error taxonomy in one place
//! - A 404 can be observed as a value through [`Outcome::NotFound`]
//! - Request method and URL path are logged; query strings are not, since
//!   they may carry the API key
//!
//! ## Status Mapping
//!
//! | Status | Result |
//! |--------|--------|
//! | 2xx | [`Outcome::Success`] |
//! | 401 | [`ApiError::Authentication`] |
//! | 403 | [`ApiError::Authorization`] |
//! | 404 | [`Outcome::NotFound`] |
//! | 422 | [`ApiError::Validation`] |
//! | other | [`ApiError::Http`] |
//!
//! Failures below HTTP (DNS, connect, TLS, timeouts, broken bodies) become
//! [`ApiError::Communication`].

use std::io::Write;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::api::common::{ApiError, Result};

/// Extracts a short human readable message from an error body.
///
/// The server reports errors as:
/// ```json
/// {"errors": ["Subject cannot be blank"]}
/// ```
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `body` - The raw error response body
///
/// # Returns
///
/// The first message found, or the status line plus the raw body.
pub fn format_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(error_message)
        {
            return message;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}

/// Parses the `errors` array of a 422 body.
///
/// Three element shapes are accepted:
///
/// - `"Identifier is reserved"`
/// - `{"message": "Identifier is reserved"}`
/// - `["identifier", "is reserved"]`, as sent by early server versions
///
/// # Errors
///
/// Returns [`ApiError::Format`] if the body is not JSON, has no `errors`
/// array, or contains an element of another shape.
pub fn parse_validation_errors(body: &str) -> Result<Vec<String>> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::Format(format!("unparsable validation response: {e}")))?;

    let errors = json
        .get("errors")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Format(format!("validation response without errors: {body}")))?;

    errors
        .iter()
        .map(|error| {
            error_message(error).ok_or_else(|| {
                ApiError::Format(format!("unrecognised validation error entry: {error}"))
            })
        })
        .collect()
}

fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(object) => object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Array(parts) => {
            let parts: Option<Vec<&str>> = parts.iter().map(Value::as_str).collect();
            parts.filter(|p| !p.is_empty()).map(|p| p.join(" "))
        }
        _ => None,
    }
}

/// A completed exchange with a success or 404 status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Full response body, unmodified.
    pub body: String,
}

/// Result of an exchange at the communicator boundary.
///
/// A 404 is not an error at this level; callers that look an entity up
/// decide whether absence is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx.
    Success(Response),
    /// 404.
    NotFound(Response),
}

impl Outcome {
    /// Converts [`Outcome::NotFound`] into [`ApiError::NotFound`].
    pub fn into_result(self) -> Result<Response> {
        match self {
            Self::Success(response) => Ok(response),
            Self::NotFound(response) => Err(ApiError::NotFound {
                body: response.body,
            }),
        }
    }
}

/// Maps a status and body onto an [`Outcome`] or an error.
pub fn classify(status: StatusCode, body: String) -> Result<Outcome> {
    let code = status.as_u16();
    match status {
        s if s.is_success() => Ok(Outcome::Success(Response { status: code, body })),
        StatusCode::NOT_FOUND => Ok(Outcome::NotFound(Response { status: code, body })),
        StatusCode::UNAUTHORIZED => Err(ApiError::Authentication(format_api_error(status, &body))),
        StatusCode::FORBIDDEN => Err(ApiError::Authorization(format_api_error(status, &body))),
        StatusCode::UNPROCESSABLE_ENTITY => Err(ApiError::Validation {
            errors: parse_validation_errors(&body)?,
        }),
        _ => Err(ApiError::Http { status: code, body }),
    }
}

/// Executes requests built by the transport.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_client::api::client::Communicator;
///
/// let communicator = Communicator::new("my-app/1.0")?;
/// let request = communicator.http().get("https://redmine.example.com/projects.json");
/// let response = communicator.send(request)?;
/// println!("{}", response.body);
/// # Ok::<(), redmine_client::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Communicator {
    http: Client,
}

impl Communicator {
    /// Creates a communicator sending the given `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Communication`] if the TLS backend cannot be
    /// initialised.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::communication("building the HTTP client", e))?;
        Ok(Self { http })
    }

    /// The underlying HTTP client, for building requests.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Performs one round trip, reporting 404 as a value.
    pub fn exchange(&self, request: RequestBuilder) -> Result<Outcome> {
        let response = self.execute(request)?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiError::communication("reading the response body", e))?;
        classify(status, body)
    }

    /// Performs one round trip; 404 becomes [`ApiError::NotFound`].
    pub fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.exchange(request)?.into_result()
    }

    /// Performs one round trip and streams a successful body into `sink`.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    pub fn stream(&self, request: RequestBuilder, sink: &mut dyn Write) -> Result<u64> {
        let mut response = self.execute(request)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .map_err(|e| ApiError::communication("reading the response body", e))?;
            classify(status, body)?.into_result()?;
            return Ok(0);
        }

        response
            .copy_to(sink)
            .map_err(|e| ApiError::communication("streaming the response body", e))
    }

    fn execute(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let request = request
            .build()
            .map_err(|e| ApiError::communication("building the request", e))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending request");

        let response = self
            .http
            .execute(request)
            .map_err(|e| ApiError::communication(format!("{method} {path}"), e))?;
        debug!(%method, %path, status = response.status().as_u16(), "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validation_errors_shapes() {
        assert_eq!(
            parse_validation_errors(r#"{"errors": ["Identifier is reserved"]}"#).unwrap(),
            vec!["Identifier is reserved"]
        );
        assert_eq!(
            parse_validation_errors(r#"{"errors": [{"message": "Name is too long"}, "x"]}"#)
                .unwrap(),
            vec!["Name is too long", "x"]
        );
        assert_eq!(
            parse_validation_errors(r#"{"errors": [["identifier", "is reserved"]]}"#).unwrap(),
            vec!["identifier is reserved"]
        );
    }

    #[test]
    fn test_unparsable_validation_body_is_format_error() {
        assert!(parse_validation_errors("<html>oops</html>").unwrap_err().is_format());
        assert!(parse_validation_errors(r#"{"status": 422}"#).unwrap_err().is_format());
        assert!(parse_validation_errors(r#"{"errors": [42]}"#).unwrap_err().is_format());
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            classify(StatusCode::CREATED, "{}".into()),
            Ok(Outcome::Success(Response { status: 201, .. }))
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, String::new()),
            Ok(Outcome::NotFound(_))
        ));
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, String::new()),
            Err(ApiError::Authentication(_))
        ));
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, String::new()),
            Err(ApiError::Authorization(_))
        ));
        assert!(matches!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, r#"{"errors":["a"]}"#.into()),
            Err(ApiError::Validation { errors }) if errors == vec!["a"]
        ));
        assert!(matches!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            Err(ApiError::Http { status: 500, body }) if body == "boom"
        ));
    }

    #[test]
    fn test_not_found_into_result() {
        let outcome = Outcome::NotFound(Response {
            status: 404,
            body: "gone".into(),
        });
        assert!(matches!(outcome.into_result(), Err(ApiError::NotFound { body }) if body == "gone"));
    }

    #[test]
    fn test_format_api_error() {
        assert_eq!(
            format_api_error(StatusCode::FORBIDDEN, r#"{"errors": ["Not allowed"]}"#),
            "Not allowed"
        );
        assert_eq!(
            format_api_error(StatusCode::UNAUTHORIZED, ""),
            "401 Unauthorized"
        );
        assert_eq!(
            format_api_error(StatusCode::UNAUTHORIZED, "nope"),
            "401 Unauthorized: nope"
        );
        assert_eq!(
            format_api_error(StatusCode::FORBIDDEN, r#"{"message": "Forbidden"}"#),
            "403 Forbidden: {\"message\": \"Forbidden\"}"
        );
    }
}
