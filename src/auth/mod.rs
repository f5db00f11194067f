//
//  redmine-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module decides how outgoing requests carry credentials.
//!
//! ## Supported Authentication Methods
//!
//! - **API key**: The key travels as the `key` query parameter on every
//!   request. No header is added.
//! - **Basic Authentication**: Login and password travel in an
//!   `Authorization: Basic` header, encoded with an explicitly chosen charset.
//! - **Anonymous**: Nothing is added; only public resources are reachable.
//!
//! Other strategies (OAuth bearer tokens, signed requests, ...) plug in by
//! implementing [`Authenticator`]; the transport never inspects which
//! strategy is active.
//!
//! ## Example
//!
//! ```rust
//! use redmine_client::auth::CredentialSet;
//!
//! let credentials = CredentialSet::api_key("0123456789abcdef");
//! let authenticator = credentials.into_authenticator().unwrap();
//!
//! assert_eq!(authenticator.query_params().len(), 1);
//! ```

mod basic;

pub use basic::*;

use std::fmt;
use std::sync::Arc;

use reqwest::blocking::RequestBuilder;

use crate::api::common::{ApiError, Result};
use crate::api::RequestParam;

/// Name of the query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "key";

/// A strategy for attaching credentials to requests.
///
/// Implementations contribute query parameters (picked up by the endpoint
/// builder) and/or modify the request itself (headers).
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Query parameters to append to every request URL.
    fn query_params(&self) -> Vec<RequestParam> {
        Vec::new()
    }

    /// Adds credentials to an outgoing request.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// No credentials at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Authenticator for Anonymous {}

/// API key authentication.
///
/// The key is never sent as a header; the endpoint builder appends it as
/// `key=<value>` to each URL.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key: String,
}

impl ApiKeyAuth {
    /// Creates an API key strategy.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth").field("key", &"<redacted>").finish()
    }
}

impl Authenticator for ApiKeyAuth {
    fn query_params(&self) -> Vec<RequestParam> {
        vec![RequestParam::new(API_KEY_PARAM, &self.key)]
    }
}

/// The credentials a transport is configured with.
///
/// Exactly one strategy is active at a time.
///
/// # Example
///
/// ```rust
/// use redmine_client::auth::CredentialSet;
///
/// let creds = CredentialSet::password("jsmith", "s3cret");
/// assert!(format!("{:?}", creds).contains("jsmith"));
/// assert!(!format!("{:?}", creds).contains("s3cret"));
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub enum CredentialSet {
    /// No credentials.
    #[default]
    Anonymous,
    /// An API key taken from the user's account page.
    ApiKey(String),
    /// A login and password, sent with HTTP Basic authentication.
    Password {
        /// The account login.
        login: String,
        /// The account password.
        password: String,
    },
}

impl CredentialSet {
    /// Shorthand for [`CredentialSet::ApiKey`].
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Shorthand for [`CredentialSet::Password`].
    pub fn password(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Builds the matching [`Authenticator`].
    ///
    /// Basic credentials are encoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for an empty API key or an empty
    /// login.
    pub fn into_authenticator(self) -> Result<Arc<dyn Authenticator>> {
        match self {
            Self::Anonymous => Ok(Arc::new(Anonymous)),
            Self::ApiKey(key) => {
                if key.trim().is_empty() {
                    return Err(ApiError::Configuration("API key must not be empty".into()));
                }
                Ok(Arc::new(ApiKeyAuth::new(key)))
            }
            Self::Password { login, password } => {
                Ok(Arc::new(BasicAuth::new(&login, &password)?))
            }
        }
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::Password { login, .. } => f
                .debug_struct("Password")
                .field("login", login)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_contributes_key_param() {
        let params = ApiKeyAuth::new("abc").query_params();
        assert_eq!(params, vec![RequestParam::new("key", "abc")]);
    }

    #[test]
    fn test_anonymous_contributes_nothing() {
        assert!(Anonymous.query_params().is_empty());
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let err = CredentialSet::api_key("  ").into_authenticator().unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_password_credentials_have_no_query_params() {
        let auth = CredentialSet::password("jsmith", "pw")
            .into_authenticator()
            .unwrap();
        assert!(auth.query_params().is_empty());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let key = format!("{:?}", CredentialSet::api_key("topsecret"));
        assert!(!key.contains("topsecret"));
        let auth = format!("{:?}", ApiKeyAuth::new("topsecret"));
        assert!(!auth.contains("topsecret"));
    }
}
