//
//  redmine-client
//  auth/basic.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Basic Authentication
//!
//! Login/password authentication through the `Authorization` header.
//!
//! The `login:password` pair is turned into bytes with an explicitly chosen
//! [`Charset`] before Base64 encoding. Relying on whatever the platform
//! default happens to be corrupts non-ASCII logins and passwords.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::RequestBuilder;
use reqwest::header::{HeaderValue, AUTHORIZATION};

use super::Authenticator;
use crate::api::common::{ApiError, Result};

/// Text encoding used for Basic credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8, what current servers expect.
    #[default]
    Utf8,
    /// ISO-8859-1, for servers that decode credentials as Latin-1.
    Latin1,
}

impl Charset {
    /// Encodes `text`, failing on characters the charset cannot represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        ApiError::Configuration(format!(
                            "character '{c}' cannot be encoded as ISO-8859-1"
                        ))
                    })
                })
                .collect(),
        }
    }
}

/// HTTP Basic authentication.
///
/// The header value is computed once at construction.
///
/// # Example
///
/// ```rust
/// use redmine_client::auth::BasicAuth;
///
/// let auth = BasicAuth::new("Aladdin", "open sesame").unwrap();
/// assert_eq!(auth.header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    login: String,
    header: HeaderValue,
}

impl BasicAuth {
    /// Creates a Basic strategy with UTF-8 encoded credentials.
    pub fn new(login: &str, password: &str) -> Result<Self> {
        Self::with_charset(login, password, Charset::Utf8)
    }

    /// Creates a Basic strategy with the given charset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the login is empty or a
    /// character cannot be represented in `charset`.
    pub fn with_charset(login: &str, password: &str, charset: Charset) -> Result<Self> {
        if login.is_empty() {
            return Err(ApiError::Configuration("login must not be empty".into()));
        }

        let raw = charset.encode(&format!("{login}:{password}"))?;
        let mut header = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw)))
            .map_err(|e| ApiError::Configuration(format!("invalid credentials header: {e}")))?;
        header.set_sensitive(true);

        Ok(Self {
            login: login.to_string(),
            header,
        })
    }

    /// The login these credentials belong to.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// The full `Authorization` header value.
    pub fn header_value(&self) -> &str {
        // Built from "Basic " + base64, always visible ASCII.
        self.header.to_str().unwrap_or_default()
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Authenticator for BasicAuth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.header.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_header() {
        // "jürgen:pässword" in UTF-8
        let auth = BasicAuth::new("jürgen", "pässword").unwrap();
        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, "jürgen:pässword".as_bytes());
    }

    #[test]
    fn test_latin1_header() {
        let auth = BasicAuth::with_charset("jürgen", "x", Charset::Latin1).unwrap();
        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, vec![b'j', 0xFC, b'r', b'g', b'e', b'n', b':', b'x']);
    }

    #[test]
    fn test_latin1_rejects_unmappable_characters() {
        let err = BasicAuth::with_charset("user", "пароль", Charset::Latin1).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_empty_login_is_rejected() {
        assert!(BasicAuth::new("", "pw").is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let auth = BasicAuth::new("jsmith", "hunter2").unwrap();
        let debug = format!("{auth:?}");
        assert!(debug.contains("jsmith"));
        assert!(!debug.contains("hunter2"));
    }
}
