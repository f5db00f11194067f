//
//  redmine-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads transport settings from a TOML file and the environment.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/redmine-client/config.toml`
//! - **macOS**: `~/Library/Application Support/redmine-client/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\redmine-client\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! host = "https://redmine.example.com"
//! pagination = "offset"
//! objects_per_page = 100
//! request_format = "json"
//!
//! [credentials]
//! api_key = "0123456789abcdef"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `REDMINE_URL` | `host` |
//! | `REDMINE_API_KEY` | `credentials.api_key` |
//! | `REDMINE_LOGIN` | `credentials.login` |
//! | `REDMINE_PASSWORD` | `credentials.password` |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use redmine_client::api::Transport;
//! use redmine_client::config::TransportConfig;
//!
//! let mut config = TransportConfig::load()?;
//! config.apply_env();
//! let transport = Transport::from_config(&config)?;
//! # Ok::<(), redmine_client::api::ApiError>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O

mod file;

pub use file::*;

use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::{ApiError, PaginationDialect, Result, DEFAULT_OBJECTS_PER_PAGE};
use crate::api::RequestFormat;
use crate::auth::CredentialSet;

/// Environment variable overriding [`TransportConfig::host`].
pub const ENV_URL: &str = "REDMINE_URL";
/// Environment variable overriding [`CredentialsConfig::api_key`].
pub const ENV_API_KEY: &str = "REDMINE_API_KEY";
/// Environment variable overriding [`CredentialsConfig::login`].
pub const ENV_LOGIN: &str = "REDMINE_LOGIN";
/// Environment variable overriding [`CredentialsConfig::password`].
pub const ENV_PASSWORD: &str = "REDMINE_PASSWORD";

/// Settings needed to build a [`Transport`](crate::api::Transport).
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `host` | empty; must be set |
/// | `credentials` | anonymous |
/// | `pagination` | `"offset"` |
/// | `objects_per_page` | `25` |
/// | `request_format` | `"json"` |
/// | `user_agent` | `redmine-client/<version>` |
///
/// # Example
///
/// ```rust
/// use redmine_client::api::PaginationDialect;
/// use redmine_client::config::TransportConfig;
///
/// let config: TransportConfig = toml::from_str(r#"
///     host = "https://redmine.example.com"
///     pagination = "page"
/// "#).unwrap();
///
/// assert_eq!(config.pagination, PaginationDialect::PageNumber);
/// assert_eq!(config.objects_per_page, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Server URL, optionally with a path prefix.
    pub host: String,

    /// Credentials; at most one of API key and login may be given.
    pub credentials: CredentialsConfig,

    /// Paging dialect of the server.
    pub pagination: PaginationDialect,

    /// Objects requested per page.
    pub objects_per_page: usize,

    /// Encoding of request bodies.
    pub request_format: RequestFormat,

    /// `User-Agent` override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            credentials: CredentialsConfig::default(),
            pagination: PaginationDialect::default(),
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
            request_format: RequestFormat::default(),
            user_agent: None,
        }
    }
}

/// Credential settings as written in the configuration file.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Login for Basic authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// Password for Basic authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CredentialsConfig {
    /// Resolves the settings into one credential strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if both an API key and a login are
    /// given, or a password is given without a login or the other way round.
    pub fn to_credentials(&self) -> Result<CredentialSet> {
        match (&self.api_key, &self.login, &self.password) {
            (Some(_), Some(_), _) => Err(ApiError::Configuration(
                "specify either an API key or a login, not both".into(),
            )),
            (Some(key), None, _) => Ok(CredentialSet::api_key(key.clone())),
            (None, Some(login), Some(password)) => {
                Ok(CredentialSet::password(login.clone(), password.clone()))
            }
            (None, Some(login), None) => Err(ApiError::Configuration(format!(
                "login '{login}' has no password"
            ))),
            (None, None, Some(_)) => Err(ApiError::Configuration(
                "password given without a login".into(),
            )),
            (None, None, None) => Ok(CredentialSet::Anonymous),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("CredentialsConfig")
            .field("api_key", &redact(&self.api_key))
            .field("login", &self.login)
            .field("password", &redact(&self.password))
            .finish()
    }
}

impl TransportConfig {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the file exists but cannot be
    /// read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if config_exists(&path) {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the file cannot be read or
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        toml::from_str(&content).map_err(|e| {
            ApiError::Configuration(format!("invalid configuration in {}: {e}", path.display()))
        })
    }

    /// Writes the configuration to `path`.
    ///
    /// Credentials are written in clear text; restrict the file's
    /// permissions accordingly.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ApiError::Configuration(format!("cannot serialise configuration: {e}")))?;
        write_config_file(path, &content)
    }

    /// Writes the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// The default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if no home directory is known.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "redmine-client").ok_or_else(|| {
            ApiError::Configuration("could not determine the configuration directory".into())
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overrides settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overrides settings from `lookup`, which maps variable names to
    /// values.
    ///
    /// An API key from the environment replaces a configured login and the
    /// other way round, so the environment always wins.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(host) = lookup(ENV_URL) {
            self.host = host;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.credentials = CredentialsConfig {
                api_key: Some(key),
                ..CredentialsConfig::default()
            };
        }
        if let Some(login) = lookup(ENV_LOGIN) {
            self.credentials.api_key = None;
            self.credentials.login = Some(login);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.credentials.password = Some(password);
        }
    }
}
