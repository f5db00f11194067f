//
//  redmine-client
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Builder
//!
//! Turns an entity URL segment, an optional identifier and a set of query
//! parameters into a fully qualified request URL.
//!
//! ## URL Shape
//!
//! ```text
//! <base>/<segment>[/<id>].json?<params>&<auth params>
//! ```
//!
//! - `<base>` is the configured host, including any path prefix
//!   (e.g. `https://tracker.example.com/redmine`)
//! - `<auth params>` come from the active [`Authenticator`]; only key-based
//!   strategies contribute anything here, Basic credentials travel in a header
//!
//! ## Example
//!
//! ```rust
//! use redmine_client::api::{EndpointBuilder, RequestParam};
//! use redmine_client::auth::ApiKeyAuth;
//!
//! let endpoints = EndpointBuilder::new("https://tracker.example.com").unwrap();
//! let url = endpoints.uri(
//!     "issues",
//!     Some("42"),
//!     &[RequestParam::new("include", "journals")],
//!     &ApiKeyAuth::new("secret"),
//! );
//!
//! assert_eq!(
//!     url.as_str(),
//!     "https://tracker.example.com/issues/42.json?include=journals&key=secret"
//! );
//! ```

use std::fmt;

use url::Url;

use crate::api::common::{ApiError, Result};
use crate::auth::Authenticator;

/// Suffix selecting the JSON representation of every resource.
pub const FORMAT_SUFFIX: &str = ".json";

/// An immutable query parameter.
///
/// Equality and hashing use both the name and the value, so two parameters
/// with the same name but different values are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestParam {
    name: String,
    value: String,
}

impl RequestParam {
    /// Creates a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Builds the `include` parameter from a set of optional sub-resources.
    ///
    /// ```rust
    /// use redmine_client::api::{Include, RequestParam};
    ///
    /// let param = RequestParam::include(&[Include::Journals, Include::Watchers]);
    /// assert_eq!(param.value(), "journals,watchers");
    /// ```
    pub fn include(includes: &[Include]) -> Self {
        let value = includes
            .iter()
            .map(|include| include.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self::new("include", value)
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RequestParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Optional sub-resources the server embeds when asked through `include`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include {
    /// Issue history entries.
    Journals,
    /// Issue relations.
    Relations,
    /// File attachments.
    Attachments,
    /// Repository changesets linked to an issue.
    Changesets,
    /// Users watching an issue.
    Watchers,
    /// Child issues.
    Children,
    /// Statuses the current user may move an issue to.
    AllowedStatuses,
}

impl Include {
    /// Wire name of the sub-resource.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Journals => "journals",
            Self::Relations => "relations",
            Self::Attachments => "attachments",
            Self::Changesets => "changesets",
            Self::Watchers => "watchers",
            Self::Children => "children",
            Self::AllowedStatuses => "allowed_statuses",
        }
    }
}

/// Builds request URLs against one server.
///
/// The base URL is validated once at construction so that a bad host fails
/// fast instead of on the first request.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    base: Url,
}

impl EndpointBuilder {
    /// Creates a builder for the given host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the host is empty, is not a
    /// well-formed URL, or does not use `http`/`https`.
    pub fn new(host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ApiError::Configuration("host must not be empty".into()));
        }

        let mut base = Url::parse(host)
            .map_err(|e| ApiError::Configuration(format!("'{host}' is not a valid URL: {e}")))?;

        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ApiError::Configuration(format!(
                "'{host}' must be an absolute http or https URL"
            )));
        }

        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    /// The validated base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of an entity collection, or of one entity when `id` is given.
    pub fn uri(
        &self,
        segment: &str,
        id: Option<&str>,
        params: &[RequestParam],
        auth: &dyn Authenticator,
    ) -> Url {
        match id {
            Some(id) => self.path_uri(&format!("{segment}/{id}"), params, auth),
            None => self.path_uri(segment, params, auth),
        }
    }

    /// URL of a collection nested under a parent entity,
    /// e.g. `/projects/1/versions.json`.
    pub fn child_uri(
        &self,
        parent_segment: &str,
        parent_id: &str,
        child_segment: &str,
        params: &[RequestParam],
        auth: &dyn Authenticator,
    ) -> Url {
        self.path_uri(
            &format!("{parent_segment}/{parent_id}/{child_segment}"),
            params,
            auth,
        )
    }

    /// URL of the binary upload endpoint.
    pub fn upload_uri(&self, auth: &dyn Authenticator) -> Url {
        self.path_uri("uploads", &[], auth)
    }

    /// URL of a fixed resource path such as `users/current`.
    pub fn path_uri(&self, path: &str, params: &[RequestParam], auth: &dyn Authenticator) -> Url {
        let mut url = self.base.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{path}{FORMAT_SUFFIX}"));

        let mut all = params.to_vec();
        all.extend(auth.query_params());
        append_query(&mut url, &all);
        url
    }

    /// Adds the authenticator's query parameters to an absolute URL handed
    /// out by the server (attachment `content_url` values, for instance).
    ///
    /// Credentials are only attached to URLs on the configured server: same
    /// scheme, host and port as the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Format`] if `url` is not a valid absolute URL, and
    /// [`ApiError::Configuration`] if it points at another origin.
    pub fn authorize_url(&self, url: &str, auth: &dyn Authenticator) -> Result<Url> {
        let mut parsed = Url::parse(url)
            .map_err(|e| ApiError::Format(format!("invalid URL '{url}' from server: {e}")))?;

        if parsed.origin() != self.base.origin() {
            return Err(ApiError::Configuration(format!(
                "refusing to send credentials to {}; the server is {}",
                parsed.origin().ascii_serialization(),
                self.base.origin().ascii_serialization()
            )));
        }

        let existing: Vec<RequestParam> = parsed
            .query_pairs()
            .map(|(name, value)| RequestParam::new(name, value))
            .collect();
        let extra: Vec<RequestParam> = auth
            .query_params()
            .into_iter()
            .filter(|param| !existing.contains(param))
            .collect();
        append_query(&mut parsed, &extra);
        Ok(parsed)
    }
}

/// Appends parameters, skipping exact `(name, value)` duplicates.
fn append_query(url: &mut Url, params: &[RequestParam]) {
    let mut unique: Vec<&RequestParam> = Vec::with_capacity(params.len());
    for param in params {
        if !unique.contains(&param) {
            unique.push(param);
        }
    }

    if unique.is_empty() {
        return;
    }

    let mut pairs = url.query_pairs_mut();
    for param in unique {
        pairs.append_pair(&param.name, &param.value);
    }
}
