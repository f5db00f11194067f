//
//  redmine-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transport
//!
//! The [`Transport`] is the public entry point of the crate. It turns generic
//! entity operations into HTTP round trips:
//!
//! ```text
//! Transport::get::<Issue>("42")
//!   → EndpointBuilder      https://host/issues/42.json?key=…
//!   → Authenticator        Authorization header, if any
//!   → Communicator         status → error taxonomy
//!   → EntityRegistry       {"issue": {...}} → Issue
//! ```
//!
//! Every operation works for any entity type registered in the transport's
//! [`EntityRegistry`]; nothing here is specific to one entity.
//!
//! ## Example
//!
//! ```rust,no_run
//! use redmine_client::api::Transport;
//! use redmine_client::auth::CredentialSet;
//! use redmine_client::model::{Issue, Project};
//!
//! let transport = Transport::new(
//!     "https://redmine.example.com",
//!     CredentialSet::api_key("0123456789abcdef"),
//! )?;
//!
//! let projects: Vec<Project> = transport.list(&[])?;
//!
//! let mut issue = Issue::default();
//! issue.project.set(Project::with_id(1));
//! issue.subject.set("Printer on fire".to_string());
//! let created = transport.create(&issue)?;
//! println!("created #{:?} in {} projects", created.id, projects.len());
//! # Ok::<(), redmine_client::api::ApiError>(())
//! ```
//!
//! ## Threading
//!
//! A `Transport` is `Send + Sync`. The credentials and the page size may be
//! changed through a shared reference while other threads use the
//! transport; each request sees either the old or the new value.

use std::fmt::{self, Display};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::blocking::{Body, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::client::{Communicator, Outcome};
use super::common::{
    paginate, ApiError, Page, PaginationDialect, Result, ResultsWrapper, DEFAULT_OBJECTS_PER_PAGE,
};
use super::endpoint::{EndpointBuilder, RequestParam};
use crate::auth::{Authenticator, CredentialSet};
use crate::codec::xml::XmlElement;
use crate::codec::EntityRegistry;
use crate::config::TransportConfig;
use crate::model::{Upload, User};

const JSON_CONTENT_TYPE: &str = "application/json";
const XML_CONTENT_TYPE: &str = "application/xml";
const OCTET_STREAM: &str = "application/octet-stream";

/// Encoding of request bodies.
///
/// Responses are always read as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFormat {
    /// `application/json` envelopes.
    #[default]
    Json,
    /// Legacy `application/xml` documents.
    Xml,
}

/// A serialised request body.
struct Payload {
    content_type: &'static str,
    body: String,
}

impl Payload {
    fn attach(self, request: RequestBuilder) -> RequestBuilder {
        request.header(CONTENT_TYPE, self.content_type).body(self.body)
    }
}

/// Configures and creates a [`Transport`].
///
/// # Example
///
/// ```rust
/// use redmine_client::api::{PaginationDialect, Transport};
/// use redmine_client::auth::CredentialSet;
///
/// let transport = Transport::builder("https://redmine.example.com/tracker")
///     .credentials(CredentialSet::password("jsmith", "s3cret"))
///     .dialect(PaginationDialect::PageNumber)
///     .objects_per_page(100)
///     .build()
///     .unwrap();
///
/// assert_eq!(transport.objects_per_page(), 100);
/// ```
#[must_use]
pub struct TransportBuilder {
    host: String,
    credentials: CredentialSet,
    authenticator: Option<Arc<dyn Authenticator>>,
    registry: Option<Arc<EntityRegistry>>,
    dialect: PaginationDialect,
    objects_per_page: usize,
    request_format: RequestFormat,
    user_agent: String,
}

impl TransportBuilder {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            credentials: CredentialSet::Anonymous,
            authenticator: None,
            registry: None,
            dialect: PaginationDialect::default(),
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
            request_format: RequestFormat::default(),
            user_agent: default_user_agent(),
        }
    }

    /// Credentials to authenticate with.
    pub fn credentials(mut self, credentials: CredentialSet) -> Self {
        self.credentials = credentials;
        self
    }

    /// A custom authentication strategy; takes precedence over
    /// [`credentials`](Self::credentials).
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// The codec registry; defaults to [`EntityRegistry::standard`].
    pub fn registry(mut self, registry: Arc<EntityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The server's paging dialect.
    pub fn dialect(mut self, dialect: PaginationDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Objects requested per page.
    pub fn objects_per_page(mut self, objects_per_page: usize) -> Self {
        self.objects_per_page = objects_per_page;
        self
    }

    /// Encoding of request bodies.
    pub fn request_format(mut self, request_format: RequestFormat) -> Self {
        self.request_format = request_format;
        self
    }

    /// The `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the settings and creates the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for an invalid host, invalid
    /// credentials or a zero page size.
    pub fn build(self) -> Result<Transport> {
        if self.objects_per_page == 0 {
            return Err(ApiError::Configuration(
                "objects per page must be at least 1".into(),
            ));
        }

        let endpoints = EndpointBuilder::new(&self.host)?;
        let authenticator = match self.authenticator {
            Some(authenticator) => authenticator,
            None => self.credentials.into_authenticator()?,
        };

        Ok(Transport {
            endpoints,
            communicator: Communicator::new(&self.user_agent)?,
            registry: self.registry.unwrap_or_else(EntityRegistry::standard),
            authenticator: RwLock::new(authenticator),
            objects_per_page: AtomicUsize::new(self.objects_per_page),
            dialect: self.dialect,
            request_format: self.request_format,
        })
    }
}

fn default_user_agent() -> String {
    format!("redmine-client/{}", crate::VERSION)
}

/// Generic entity operations against one server.
pub struct Transport {
    endpoints: EndpointBuilder,
    communicator: Communicator,
    registry: Arc<EntityRegistry>,
    authenticator: RwLock<Arc<dyn Authenticator>>,
    objects_per_page: AtomicUsize,
    dialect: PaginationDialect,
    request_format: RequestFormat,
}

impl Transport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for an invalid host or
    /// credentials.
    pub fn new(host: &str, credentials: CredentialSet) -> Result<Self> {
        Self::builder(host).credentials(credentials).build()
    }

    /// Starts configuring a transport for `host`.
    pub fn builder(host: &str) -> TransportBuilder {
        TransportBuilder::new(host)
    }

    /// Creates a transport from loaded configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_client::api::Transport;
    /// use redmine_client::config::TransportConfig;
    ///
    /// let mut config = TransportConfig::default();
    /// config.host = "https://redmine.example.com".to_string();
    /// config.credentials.api_key = Some("abc".to_string());
    ///
    /// let transport = Transport::from_config(&config).unwrap();
    /// assert_eq!(transport.base_url().as_str(), "https://redmine.example.com/");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for any invalid setting.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        let mut builder = Self::builder(&config.host)
            .credentials(config.credentials.to_credentials()?)
            .dialect(config.pagination)
            .objects_per_page(config.objects_per_page)
            .request_format(config.request_format);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    /// The validated server URL.
    pub fn base_url(&self) -> &Url {
        self.endpoints.base_url()
    }

    /// The codec registry in use.
    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// The paging dialect in use.
    pub fn dialect(&self) -> PaginationDialect {
        self.dialect
    }

    /// The request body encoding in use.
    pub fn request_format(&self) -> RequestFormat {
        self.request_format
    }

    /// Objects requested per page.
    pub fn objects_per_page(&self) -> usize {
        self.objects_per_page.load(Ordering::Relaxed)
    }

    /// Changes the page size for subsequent list calls.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for zero.
    pub fn set_objects_per_page(&self, objects_per_page: usize) -> Result<()> {
        if objects_per_page == 0 {
            return Err(ApiError::Configuration(
                "objects per page must be at least 1".into(),
            ));
        }
        self.objects_per_page.store(objects_per_page, Ordering::Relaxed);
        Ok(())
    }

    /// Switches to other credentials; the next request uses them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for invalid credentials, in which
    /// case the previous credentials stay active.
    pub fn set_credentials(&self, credentials: CredentialSet) -> Result<()> {
        self.set_authenticator(credentials.into_authenticator()?);
        Ok(())
    }

    /// Switches to another authentication strategy.
    pub fn set_authenticator(&self, authenticator: Arc<dyn Authenticator>) {
        let mut slot = self
            .authenticator
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = authenticator;
    }

    /// Fetches one entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the entity does not exist.
    pub fn get<T: 'static>(&self, id: impl Display, params: &[RequestParam]) -> Result<T> {
        let config = self.registry.config::<T>();
        let auth = self.current_authenticator();
        let url = self
            .endpoints
            .uri(config.url_segment, Some(&id.to_string()), params, auth.as_ref());

        let response = self.communicator.send(auth.apply(self.http_get(url)))?;
        self.registry.decode_envelope(&response.body)
    }

    /// Fetches one entity by id, reporting absence as `None`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_client::api::Transport;
    /// use redmine_client::auth::CredentialSet;
    /// use redmine_client::model::Issue;
    ///
    /// let transport = Transport::new("https://redmine.example.com", CredentialSet::Anonymous)?;
    /// match transport.find::<Issue>(42, &[])? {
    ///     Some(issue) => println!("{}", issue.subject()),
    ///     None => println!("no such issue"),
    /// }
    /// # Ok::<(), redmine_client::api::ApiError>(())
    /// ```
    pub fn find<T: 'static>(&self, id: impl Display, params: &[RequestParam]) -> Result<Option<T>> {
        let config = self.registry.config::<T>();
        let auth = self.current_authenticator();
        let url = self
            .endpoints
            .uri(config.url_segment, Some(&id.to_string()), params, auth.as_ref());

        match self.communicator.exchange(auth.apply(self.http_get(url)))? {
            Outcome::Success(response) => self.registry.decode_envelope(&response.body).map(Some),
            Outcome::NotFound(_) => Ok(None),
        }
    }

    /// Fetches every entity of a collection, following pages.
    ///
    /// Paging parameters in `params` are ignored; filters are passed through
    /// on every page request.
    pub fn list<T: 'static>(&self, params: &[RequestParam]) -> Result<Vec<T>> {
        let config = self.registry.config::<T>();
        let filters: Vec<RequestParam> = params
            .iter()
            .filter(|param| !self.dialect.is_paging_param(param.name()))
            .cloned()
            .collect();
        debug!(entity = config.plural, dialect = ?self.dialect, "listing");

        paginate(self.dialect, self.objects_per_page(), |paging| {
            let mut page_params = filters.clone();
            page_params.extend_from_slice(paging);
            let auth = self.current_authenticator();
            let url = self
                .endpoints
                .uri(config.url_segment, None, &page_params, auth.as_ref());
            self.fetch_page(auth.as_ref(), url)
        })
    }

    /// Fetches exactly one page, with paging parameters chosen by the caller.
    pub fn list_page<T: 'static>(&self, params: &[RequestParam]) -> Result<ResultsWrapper<T>> {
        let config = self.registry.config::<T>();
        let auth = self.current_authenticator();
        let url = self.endpoints.uri(config.url_segment, None, params, auth.as_ref());
        Ok(self.fetch_page(auth.as_ref(), url)?.items)
    }

    /// Fetches the collection of `C` nested under parent `P`, such as the
    /// versions of a project.
    ///
    /// Nested collections are not paginated by the server; one request is
    /// made.
    pub fn list_children<P: 'static, C: 'static>(
        &self,
        parent_id: impl Display,
        params: &[RequestParam],
    ) -> Result<Vec<C>> {
        let parent = self.registry.config::<P>();
        let child = self.registry.config::<C>();
        let auth = self.current_authenticator();
        let url = self.endpoints.child_uri(
            parent.url_segment,
            &parent_id.to_string(),
            child.url_segment,
            params,
            auth.as_ref(),
        );
        Ok(self.fetch_page(auth.as_ref(), url)?.items.results)
    }

    /// Creates an entity and returns the server's copy of it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the server's messages if the
    /// entity is rejected.
    pub fn create<T: 'static>(&self, entity: &T) -> Result<T> {
        let config = self.registry.config::<T>();
        let auth = self.current_authenticator();
        let url = self.endpoints.uri(config.url_segment, None, &[], auth.as_ref());
        debug!(entity = config.singular, "creating");

        let request = self.entity_payload(entity)?.attach(self.communicator.http().post(url));
        let response = self.communicator.send(auth.apply(request))?;
        self.registry.decode_envelope(&response.body)
    }

    /// Creates an entity nested under parent `P`, such as a version of a
    /// project or a relation of an issue.
    pub fn create_child<P: 'static, C: 'static>(
        &self,
        parent_id: impl Display,
        entity: &C,
    ) -> Result<C> {
        let parent = self.registry.config::<P>();
        let child = self.registry.config::<C>();
        let auth = self.current_authenticator();
        let url = self.endpoints.child_uri(
            parent.url_segment,
            &parent_id.to_string(),
            child.url_segment,
            &[],
            auth.as_ref(),
        );
        debug!(entity = child.singular, parent = parent.singular, "creating");

        let request = self.entity_payload(entity)?.attach(self.communicator.http().post(url));
        let response = self.communicator.send(auth.apply(request))?;
        self.registry.decode_envelope(&response.body)
    }

    /// Writes the touched fields of an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingIdentifier`] if the entity has no id.
    pub fn update<T: 'static>(&self, entity: &T) -> Result<()> {
        let config = self.registry.config::<T>();
        let id = (config.id)(entity).ok_or(ApiError::MissingIdentifier {
            entity: config.singular,
        })?;
        let auth = self.current_authenticator();
        let url = self
            .endpoints
            .uri(config.url_segment, Some(&id), &[], auth.as_ref());
        debug!(entity = config.singular, %id, "updating");

        let request = self.entity_payload(entity)?.attach(self.communicator.http().put(url));
        self.communicator.send(auth.apply(request))?;
        Ok(())
    }

    /// Deletes an entity by id.
    pub fn delete<T: 'static>(&self, id: impl Display) -> Result<()> {
        let config = self.registry.config::<T>();
        let auth = self.current_authenticator();
        let url = self
            .endpoints
            .uri(config.url_segment, Some(&id.to_string()), &[], auth.as_ref());
        debug!(entity = config.singular, "deleting");

        self.communicator
            .send(auth.apply(self.communicator.http().delete(url)))?;
        Ok(())
    }

    /// The account the transport is authenticated as.
    pub fn current_user(&self) -> Result<User> {
        let auth = self.current_authenticator();
        let url = self.endpoints.path_uri("users/current", &[], auth.as_ref());
        let response = self.communicator.send(auth.apply(self.http_get(url)))?;
        self.registry.decode_envelope(&response.body)
    }

    /// Adds a watcher to an issue.
    pub fn add_watcher(&self, issue_id: i64, user_id: i64) -> Result<()> {
        let auth = self.current_authenticator();
        let url = self
            .endpoints
            .path_uri(&format!("issues/{issue_id}/watchers"), &[], auth.as_ref());

        let payload = match self.request_format {
            RequestFormat::Json => Payload {
                content_type: JSON_CONTENT_TYPE,
                body: serde_json::json!({ "user_id": user_id }).to_string(),
            },
            RequestFormat::Xml => Payload {
                content_type: XML_CONTENT_TYPE,
                body: XmlElement::from_json("user_id", &Value::from(user_id)).to_document(),
            },
        };
        let request = payload.attach(self.communicator.http().post(url));
        self.communicator.send(auth.apply(request))?;
        Ok(())
    }

    /// Removes a watcher from an issue.
    pub fn remove_watcher(&self, issue_id: i64, user_id: i64) -> Result<()> {
        let auth = self.current_authenticator();
        let url = self.endpoints.path_uri(
            &format!("issues/{issue_id}/watchers/{user_id}"),
            &[],
            auth.as_ref(),
        );
        self.communicator
            .send(auth.apply(self.communicator.http().delete(url)))?;
        Ok(())
    }

    /// Uploads raw bytes and returns the token to reference them with.
    ///
    /// With a known `length` the body is sent with a `Content-Length`;
    /// otherwise it is streamed with chunked encoding.
    ///
    /// The token must then be referenced from an entity, typically through
    /// [`Issue::uploads`](crate::model::Issue::uploads), in a later create or
    /// update. If that second request fails the uploaded bytes stay on the
    /// server unreferenced; nothing here cleans them up.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::fs::File;
    ///
    /// use redmine_client::api::Transport;
    /// use redmine_client::auth::CredentialSet;
    /// use redmine_client::model::{Issue, Upload};
    ///
    /// let transport = Transport::new("https://redmine.example.com", CredentialSet::api_key("abc"))?;
    /// let file = File::open("crash.log").expect("readable file");
    /// let length = file.metadata().ok().map(|m| m.len());
    /// let token = transport.upload(file, length)?;
    ///
    /// let mut issue = Issue::with_id(42);
    /// issue.uploads.push(Upload::new(token, "crash.log").content_type("text/plain"));
    /// transport.update(&issue)?;
    /// # Ok::<(), redmine_client::api::ApiError>(())
    /// ```
    pub fn upload<R: Read + Send + 'static>(&self, reader: R, length: Option<u64>) -> Result<String> {
        let body = match length {
            Some(length) => Body::sized(reader, length),
            None => Body::new(reader),
        };
        self.upload_body(body)
    }

    /// Uploads an in-memory buffer; see [`upload`](Self::upload).
    pub fn upload_bytes(&self, bytes: Vec<u8>) -> Result<String> {
        self.upload_body(Body::from(bytes))
    }

    /// Streams attachment content from a server-provided URL into `sink`.
    ///
    /// The URL is usually an [`Attachment::content_url`](crate::model::Attachment::content_url);
    /// the active credentials are applied to it.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] without sending anything if the
    /// URL is not on the configured server.
    pub fn download(&self, content_url: &str, sink: &mut dyn Write) -> Result<u64> {
        let auth = self.current_authenticator();
        let url = self.endpoints.authorize_url(content_url, auth.as_ref())?;
        self.communicator.stream(auth.apply(self.http_get(url)), sink)
    }

    fn upload_body(&self, body: Body) -> Result<String> {
        let auth = self.current_authenticator();
        let url = self.endpoints.upload_uri(auth.as_ref());
        let request = self
            .communicator
            .http()
            .post(url)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(body);

        let response = self.communicator.send(auth.apply(request))?;
        let upload: Upload = self.registry.decode_envelope(&response.body)?;
        if upload.token.is_empty() {
            return Err(ApiError::Format(format!(
                "upload response without a token: {}",
                response.body
            )));
        }
        debug!("upload accepted");
        Ok(upload.token)
    }

    fn fetch_page<T: 'static>(&self, auth: &dyn Authenticator, url: Url) -> Result<Page<T>> {
        let response = self.communicator.send(auth.apply(self.http_get(url)))?;
        let envelope: Value = serde_json::from_str(&response.body)?;
        let items = ResultsWrapper::from_envelope(&envelope, |value| {
            self.registry.decode_list::<T>(value)
        })?;
        Ok(Page::new(response.body, items))
    }

    fn entity_payload<T: 'static>(&self, entity: &T) -> Result<Payload> {
        Ok(match self.request_format {
            RequestFormat::Json => Payload {
                content_type: JSON_CONTENT_TYPE,
                body: serde_json::to_string(&self.registry.encode_envelope(entity))?,
            },
            RequestFormat::Xml => Payload {
                content_type: XML_CONTENT_TYPE,
                body: self.registry.encode_xml(entity).to_document(),
            },
        })
    }

    fn http_get(&self, url: Url) -> RequestBuilder {
        self.communicator.http().get(url)
    }

    fn current_authenticator(&self) -> Arc<dyn Authenticator> {
        Arc::clone(
            &self
                .authenticator
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.endpoints.base_url().as_str())
            .field("authenticator", &self.current_authenticator())
            .field("dialect", &self.dialect)
            .field("objects_per_page", &self.objects_per_page())
            .field("request_format", &self.request_format)
            .finish()
    }
}
