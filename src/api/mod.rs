//
//  redmine-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Layer
//!
//! This module talks HTTP to a Redmine-compatible server and exposes typed
//! CRUD operations over the entities in [`crate::model`].
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`endpoint`]: URL construction, resource naming and query parameters
//! - [`client`]: One blocking HTTP round trip plus status mapping
//! - [`transport`]: Typed operations, pagination and credential switching
//! - [`common`]: Shared types (errors, pagination dialects, results wrapper)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use redmine_client::api::{RequestParam, Transport};
//! use redmine_client::auth::CredentialSet;
//! use redmine_client::model::Issue;
//!
//! let transport = Transport::new(
//!     "https://redmine.example.com",
//!     CredentialSet::api_key("0123456789abcdef"),
//! )?;
//!
//! let open: Vec<Issue> = transport.list(&[RequestParam::new("status_id", "open")])?;
//! println!("{} open issues", open.len());
//! # Ok::<(), redmine_client::api::ApiError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result`], whose error is [`ApiError`]:
//!
//! - `Authentication`: 401 Unauthorized
//! - `Authorization`: 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `Validation`: 422 Unprocessable Entity, with the server's messages
//! - `Http`: any other non-success status
//! - `Communication`: the request never produced a response

/// Blocking HTTP round trips and status classification.
pub mod client;

/// Shared error and pagination types.
pub mod common;

/// URL construction for resources and their children.
pub mod endpoint;

/// Typed operations against the server.
pub mod transport;

pub use client::{Communicator, Outcome, Response};
pub use common::{ApiError, PaginationDialect, Result, ResultsWrapper};
pub use endpoint::{EndpointBuilder, Include, RequestParam};
pub use transport::{RequestFormat, Transport, TransportBuilder};
