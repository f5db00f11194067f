//
//  redmine-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Redmine Client Library
//!
//! A blocking client for the REST API of Redmine and compatible issue
//! trackers.
//!
//! ## Overview
//!
//! The library maps server resources (projects, issues, users, time entries,
//! versions, attachments and the lookup enumerations) onto typed Rust values
//! and exposes create, read, update and delete operations over them.
//!
//! ## Features
//!
//! - **Typed entities**: Fields distinguish "never set" from "set to null",
//!   so updates only send what changed
//! - **Pagination**: Both the offset/limit and the page-number dialects are
//!   walked transparently
//! - **Authentication**: API keys (as a query parameter), HTTP Basic, or
//!   anonymous access; credentials can be switched on a live transport
//! - **Files**: Streaming uploads and downloads
//! - **Request formats**: JSON by default, XML on request
//!
//! ## Module Structure
//!
//! - [`api`]: Endpoints, HTTP round trips and the [`Transport`](api::Transport)
//! - [`auth`]: Credential strategies
//! - [`codec`]: Entity registry, date handling and wire encoding
//! - [`config`]: Configuration file and environment handling
//! - [`model`]: Entity types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use redmine_client::api::Transport;
//! use redmine_client::config::TransportConfig;
//! use redmine_client::model::Project;
//!
//! let mut config = TransportConfig::load()?;
//! config.apply_env();
//!
//! let transport = Transport::from_config(&config)?;
//! for project in transport.list::<Project>(&[])? {
//!     println!("{}", project.name.get().map(String::as_str).unwrap_or("?"));
//! }
//! # Ok::<(), redmine_client::api::ApiError>(())
//! ```

/// Endpoints, HTTP round trips and typed operations.
pub mod api;

/// Credential strategies.
pub mod auth;

/// Entity registry and wire encoding.
pub mod codec;

/// Configuration file and environment handling.
pub mod config;

/// Entity types.
pub mod model;

/// Library version.
///
/// Derived from Cargo.toml at compile time; used in the default
/// `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
