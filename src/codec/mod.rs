//
//  redmine-client
//  codec/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Entity Codec Registry
//!
//! Every entity type the client exchanges with the server is described by an
//! [`EntityConfig`]: its singular and plural wire names, the URL segment of
//! its collection, how to read its id, and a pair of encode/decode functions.
//!
//! The [`EntityRegistry`] maps types to their configs. It is built once and
//! never mutated afterwards; transports hold it behind an `Arc`, so one
//! registry can be shared by any number of transports and tests can inject
//! their own.
//!
//! ## Wire Envelopes
//!
//! ```text
//! single:  { "issue": { ... } }
//! list:    { "issues": [ ... ], "total_count": 80, "limit": 25, "offset": 0 }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use redmine_client::codec::EntityRegistry;
//! use redmine_client::model::Tracker;
//!
//! let registry = EntityRegistry::standard();
//! let tracker: Tracker = registry
//!     .decode_envelope(r#"{"tracker": {"id": 1, "name": "Bug"}}"#)
//!     .unwrap();
//!
//! assert_eq!(tracker.name, "Bug");
//! ```
//!
//! ## Submodules
//!
//! - [`date`]: Multi-format date parsing and canonical formatting
//! - [`fields`]: Field-level read/write helpers used by entity codecs
//! - [`xml`]: Structured builder for the legacy XML request format

pub mod date;
pub mod fields;
pub mod xml;

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::api::common::{ApiError, Result};
use xml::XmlElement;

/// Writes an entity as a wire object.
pub type Encoder<T> = fn(&T) -> Value;

/// Reads an entity from a wire object, decoding nested entities through
/// the registry.
pub type Decoder<T> = fn(&Value, &EntityRegistry) -> Result<T>;

static STANDARD: Lazy<Arc<EntityRegistry>> = Lazy::new(|| {
    let mut registry = EntityRegistry::new();
    crate::model::register_all(&mut registry);
    Arc::new(registry)
});

/// Everything the transport needs to know about one entity type.
pub struct EntityConfig<T> {
    /// Envelope key of a single entity (`issue`).
    pub singular: &'static str,
    /// Envelope key of a list (`issues`).
    pub plural: &'static str,
    /// Path of the collection below the base URL. Usually equal to
    /// `plural`; differs for enumerations (`enumerations/issue_priorities`).
    pub url_segment: &'static str,
    /// Reads the id used to address an existing entity.
    pub id: fn(&T) -> Option<String>,
    /// Encodes the entity.
    pub encode: Encoder<T>,
    /// Decodes the entity.
    pub decode: Decoder<T>,
}

impl<T> EntityConfig<T> {
    /// Creates a config whose URL segment equals its plural name.
    pub const fn new(
        singular: &'static str,
        plural: &'static str,
        id: fn(&T) -> Option<String>,
        encode: Encoder<T>,
        decode: Decoder<T>,
    ) -> Self {
        Self {
            singular,
            plural,
            url_segment: plural,
            id,
            encode,
            decode,
        }
    }

    /// Overrides the URL segment.
    pub const fn with_url_segment(mut self, url_segment: &'static str) -> Self {
        self.url_segment = url_segment;
        self
    }
}

impl<T> fmt::Debug for EntityConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfig")
            .field("singular", &self.singular)
            .field("plural", &self.plural)
            .field("url_segment", &self.url_segment)
            .finish_non_exhaustive()
    }
}

/// Type-keyed table of entity codecs.
#[derive(Default)]
pub struct EntityRegistry {
    configs: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry with every built-in entity.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Registers the codec for `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered; each type is registered once.
    pub fn register<T: 'static>(&mut self, config: EntityConfig<T>) -> &mut Self {
        let previous = self.configs.insert(TypeId::of::<T>(), Box::new(config));
        assert!(
            previous.is_none(),
            "codec for {} registered twice",
            type_name::<T>()
        );
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T: 'static>(mut self, config: EntityConfig<T>) -> Self {
        self.register(config);
        self
    }

    /// Returns `true` if `T` has a codec.
    pub fn contains<T: 'static>(&self) -> bool {
        self.configs.contains_key(&TypeId::of::<T>())
    }

    /// The config for `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered. Using an unregistered type is a
    /// programming error, not a runtime condition.
    pub fn config<T: 'static>(&self) -> &EntityConfig<T> {
        self.configs
            .get(&TypeId::of::<T>())
            .and_then(|config| config.downcast_ref::<EntityConfig<T>>())
            .unwrap_or_else(|| panic!("no codec registered for {}", type_name::<T>()))
    }

    /// Encodes an entity as a bare wire object.
    pub fn encode<T: 'static>(&self, entity: &T) -> Value {
        (self.config::<T>().encode)(entity)
    }

    /// Encodes an entity inside its single-object envelope.
    pub fn encode_envelope<T: 'static>(&self, entity: &T) -> Value {
        let config = self.config::<T>();
        let mut envelope = Map::new();
        envelope.insert(config.singular.to_string(), (config.encode)(entity));
        Value::Object(envelope)
    }

    /// Encodes an entity as a legacy XML document.
    pub fn encode_xml<T: 'static>(&self, entity: &T) -> XmlElement {
        let config = self.config::<T>();
        XmlElement::from_json(config.singular, &(config.encode)(entity))
    }

    /// Decodes an entity from a bare wire object.
    pub fn decode<T: 'static>(&self, value: &Value) -> Result<T> {
        (self.config::<T>().decode)(value, self)
    }

    /// Decodes an entity from a single-object envelope body.
    ///
    /// # Errors
    ///
    /// Returns a format error if the body is not JSON or lacks the
    /// envelope key.
    pub fn decode_envelope<T: 'static>(&self, body: &str) -> Result<T> {
        let config = self.config::<T>();
        let value: Value = serde_json::from_str(body)?;
        let inner = value.get(config.singular).ok_or_else(|| {
            ApiError::Format(format!("expected a '{}' envelope", config.singular))
        })?;
        self.decode(inner)
    }

    /// Decodes the entity array of a list envelope.
    ///
    /// # Errors
    ///
    /// Returns a format error if the envelope lacks the plural key or it is
    /// not an array.
    pub fn decode_list<T: 'static>(&self, envelope: &Value) -> Result<Vec<T>> {
        let config = self.config::<T>();
        match envelope.get(config.plural) {
            Some(Value::Array(items)) => items.iter().map(|item| self.decode(item)).collect(),
            Some(other) => Err(ApiError::Format(format!(
                "'{}' should be an array, found {other}",
                config.plural
            ))),
            None => Err(ApiError::Format(format!(
                "expected a '{}' list envelope",
                config.plural
            ))),
        }
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.configs.len())
            .finish()
    }
}
