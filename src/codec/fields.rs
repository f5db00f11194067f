//
//  redmine-client
//  codec/fields.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Field-level JSON helpers shared by every entity codec.
//!
//! - [`Fields`] reads attributes out of a wire object, tolerating absent keys
//!   and reporting type mismatches as [`ApiError::Format`].
//! - [`ObjectWriter`] builds a wire object from [`Property`] fields, writing
//!   only what was touched.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::date;
use super::EntityRegistry;
use crate::api::common::{ApiError, Result};
use crate::model::Property;

/// Scalar types that can be read from a wire value.
pub trait FromWire: Sized {
    /// Converts a non-null wire value.
    fn from_wire(value: &Value) -> std::result::Result<Self, String>;
}

/// Scalar types that can be written as a wire value.
pub trait ToWire {
    /// Converts into a wire value.
    fn to_wire(&self) -> Value;
}

impl FromWire for String {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            // Some servers send numeric custom values and ids unquoted.
            Value::Number(n) => Ok(n.to_string()),
            other => Err(format!("expected a string, found {other}")),
        }
    }
}

impl FromWire for i64 {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| format!("expected an integer, found {n}")),
            Value::String(s) => s
                .parse()
                .map_err(|_| format!("expected an integer, found \"{s}\"")),
            other => Err(format!("expected an integer, found {other}")),
        }
    }
}

impl FromWire for f64 {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| format!("expected a number, found {n}")),
            Value::String(s) => s
                .parse()
                .map_err(|_| format!("expected a number, found \"{s}\"")),
            other => Err(format!("expected a number, found {other}")),
        }
    }
}

impl FromWire for bool {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s == "true" || s == "1" => Ok(true),
            Value::String(s) if s == "false" || s == "0" => Ok(false),
            Value::Number(n) => Ok(n.as_i64() != Some(0)),
            other => Err(format!("expected a boolean, found {other}")),
        }
    }
}

impl FromWire for NaiveDate {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        let text = value.as_str().ok_or_else(|| format!("expected a date, found {value}"))?;
        date::parse_date(text).map_err(|e| e.to_string())
    }
}

impl FromWire for DateTime<Utc> {
    fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        let text = value
            .as_str()
            .ok_or_else(|| format!("expected a timestamp, found {value}"))?;
        date::parse_datetime(text).map_err(|e| e.to_string())
    }
}

impl ToWire for String {
    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToWire for i64 {
    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl ToWire for f64 {
    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl ToWire for bool {
    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToWire for NaiveDate {
    fn to_wire(&self) -> Value {
        Value::String(date::format_date(self))
    }
}

impl ToWire for DateTime<Utc> {
    fn to_wire(&self) -> Value {
        Value::String(date::format_datetime(self))
    }
}

impl<T: ToWire> ToWire for Vec<T> {
    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(ToWire::to_wire).collect())
    }
}

/// Read access to the attributes of one wire object.
///
/// # Example
///
/// ```rust
/// use redmine_client::codec::fields::Fields;
/// use serde_json::json;
///
/// let value = json!({"id": 3, "name": "Bug"});
/// let fields = Fields::new(&value, "tracker").unwrap();
///
/// assert_eq!(fields.get::<i64>("id").unwrap(), Some(3));
/// assert_eq!(fields.get::<String>("missing").unwrap(), None);
/// ```
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    entity: &'static str,
}

impl<'a> Fields<'a> {
    /// Wraps `value`, which must be a JSON object.
    pub fn new(value: &'a Value, entity: &'static str) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ApiError::Format(format!("{entity}: expected an object, found {value}")))?;
        Ok(Self { object, entity })
    }

    /// The raw value under `key`, if present.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    /// Reads an optional scalar; absent and `null` both yield `None`.
    pub fn get<T: FromWire>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.property(key)?.into_option())
    }

    /// Reads a scalar, substituting `T::default()` when absent.
    pub fn get_or_default<T: FromWire + Default>(&self, key: &str) -> Result<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Reads a tri-state field: absent → `Unset`, `null` → `Null`.
    pub fn property<T: FromWire>(&self, key: &str) -> Result<Property<T>> {
        match self.object.get(key) {
            None => Ok(Property::Unset),
            Some(Value::Null) => Ok(Property::Null),
            Some(value) => T::from_wire(value)
                .map(Property::Set)
                .map_err(|e| self.mismatch(key, &e)),
        }
    }

    /// Decodes a nested entity through the registry.
    pub fn nested<T: 'static>(&self, key: &str, registry: &EntityRegistry) -> Result<Property<T>> {
        match self.object.get(key) {
            None => Ok(Property::Unset),
            Some(Value::Null) => Ok(Property::Null),
            Some(value) => registry.decode(value).map(Property::Set),
        }
    }

    /// Decodes a nested array of entities; absent yields an empty vector.
    pub fn nested_list<T: 'static>(&self, key: &str, registry: &EntityRegistry) -> Result<Vec<T>> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(|item| registry.decode(item)).collect(),
            Some(other) => Err(self.mismatch(key, &format!("expected an array, found {other}"))),
        }
    }

    /// Reads an array of scalars; absent yields an empty vector.
    pub fn list<T: FromWire>(&self, key: &str) -> Result<Vec<T>> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| T::from_wire(item).map_err(|e| self.mismatch(key, &e)))
                .collect(),
            Some(other) => Err(self.mismatch(key, &format!("expected an array, found {other}"))),
        }
    }

    fn mismatch(&self, key: &str, detail: &str) -> ApiError {
        ApiError::Format(format!("{}.{key}: {detail}", self.entity))
    }
}

/// Builds a wire object, omitting untouched fields.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    map: Map<String, Value>,
}

impl ObjectWriter {
    /// Starts an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a tri-state field: `Unset` is skipped, `Null` becomes `null`.
    pub fn property<T: ToWire>(&mut self, key: &str, property: &Property<T>) -> &mut Self {
        match property {
            Property::Unset => {}
            Property::Null => {
                self.map.insert(key.to_string(), Value::Null);
            }
            Property::Set(value) => {
                self.map.insert(key.to_string(), value.to_wire());
            }
        }
        self
    }

    /// Writes the id of an associated entity under `key`
    /// (`assigned_to_id`, `project_id`, ...).
    ///
    /// A set association without an id is skipped; there is nothing the
    /// server could link it to.
    pub fn reference<T>(
        &mut self,
        key: &str,
        property: &Property<T>,
        id_of: impl Fn(&T) -> Option<i64>,
    ) -> &mut Self {
        match property {
            Property::Unset => {}
            Property::Null => {
                self.map.insert(key.to_string(), Value::Null);
            }
            Property::Set(entity) => {
                if let Some(id) = id_of(entity) {
                    self.map.insert(key.to_string(), Value::from(id));
                }
            }
        }
        self
    }

    /// Writes a plain value unconditionally.
    pub fn value(&mut self, key: &str, value: Value) -> &mut Self {
        self.map.insert(key.to_string(), value);
        self
    }

    /// Writes a non-empty array; empty arrays are skipped.
    pub fn non_empty(&mut self, key: &str, items: Vec<Value>) -> &mut Self {
        if !items.is_empty() {
            self.map.insert(key.to_string(), Value::Array(items));
        }
        self
    }

    /// Finishes the object.
    pub fn finish(&mut self) -> Value {
        Value::Object(std::mem::take(&mut self.map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_states_from_wire() {
        let value = json!({"a": "x", "b": null});
        let fields = Fields::new(&value, "test").unwrap();
        assert_eq!(fields.property::<String>("a").unwrap(), Property::Set("x".into()));
        assert_eq!(fields.property::<String>("b").unwrap(), Property::Null);
        assert_eq!(fields.property::<String>("c").unwrap(), Property::Unset);
        assert_eq!(fields.get_or_default::<String>("c").unwrap(), "");
    }

    #[test]
    fn test_type_mismatch_is_a_format_error() {
        let value = json!({"id": {"nested": true}});
        let fields = Fields::new(&value, "issue").unwrap();
        let err = fields.get::<i64>("id").unwrap_err();
        assert!(matches!(&err, ApiError::Format(msg) if msg.starts_with("issue.id")));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let value = json!([1, 2]);
        assert!(Fields::new(&value, "issue").is_err());
    }

    #[test]
    fn test_lenient_scalars() {
        let value = json!({"n": "42", "b": "1", "s": 7, "f": "1.5"});
        let fields = Fields::new(&value, "test").unwrap();
        assert_eq!(fields.get::<i64>("n").unwrap(), Some(42));
        assert_eq!(fields.get::<bool>("b").unwrap(), Some(true));
        assert_eq!(fields.get::<String>("s").unwrap(), Some("7".into()));
        assert_eq!(fields.get::<f64>("f").unwrap(), Some(1.5));
    }

    #[test]
    fn test_writer_omits_unset_and_writes_null() {
        let mut writer = ObjectWriter::new();
        writer
            .property("subject", &Property::Set("Hello".to_string()))
            .property::<String>("description", &Property::Unset)
            .property::<i64>("done_ratio", &Property::Null)
            .reference("assigned_to_id", &Property::<i64>::Null, |id| Some(*id))
            .reference("project_id", &Property::Set(5_i64), |id| Some(*id))
            .non_empty("watcher_user_ids", Vec::new());

        assert_eq!(
            writer.finish(),
            json!({
                "subject": "Hello",
                "done_ratio": null,
                "assigned_to_id": null,
                "project_id": 5
            })
        );
    }
}
