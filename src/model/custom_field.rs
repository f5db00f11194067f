//
//  redmine-client
//  model/custom_field.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Custom field values and definitions.
//!
//! # Value Shapes
//!
//! The `multiple` flag decides how `value` is read:
//!
//! ```text
//! {"id": 1, "name": "Browser", "value": "Firefox"}
//! {"id": 2, "name": "Platforms", "multiple": true, "value": ["Linux", "macOS"]}
//! ```
//!
//! The same type decodes the definitions returned by `/custom_fields.json`,
//! which carry `field_format` and `customized_type` but no value.

use serde_json::Value;

use super::id_string;
use crate::api::common::Result;
use crate::codec::fields::{Fields, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// The value of a custom field.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomFieldValue {
    /// Value of a single-valued field; `None` when empty.
    Single(Option<String>),
    /// Values of a multi-valued field, in server order.
    Multiple(Vec<String>),
}

impl Default for CustomFieldValue {
    fn default() -> Self {
        Self::Single(None)
    }
}

/// A custom field attached to an entity.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::{CustomField, CustomFieldValue};
///
/// let field = CustomField::single(4, "Firefox");
/// assert_eq!(field.value, CustomFieldValue::Single(Some("Firefox".into())));
/// assert_eq!(field.values(), vec!["Firefox"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomField {
    /// Field definition id.
    pub id: Option<i64>,
    /// Field name.
    pub name: String,
    /// Whether the field holds several values.
    pub multiple: bool,
    /// Current value.
    pub value: CustomFieldValue,
    /// Value format on definitions (`string`, `list`, `date`, ...).
    pub field_format: Option<String>,
    /// Entity kind a definition applies to (`issue`, `project`, ...).
    pub customized_type: Option<String>,
}

impl CustomField {
    /// A single-valued field assignment.
    pub fn single(id: i64, value: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            value: CustomFieldValue::Single(Some(value.into())),
            ..Self::default()
        }
    }

    /// A multi-valued field assignment.
    pub fn multiple(id: i64, values: Vec<String>) -> Self {
        Self {
            id: Some(id),
            multiple: true,
            value: CustomFieldValue::Multiple(values),
            ..Self::default()
        }
    }

    /// All values as a list; empty when unset.
    pub fn values(&self) -> Vec<&str> {
        match &self.value {
            CustomFieldValue::Single(value) => value.iter().map(String::as_str).collect(),
            CustomFieldValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl ToWire for CustomField {
    fn to_wire(&self) -> Value {
        let value = match &self.value {
            CustomFieldValue::Single(Some(value)) => Value::String(value.clone()),
            CustomFieldValue::Single(None) => Value::Null,
            CustomFieldValue::Multiple(values) => values.to_wire(),
        };
        serde_json::json!({"id": self.id, "value": value})
    }
}

fn decode(value: &Value, _: &EntityRegistry) -> Result<CustomField> {
    let fields = Fields::new(value, "custom_field")?;
    let multiple = fields.get_or_default("multiple")?;
    let value = if multiple {
        CustomFieldValue::Multiple(fields.list("value")?)
    } else {
        CustomFieldValue::Single(fields.get("value")?)
    };

    Ok(CustomField {
        id: fields.get("id")?,
        name: fields.get_or_default("name")?,
        multiple,
        value,
        field_format: fields.get("field_format")?,
        customized_type: fields.get("customized_type")?,
    })
}

pub(super) fn codec() -> EntityConfig<CustomField> {
    EntityConfig::new(
        "custom_field",
        "custom_fields",
        |field: &CustomField| id_string(field.id),
        CustomField::to_wire,
        decode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiple_flag_selects_list() {
        let registry = EntityRegistry::standard();
        let field: CustomField = registry
            .decode(&json!({"id": 2, "name": "Platforms", "multiple": true, "value": ["Linux", "macOS"]}))
            .unwrap();
        assert_eq!(
            field.value,
            CustomFieldValue::Multiple(vec!["Linux".into(), "macOS".into()])
        );

        let field: CustomField = registry
            .decode(&json!({"id": 1, "name": "Browser", "value": ""}))
            .unwrap();
        assert_eq!(field.value, CustomFieldValue::Single(Some(String::new())));

        let field: CustomField = registry.decode(&json!({"id": 1, "name": "Browser"})).unwrap();
        assert_eq!(field.value, CustomFieldValue::Single(None));
        assert!(field.values().is_empty());
    }

    #[test]
    fn test_encoding() {
        assert_eq!(CustomField::single(1, "x").to_wire(), json!({"id": 1, "value": "x"}));
        assert_eq!(
            CustomField::multiple(2, vec!["a".into(), "b".into()]).to_wire(),
            json!({"id": 2, "value": ["a", "b"]})
        );
        let cleared = CustomField {
            id: Some(3),
            ..CustomField::default()
        };
        assert_eq!(cleared.to_wire(), json!({"id": 3, "value": null}));
    }
}
