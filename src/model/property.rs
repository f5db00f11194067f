//
//  redmine-client
//  model/property.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tri-state entity fields.
//!
//! Updates are partial: the server only touches the attributes present in
//! the payload. A field therefore has three states, not two:
//!
//! | State | Encoded as | Server effect |
//! |-------|-----------|---------------|
//! | [`Property::Unset`] | omitted | leaves the value alone |
//! | [`Property::Null`] | `null` | clears the value |
//! | [`Property::Set`] | the value | replaces the value |

/// A field that may be untouched, explicitly cleared, or set.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::Property;
///
/// let mut subject: Property<String> = Property::Unset;
/// assert!(!subject.is_touched());
///
/// subject = "Fix login".to_string().into();
/// assert_eq!(subject.get().map(String::as_str), Some("Fix login"));
///
/// subject.clear();
/// assert!(subject.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Property<T> {
    /// Never assigned; omitted from encoded payloads.
    #[default]
    Unset,
    /// Explicitly cleared; encoded as `null`.
    Null,
    /// Assigned a value.
    Set(T),
}

impl<T> Property<T> {
    /// Assigns a value.
    pub fn set(&mut self, value: T) {
        *self = Self::Set(value);
    }

    /// Marks the field as explicitly cleared.
    pub fn clear(&mut self) {
        *self = Self::Null;
    }

    /// The value, if one is set.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// `true` unless the field is [`Property::Unset`].
    pub fn is_touched(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// `true` for [`Property::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts into an `Option`, folding `Unset` and `Null` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// `None` maps to `Unset`, the state of a field the server did not send.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }

    /// Maps the contained value, preserving `Unset`/`Null`.
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Property<U> {
        match self {
            Self::Unset => Property::Unset,
            Self::Null => Property::Null,
            Self::Set(value) => Property::Set(f(value)),
        }
    }

    /// Boxes the contained value, for recursive associations.
    pub fn into_boxed(self) -> Property<Box<T>> {
        match self {
            Self::Unset => Property::Unset,
            Self::Null => Property::Null,
            Self::Set(value) => Property::Set(Box::new(value)),
        }
    }
}

impl<T> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl From<&str> for Property<String> {
    fn from(value: &str) -> Self {
        Self::Set(value.to_string())
    }
}
