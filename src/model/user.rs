//
//  redmine-client
//  model/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User accounts.
//!
//! The same type is used for full user records (`/users/1.json`) and for the
//! `{ "id": 1, "name": "John Smith" }` references embedded in other
//! entities (authors, assignees, watchers).

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{id_string, CustomField, Property};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// Account status codes.
pub mod status {
    /// Active account.
    pub const ACTIVE: i64 = 1;
    /// Registered, awaiting activation.
    pub const REGISTERED: i64 = 2;
    /// Locked account.
    pub const LOCKED: i64 = 3;
}

/// A user account.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::User;
///
/// let mut user = User::default();
/// user.login.set("jsmith".to_string());
/// user.firstname.set("John".to_string());
/// user.lastname.set("Smith".to_string());
///
/// assert_eq!(user.display_name(), "John Smith");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct User {
    /// User id; `None` until created.
    pub id: Option<i64>,
    /// Login name.
    pub login: Property<String>,
    /// Given name.
    pub firstname: Property<String>,
    /// Family name.
    pub lastname: Property<String>,
    /// Email address.
    pub mail: Property<String>,
    /// Password; write-only, never returned by the server.
    pub password: Property<String>,
    /// Administrator flag.
    pub admin: Property<bool>,
    /// Account status, see [`status`].
    pub status: Property<i64>,
    /// Authentication source id (LDAP and similar).
    pub auth_source_id: Property<i64>,
    /// Display name, present on embedded references.
    pub name: Option<String>,
    /// API key; only returned for the current user or to administrators.
    pub api_key: Option<String>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
    /// Last login timestamp.
    pub last_login_on: Option<DateTime<Utc>>,
    /// Custom field values.
    pub custom_fields: Vec<CustomField>,
}

impl User {
    /// A reference to an existing user, for assignee and watcher payloads.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// The embedded display name, or first and last name joined.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        [self.firstname.get(), self.lastname.get()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn encode(user: &User) -> Value {
    ObjectWriter::new()
        .property("login", &user.login)
        .property("firstname", &user.firstname)
        .property("lastname", &user.lastname)
        .property("mail", &user.mail)
        .property("password", &user.password)
        .property("admin", &user.admin)
        .property("status", &user.status)
        .property("auth_source_id", &user.auth_source_id)
        .non_empty(
            "custom_fields",
            user.custom_fields.iter().map(ToWire::to_wire).collect(),
        )
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<User> {
    let fields = Fields::new(value, "user")?;
    Ok(User {
        id: fields.get("id")?,
        login: fields.property("login")?,
        firstname: fields.property("firstname")?,
        lastname: fields.property("lastname")?,
        mail: fields.property("mail")?,
        password: Property::Unset,
        admin: fields.property("admin")?,
        status: fields.property("status")?,
        auth_source_id: fields.property("auth_source_id")?,
        name: fields.get("name")?,
        api_key: fields.get("api_key")?,
        created_on: fields.get("created_on")?,
        last_login_on: fields.get("last_login_on")?,
        custom_fields: fields.nested_list("custom_fields", registry)?,
    })
}

pub(super) fn codec() -> EntityConfig<User> {
    EntityConfig::new("user", "users", |user: &User| id_string(user.id), encode, decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_embedded_reference() {
        let registry = EntityRegistry::standard();
        let user: User = registry.decode(&json!({"id": 3, "name": "Jane Doe"})).unwrap();
        assert_eq!(user.id, Some(3));
        assert_eq!(user.display_name(), "Jane Doe");
        assert!(!user.login.is_touched());
    }

    #[test]
    fn test_decode_full_record() {
        let registry = EntityRegistry::standard();
        let user: User = registry
            .decode_envelope(
                r#"{"user": {
                    "id": 1, "login": "admin", "firstname": "Redmine", "lastname": "Admin",
                    "mail": "admin@example.net", "admin": true, "status": 1,
                    "created_on": "2006/07/19 19:12:21 +0200",
                    "last_login_on": "2024-01-02T03:04:05Z",
                    "api_key": "abc"
                }}"#,
            )
            .unwrap();
        assert_eq!(user.display_name(), "Redmine Admin");
        assert_eq!(user.admin, Property::Set(true));
        assert_eq!(user.status.get(), Some(&status::ACTIVE));
        assert_eq!(
            user.created_on.map(|ts| ts.to_rfc3339()),
            Some("2006-07-19T17:12:21+00:00".to_string())
        );
        assert_eq!(user.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_password_is_write_only() {
        let mut user = User::default();
        user.login.set("new".into());
        user.password.set("secret".into());
        let encoded = encode(&user);
        assert_eq!(encoded, json!({"login": "new", "password": "secret"}));
    }
}
