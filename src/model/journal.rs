//
//  redmine-client
//  model/journal.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue history.
//!
//! Journals are returned with an issue when `include=journals` is
//! requested. Each journal records one edit: an optional note plus the
//! attribute changes made at the same time.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{id_string, Property, User};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter};
use crate::codec::{EntityConfig, EntityRegistry};

/// One edit of an issue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Journal {
    /// Journal id.
    pub id: Option<i64>,
    /// Author of the edit.
    pub user: Option<User>,
    /// Note text.
    pub notes: Property<String>,
    /// Whether the note is private.
    pub private_notes: bool,
    /// When the edit was made.
    pub created_on: Option<DateTime<Utc>>,
    /// Attribute changes.
    pub details: Vec<JournalDetail>,
}

impl Journal {
    /// The note text, or an empty string.
    pub fn notes(&self) -> &str {
        self.notes.get().map_or("", String::as_str)
    }
}

/// One attribute change within a [`Journal`].
///
/// `property` is `attr` for issue attributes, `cf` for custom fields
/// (`name` is then the field id) and `attachment` for files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalDetail {
    /// Kind of attribute changed.
    pub property: String,
    /// Attribute name.
    pub name: String,
    /// Previous value.
    pub old_value: Option<String>,
    /// New value.
    pub new_value: Option<String>,
}

fn encode(journal: &Journal) -> Value {
    ObjectWriter::new()
        .property("notes", &journal.notes)
        .value("private_notes", Value::Bool(journal.private_notes))
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<Journal> {
    let fields = Fields::new(value, "journal")?;
    Ok(Journal {
        id: fields.get("id")?,
        user: fields.nested("user", registry)?.into_option(),
        notes: fields.property("notes")?,
        private_notes: fields.get_or_default("private_notes")?,
        created_on: fields.get("created_on")?,
        details: fields.nested_list("details", registry)?,
    })
}

fn encode_detail(detail: &JournalDetail) -> Value {
    serde_json::json!({
        "property": detail.property,
        "name": detail.name,
        "old_value": detail.old_value,
        "new_value": detail.new_value,
    })
}

fn decode_detail(value: &Value, _: &EntityRegistry) -> Result<JournalDetail> {
    let fields = Fields::new(value, "detail")?;
    Ok(JournalDetail {
        property: fields.get_or_default("property")?,
        name: fields.get_or_default("name")?,
        old_value: fields.get("old_value")?,
        new_value: fields.get("new_value")?,
    })
}

pub(super) fn codec() -> EntityConfig<Journal> {
    EntityConfig::new(
        "journal",
        "journals",
        |journal: &Journal| id_string(journal.id),
        encode,
        decode,
    )
}

pub(super) fn detail_codec() -> EntityConfig<JournalDetail> {
    EntityConfig::new("detail", "details", |_: &JournalDetail| None, encode_detail, decode_detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_journal_with_details() {
        let registry = EntityRegistry::standard();
        let journal: Journal = registry
            .decode(&json!({
                "id": 1,
                "user": {"id": 1, "name": "Redmine Admin"},
                "notes": null,
                "created_on": "2012/08/01 10:00:00 +0000",
                "details": [
                    {"property": "attr", "name": "status_id", "old_value": "1", "new_value": "2"},
                    {"property": "cf", "name": "4", "new_value": "x"}
                ]
            }))
            .unwrap();

        assert_eq!(journal.notes, Property::Null);
        assert_eq!(journal.notes(), "");
        assert_eq!(journal.details.len(), 2);
        assert_eq!(journal.details[0].old_value.as_deref(), Some("1"));
        assert_eq!(journal.details[1].old_value, None);
        assert_eq!(journal.user.map(|u| u.id), Some(Some(1)));
    }
}
