//
//  redmine-client
//  model/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project versions and issue categories.
//!
//! Both are created and listed under their project
//! (`/projects/{id}/versions.json`, `/projects/{id}/issue_categories.json`)
//! but read, updated and deleted at the top level (`/versions/{id}.json`).

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{id_string, CustomField, Project, Property, User};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// Version status values.
pub mod version_status {
    /// Open for new issues.
    pub const OPEN: &str = "open";
    /// No new issues can be assigned.
    pub const LOCKED: &str = "locked";
    /// Done.
    pub const CLOSED: &str = "closed";
}

/// A project version (milestone).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Version {
    /// Version id.
    pub id: Option<i64>,
    /// Owning project.
    pub project: Option<Project>,
    /// Name.
    pub name: Property<String>,
    /// Description.
    pub description: Property<String>,
    /// Status, see [`version_status`].
    pub status: Property<String>,
    /// Due date.
    pub due_date: Property<NaiveDate>,
    /// Sharing mode (`none`, `descendants`, `hierarchy`, `tree`, `system`).
    pub sharing: Property<String>,
    /// Wiki page title.
    pub wiki_page_title: Property<String>,
    /// Custom field values.
    pub custom_fields: Vec<CustomField>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_on: Option<DateTime<Utc>>,
}

impl Version {
    /// A reference to an existing version.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// The description, or an empty string.
    pub fn description(&self) -> &str {
        self.description.get().map_or("", String::as_str)
    }
}

/// An issue category within a project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueCategory {
    /// Category id.
    pub id: Option<i64>,
    /// Owning project.
    pub project: Option<Project>,
    /// Name.
    pub name: Property<String>,
    /// Default assignee for new issues in this category.
    pub assigned_to: Property<User>,
}

impl IssueCategory {
    /// A reference to an existing category.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

fn encode(version: &Version) -> Value {
    ObjectWriter::new()
        .property("name", &version.name)
        .property("description", &version.description)
        .property("status", &version.status)
        .property("due_date", &version.due_date)
        .property("sharing", &version.sharing)
        .property("wiki_page_title", &version.wiki_page_title)
        .non_empty(
            "custom_fields",
            version.custom_fields.iter().map(ToWire::to_wire).collect(),
        )
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<Version> {
    let fields = Fields::new(value, "version")?;
    Ok(Version {
        id: fields.get("id")?,
        project: fields.nested("project", registry)?.into_option(),
        name: fields.property("name")?,
        description: fields.property("description")?,
        status: fields.property("status")?,
        due_date: fields.property("due_date")?,
        sharing: fields.property("sharing")?,
        wiki_page_title: fields.property("wiki_page_title")?,
        custom_fields: fields.nested_list("custom_fields", registry)?,
        created_on: fields.get("created_on")?,
        updated_on: fields.get("updated_on")?,
    })
}

fn encode_category(category: &IssueCategory) -> Value {
    ObjectWriter::new()
        .property("name", &category.name)
        .reference("assigned_to_id", &category.assigned_to, |user| user.id)
        .finish()
}

fn decode_category(value: &Value, registry: &EntityRegistry) -> Result<IssueCategory> {
    let fields = Fields::new(value, "issue_category")?;
    Ok(IssueCategory {
        id: fields.get("id")?,
        project: fields.nested("project", registry)?.into_option(),
        name: fields.property("name")?,
        assigned_to: fields.nested("assigned_to", registry)?,
    })
}

pub(super) fn codec() -> EntityConfig<Version> {
    EntityConfig::new(
        "version",
        "versions",
        |version: &Version| id_string(version.id),
        encode,
        decode,
    )
}

pub(super) fn category_codec() -> EntityConfig<IssueCategory> {
    EntityConfig::new(
        "issue_category",
        "issue_categories",
        |category: &IssueCategory| id_string(category.id),
        encode_category,
        decode_category,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_version_with_short_date() {
        let registry = EntityRegistry::standard();
        let version: Version = registry
            .decode(&json!({
                "id": 1,
                "project": {"id": 1, "name": "Redmine"},
                "name": "0.7",
                "status": "closed",
                "due_date": "2008/04/28",
                "sharing": "none"
            }))
            .unwrap();
        assert_eq!(version.due_date.get().map(ToString::to_string).as_deref(), Some("2008-04-28"));
        assert_eq!(version.status.get().map(String::as_str), Some(version_status::CLOSED));
        assert_eq!(version.project.and_then(|p| p.id), Some(1));
    }

    #[test]
    fn test_category_clears_assignee() {
        let mut category = IssueCategory::with_id(4);
        category.assigned_to.clear();
        assert_eq!(encode_category(&category), json!({"assigned_to_id": null}));

        category.assigned_to.set(User::with_id(7));
        assert_eq!(encode_category(&category), json!({"assigned_to_id": 7}));
    }
}
