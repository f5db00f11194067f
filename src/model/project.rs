//
//  redmine-client
//  model/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects.
//!
//! # Overview
//!
//! A project is addressed either by its numeric id or by its `identifier`
//! (`/projects/redmine.json`); both work wherever an id string is accepted.
//! Versions and issue categories live under a project and are listed with
//! [`Transport::list_children`](crate::api::Transport::list_children).
//!
//! # Example
//!
//! ```rust
//! use redmine_client::model::{Project, Tracker};
//!
//! let mut project = Project::default();
//! project.name.set("Example".to_string());
//! project.identifier.set("example".to_string());
//! project.trackers = vec![Tracker::with_id(1), Tracker::with_id(2)];
//!
//! assert_eq!(project.description(), "");
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{id_string, CustomField, Property, Tracker};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// A project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    /// Project id.
    pub id: Option<i64>,
    /// Display name.
    pub name: Property<String>,
    /// URL identifier; fixed after creation.
    pub identifier: Property<String>,
    /// Description.
    pub description: Property<String>,
    /// Homepage URL.
    pub homepage: Property<String>,
    /// Whether the project is visible to everyone.
    pub is_public: Property<bool>,
    /// Whether members are inherited from the parent.
    pub inherit_members: Property<bool>,
    /// Parent project.
    pub parent: Property<Box<Project>>,
    /// Status code (1 active, 5 closed, 9 archived).
    pub status: Option<i64>,
    /// Enabled trackers; written back as `tracker_ids`.
    pub trackers: Vec<Tracker>,
    /// Custom field values.
    pub custom_fields: Vec<CustomField>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_on: Option<DateTime<Utc>>,
}

impl Project {
    /// A reference to an existing project.
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

fn encode(project: &Project) -> Value {
    let tracker_ids: Vec<Value> = project
        .trackers
        .iter()
        .filter_map(|tracker| tracker.id)
        .map(Value::from)
        .collect();

    ObjectWriter::new()
        .property("name", &project.name)
        .property("identifier", &project.identifier)
        .property("description", &project.description)
        .property("homepage", &project.homepage)
        .property("is_public", &project.is_public)
        .property("inherit_members", &project.inherit_members)
        .reference("parent_id", &project.parent, |parent| parent.id)
        .non_empty("tracker_ids", tracker_ids)
        .non_empty(
            "custom_fields",
            project.custom_fields.iter().map(ToWire::to_wire).collect(),
        )
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<Project> {
    let fields = Fields::new(value, "project")?;
    Ok(Project {
        id: fields.get("id")?,
        name: fields.property("name")?,
        identifier: fields.property("identifier")?,
        description: fields.property("description")?,
        homepage: fields.property("homepage")?,
        is_public: fields.property("is_public")?,
        inherit_members: fields.property("inherit_members")?,
        parent: fields.nested("parent", registry)?.into_boxed(),
        status: fields.get("status")?,
        trackers: fields.nested_list("trackers", registry)?,
        custom_fields: fields.nested_list("custom_fields", registry)?,
        created_on: fields.get("created_on")?,
        updated_on: fields.get("updated_on")?,
    })
}

pub(super) fn codec() -> EntityConfig<Project> {
    EntityConfig::new(
        "project",
        "projects",
        |project: &Project| id_string(project.id),
        encode,
        decode,
    )
}
