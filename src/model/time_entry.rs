//
//  redmine-client
//  model/time_entry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Time entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{id_string, CustomField, Issue, Project, Property, TimeEntryActivity, User};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// Time logged against a project or issue.
///
/// Either `project` or `issue` must be set when creating an entry.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::{Issue, TimeEntry, TimeEntryActivity};
///
/// let mut entry = TimeEntry::default();
/// entry.issue.set(Issue::with_id(42));
/// entry.activity.set(TimeEntryActivity::with_id(9));
/// entry.hours.set(1.5);
///
/// assert_eq!(entry.comments(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeEntry {
    /// Entry id.
    pub id: Option<i64>,
    /// Project the time was spent on.
    pub project: Property<Project>,
    /// Issue the time was spent on.
    pub issue: Property<Issue>,
    /// User who spent the time; defaults to the caller on create.
    pub user: Property<User>,
    /// Activity.
    pub activity: Property<TimeEntryActivity>,
    /// Hours spent.
    pub hours: Property<f64>,
    /// Comment.
    pub comments: Property<String>,
    /// Day the time was spent.
    pub spent_on: Property<NaiveDate>,
    /// Custom field values.
    pub custom_fields: Vec<CustomField>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_on: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// The comment, or an empty string.
    pub fn comments(&self) -> &str {
        self.comments.get().map_or("", String::as_str)
    }
}

fn encode(entry: &TimeEntry) -> Value {
    ObjectWriter::new()
        .reference("project_id", &entry.project, |project| project.id)
        .reference("issue_id", &entry.issue, |issue| issue.id)
        .reference("user_id", &entry.user, |user| user.id)
        .reference("activity_id", &entry.activity, |activity| activity.id)
        .property("hours", &entry.hours)
        .property("comments", &entry.comments)
        .property("spent_on", &entry.spent_on)
        .non_empty(
            "custom_fields",
            entry.custom_fields.iter().map(ToWire::to_wire).collect(),
        )
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<TimeEntry> {
    let fields = Fields::new(value, "time_entry")?;
    Ok(TimeEntry {
        id: fields.get("id")?,
        project: fields.nested("project", registry)?,
        issue: fields.nested("issue", registry)?,
        user: fields.nested("user", registry)?,
        activity: fields.nested("activity", registry)?,
        hours: fields.property("hours")?,
        comments: fields.property("comments")?,
        spent_on: fields.property("spent_on")?,
        custom_fields: fields.nested_list("custom_fields", registry)?,
        created_on: fields.get("created_on")?,
        updated_on: fields.get("updated_on")?,
    })
}

pub(super) fn codec() -> EntityConfig<TimeEntry> {
    EntityConfig::new(
        "time_entry",
        "time_entries",
        |entry: &TimeEntry| id_string(entry.id),
        encode,
        decode,
    )
}
