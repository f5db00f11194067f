//
//  redmine-client
//  model/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issues.
//!
//! # Overview
//!
//! [`Issue`] is the richest entity of the API. Besides its own attributes it
//! embeds references to its project, tracker, status, priority, author,
//! assignee, category, target version and parent, and, when requested with
//! `include=...`, its journals, relations, attachments, watchers, children
//! and allowed statuses.
//!
//! # Partial Updates
//!
//! Only touched fields are written, so an update built from a fresh value
//! changes exactly what was set:
//!
//! ```rust
//! use redmine_client::codec::EntityRegistry;
//! use redmine_client::model::Issue;
//! use serde_json::json;
//!
//! let mut issue = Issue::with_id(42);
//! issue.subject.set("New subject".to_string());
//! issue.assigned_to.clear();
//!
//! let registry = EntityRegistry::standard();
//! assert_eq!(
//!     registry.encode(&issue),
//!     json!({"subject": "New subject", "assigned_to_id": null})
//! );
//! ```
//!
//! # Attaching Files
//!
//! Add an [`Upload`] per token to [`Issue::uploads`]; see
//! [`Transport::upload`](crate::api::Transport::upload).

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{
    id_string, Attachment, CustomField, IssueCategory, IssuePriority, IssueRelation, IssueStatus,
    Journal, Project, Property, Tracker, Upload, User, Version,
};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// An issue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Issue {
    /// Issue id.
    pub id: Option<i64>,
    /// Project; written as `project_id`.
    pub project: Property<Project>,
    /// Tracker; written as `tracker_id`.
    pub tracker: Property<Tracker>,
    /// Status; written as `status_id`.
    pub status: Property<IssueStatus>,
    /// Priority; written as `priority_id`.
    pub priority: Property<IssuePriority>,
    /// Category; written as `category_id`.
    pub category: Property<IssueCategory>,
    /// Target version; written as `fixed_version_id`.
    pub fixed_version: Property<Version>,
    /// Assignee; written as `assigned_to_id`.
    pub assigned_to: Property<User>,
    /// Parent issue; written as `parent_issue_id`.
    pub parent: Property<Box<Issue>>,
    /// Subject line.
    pub subject: Property<String>,
    /// Description.
    pub description: Property<String>,
    /// Start date.
    pub start_date: Property<NaiveDate>,
    /// Due date.
    pub due_date: Property<NaiveDate>,
    /// Percent done, 0 to 100.
    pub done_ratio: Property<i64>,
    /// Estimated hours.
    pub estimated_hours: Property<f64>,
    /// Private flag.
    pub is_private: Property<bool>,
    /// Note to add with an update; write-only.
    pub notes: Property<String>,
    /// Whether `notes` is private; write-only.
    pub private_notes: Property<bool>,
    /// Author.
    pub author: Option<User>,
    /// Hours logged on this issue.
    pub spent_hours: Option<f64>,
    /// Hours logged on this issue and its descendants.
    pub total_spent_hours: Option<f64>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_on: Option<DateTime<Utc>>,
    /// Closing timestamp.
    pub closed_on: Option<DateTime<Utc>>,
    /// Custom field values.
    pub custom_fields: Vec<CustomField>,
    /// History, with `include=journals`.
    pub journals: Vec<Journal>,
    /// Relations, with `include=relations`.
    pub relations: Vec<IssueRelation>,
    /// Attachments, with `include=attachments`.
    pub attachments: Vec<Attachment>,
    /// Watchers, with `include=watchers`.
    pub watchers: Vec<User>,
    /// Sub-issues, with `include=children`.
    pub children: Vec<Issue>,
    /// Statuses the caller may move the issue to, with
    /// `include=allowed_statuses`.
    pub allowed_statuses: Vec<IssueStatus>,
    /// Upload tokens to attach; write-only.
    pub uploads: Vec<Upload>,
    /// Users to add as watchers on create; write-only.
    pub watcher_user_ids: Vec<i64>,
}

impl Issue {
    /// A reference to an existing issue.
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

    /// The subject, or an empty string.
    pub fn subject(&self) -> &str {
        self.subject.get().map_or("", String::as_str)
    }

    /// The assignee, if any.
    pub fn assignee(&self) -> Option<&User> {
        self.assigned_to.get()
    }

    /// The custom field with the given id.
    pub fn custom_field(&self, id: i64) -> Option<&CustomField> {
        self.custom_fields.iter().find(|field| field.id == Some(id))
    }
}

fn encode(issue: &Issue) -> Value {
    ObjectWriter::new()
        .reference("project_id", &issue.project, |project| project.id)
        .reference("tracker_id", &issue.tracker, |tracker| tracker.id)
        .reference("status_id", &issue.status, |status| status.id)
        .reference("priority_id", &issue.priority, |priority| priority.id)
        .reference("category_id", &issue.category, |category| category.id)
        .reference("fixed_version_id", &issue.fixed_version, |version| version.id)
        .reference("assigned_to_id", &issue.assigned_to, |user| user.id)
        .reference("parent_issue_id", &issue.parent, |parent| parent.id)
        .property("subject", &issue.subject)
        .property("description", &issue.description)
        .property("start_date", &issue.start_date)
        .property("due_date", &issue.due_date)
        .property("done_ratio", &issue.done_ratio)
        .property("estimated_hours", &issue.estimated_hours)
        .property("is_private", &issue.is_private)
        .property("notes", &issue.notes)
        .property("private_notes", &issue.private_notes)
        .non_empty(
            "custom_fields",
            issue.custom_fields.iter().map(ToWire::to_wire).collect(),
        )
        .non_empty("uploads", issue.uploads.iter().map(ToWire::to_wire).collect())
        .non_empty(
            "watcher_user_ids",
            issue.watcher_user_ids.iter().map(ToWire::to_wire).collect(),
        )
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<Issue> {
    let fields = Fields::new(value, "issue")?;
    Ok(Issue {
        id: fields.get("id")?,
        project: fields.nested("project", registry)?,
        tracker: fields.nested("tracker", registry)?,
        status: fields.nested("status", registry)?,
        priority: fields.nested("priority", registry)?,
        category: fields.nested("category", registry)?,
        fixed_version: fields.nested("fixed_version", registry)?,
        assigned_to: fields.nested("assigned_to", registry)?,
        parent: fields.nested("parent", registry)?.into_boxed(),
        subject: fields.property("subject")?,
        description: fields.property("description")?,
        start_date: fields.property("start_date")?,
        due_date: fields.property("due_date")?,
        done_ratio: fields.property("done_ratio")?,
        estimated_hours: fields.property("estimated_hours")?,
        is_private: fields.property("is_private")?,
        notes: Property::Unset,
        private_notes: Property::Unset,
        author: fields.nested("author", registry)?.into_option(),
        spent_hours: fields.get("spent_hours")?,
        total_spent_hours: fields.get("total_spent_hours")?,
        created_on: fields.get("created_on")?,
        updated_on: fields.get("updated_on")?,
        closed_on: fields.get("closed_on")?,
        custom_fields: fields.nested_list("custom_fields", registry)?,
        journals: fields.nested_list("journals", registry)?,
        relations: fields.nested_list("relations", registry)?,
        attachments: fields.nested_list("attachments", registry)?,
        watchers: fields.nested_list("watchers", registry)?,
        children: fields.nested_list("children", registry)?,
        allowed_statuses: fields.nested_list("allowed_statuses", registry)?,
        uploads: Vec::new(),
        watcher_user_ids: Vec::new(),
    })
}

pub(super) fn codec() -> EntityConfig<Issue> {
    EntityConfig::new("issue", "issues", |issue: &Issue| id_string(issue.id), encode, decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomFieldValue;
    use serde_json::json;

    fn sample() -> &'static str {
        r#"{"issue": {
            "id": 4326,
            "project": {"id": 1, "name": "Redmine"},
            "tracker": {"id": 2, "name": "Feature"},
            "status": {"id": 1, "name": "New", "is_closed": false},
            "priority": {"id": 4, "name": "Normal"},
            "author": {"id": 10106, "name": "John Smith"},
            "assigned_to": null,
            "category": {"id": 9, "name": "Email notifications"},
            "fixed_version": {"id": 24, "name": "1.0"},
            "parent": {"id": 4000},
            "subject": "Aggregate Multiple Issue Changes for Email Notifications",
            "start_date": "2009/12/03",
            "due_date": null,
            "done_ratio": 0,
            "estimated_hours": null,
            "spent_hours": 0.0,
            "custom_fields": [
                {"id": 2, "name": "Resolution", "value": "Duplicate"},
                {"id": 3, "name": "Platforms", "multiple": true, "value": ["Linux"]}
            ],
            "created_on": "2009-12-03T15:02:12+01:00",
            "updated_on": "2010/01/03 12:08:41 +0100",
            "journals": [
                {"id": 1, "user": {"id": 1, "name": "A"}, "notes": "Fixed", "details": []}
            ],
            "children": [
                {"id": 4327, "tracker": {"id": 1, "name": "Bug"}, "subject": "Child"}
            ],
            "watchers": [{"id": 5, "name": "W"}]
        }}"#
    }

    #[test]
    fn test_decode_nested_graph() {
        let registry = EntityRegistry::standard();
        let issue: Issue = registry.decode_envelope(sample()).unwrap();

        assert_eq!(issue.id, Some(4326));
        assert_eq!(issue.project.get().and_then(|p| p.id), Some(1));
        assert_eq!(issue.tracker.get().map(|t| t.name.as_str()), Some("Feature"));
        assert_eq!(issue.author.as_ref().map(User::display_name).as_deref(), Some("John Smith"));
        assert_eq!(issue.parent.get().and_then(|p| p.id), Some(4000));
        assert_eq!(issue.fixed_version.get().and_then(|v| v.id), Some(24));
        assert_eq!(issue.journals[0].notes(), "Fixed");
        assert_eq!(issue.children[0].subject(), "Child");
        assert_eq!(issue.watchers.len(), 1);
        assert_eq!(
            issue.custom_field(3).map(|f| &f.value),
            Some(&CustomFieldValue::Multiple(vec!["Linux".into()]))
        );
        assert_eq!(
            issue.start_date.get().map(ToString::to_string).as_deref(),
            Some("2009-12-03")
        );
    }

    #[test]
    fn test_missing_and_null_fields_have_defaults() {
        let registry = EntityRegistry::standard();
        let issue: Issue = registry.decode_envelope(sample()).unwrap();

        assert!(issue.assigned_to.is_null());
        assert_eq!(issue.assignee(), None);
        assert!(!issue.description.is_touched());
        assert_eq!(issue.description(), "");
        assert!(issue.due_date.is_null());
        assert!(issue.relations.is_empty());
        assert!(issue.attachments.is_empty());
    }

    #[test]
    fn test_explicit_null_versus_unset() {
        let mut issue = Issue::default();
        issue.project.set(Project::with_id(1));
        issue.subject.set("Created".into());
        issue.description.clear();
        issue.estimated_hours.set(2.5);
        issue.watcher_user_ids = vec![3, 5];

        assert_eq!(
            encode(&issue),
            json!({
                "project_id": 1,
                "subject": "Created",
                "description": null,
                "estimated_hours": 2.5,
                "watcher_user_ids": [3, 5]
            })
        );
    }

    #[test]
    fn test_uploads_are_referenced_by_token() {
        let mut issue = Issue::with_id(1);
        issue.notes.set("See attached".into());
        issue.uploads.push(Upload::new("abc.123", "log.txt").content_type("text/plain"));

        assert_eq!(
            encode(&issue),
            json!({
                "notes": "See attached",
                "uploads": [{"token": "abc.123", "filename": "log.txt", "content_type": "text/plain"}]
            })
        );
    }

    #[test]
    fn test_dates_are_written_in_modern_form() {
        let registry = EntityRegistry::standard();
        let decoded: Issue = registry.decode_envelope(sample()).unwrap();
        let mut update = Issue::with_id(4326);
        update.start_date = decoded.start_date.clone();
        assert_eq!(encode(&update), json!({"start_date": "2009-12-03"}));
    }
}
