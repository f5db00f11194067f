//
//  redmine-client
//  model/lookup.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server-defined lookup values: trackers, statuses, priorities and
//! time entry activities.
//!
//! These are administered on the server and are read-only through the API.
//! Issues and time entries reference them by id.

use serde_json::{json, Value};

use super::id_string;
use crate::api::common::Result;
use crate::codec::fields::Fields;
use crate::codec::{EntityConfig, EntityRegistry};

/// An issue tracker (Bug, Feature, Support, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracker {
    /// Tracker id.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
}

impl Tracker {
    /// A reference to an existing tracker, for use in issue payloads.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// A workflow status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueStatus {
    /// Status id.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Whether issues in this status count as closed.
    pub is_closed: bool,
}

impl IssueStatus {
    /// A reference to an existing status.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// An issue priority, listed under `enumerations/issue_priorities`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssuePriority {
    /// Priority id.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Whether new issues get this priority by default.
    pub is_default: bool,
    /// Whether the value can still be chosen; absent means active.
    pub active: Option<bool>,
}

impl IssuePriority {
    /// A reference to an existing priority.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// A time entry activity, listed under
/// `enumerations/time_entry_activities`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeEntryActivity {
    /// Activity id.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Whether new time entries get this activity by default.
    pub is_default: bool,
    /// Whether the value can still be chosen; absent means active.
    pub active: Option<bool>,
}

impl TimeEntryActivity {
    /// A reference to an existing activity.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

fn encode_named(id: Option<i64>, name: &str) -> Value {
    json!({"id": id, "name": name})
}

pub(super) fn tracker_codec() -> EntityConfig<Tracker> {
    EntityConfig::new(
        "tracker",
        "trackers",
        |tracker: &Tracker| id_string(tracker.id),
        |tracker| encode_named(tracker.id, &tracker.name),
        |value: &Value, _: &EntityRegistry| -> Result<Tracker> {
            let fields = Fields::new(value, "tracker")?;
            Ok(Tracker {
                id: fields.get("id")?,
                name: fields.get_or_default("name")?,
            })
        },
    )
}

pub(super) fn status_codec() -> EntityConfig<IssueStatus> {
    EntityConfig::new(
        "issue_status",
        "issue_statuses",
        |status: &IssueStatus| id_string(status.id),
        |status| encode_named(status.id, &status.name),
        |value: &Value, _: &EntityRegistry| -> Result<IssueStatus> {
            let fields = Fields::new(value, "issue_status")?;
            Ok(IssueStatus {
                id: fields.get("id")?,
                name: fields.get_or_default("name")?,
                is_closed: fields.get_or_default("is_closed")?,
            })
        },
    )
}

pub(super) fn priority_codec() -> EntityConfig<IssuePriority> {
    EntityConfig::new(
        "issue_priority",
        "issue_priorities",
        |priority: &IssuePriority| id_string(priority.id),
        |priority| encode_named(priority.id, &priority.name),
        |value: &Value, _: &EntityRegistry| -> Result<IssuePriority> {
            let fields = Fields::new(value, "issue_priority")?;
            Ok(IssuePriority {
                id: fields.get("id")?,
                name: fields.get_or_default("name")?,
                is_default: fields.get_or_default("is_default")?,
                active: fields.get("active")?,
            })
        },
    )
    .with_url_segment("enumerations/issue_priorities")
}

pub(super) fn activity_codec() -> EntityConfig<TimeEntryActivity> {
    EntityConfig::new(
        "time_entry_activity",
        "time_entry_activities",
        |activity: &TimeEntryActivity| id_string(activity.id),
        |activity| encode_named(activity.id, &activity.name),
        |value: &Value, _: &EntityRegistry| -> Result<TimeEntryActivity> {
            let fields = Fields::new(value, "time_entry_activity")?;
            Ok(TimeEntryActivity {
                id: fields.get("id")?,
                name: fields.get_or_default("name")?,
                is_default: fields.get_or_default("is_default")?,
                active: fields.get("active")?,
            })
        },
    )
    .with_url_segment("enumerations/time_entry_activities")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerations_live_under_their_own_path() {
        let registry = EntityRegistry::standard();
        assert_eq!(
            registry.config::<IssuePriority>().url_segment,
            "enumerations/issue_priorities"
        );
        assert_eq!(registry.config::<IssuePriority>().plural, "issue_priorities");
        assert_eq!(
            registry.config::<TimeEntryActivity>().url_segment,
            "enumerations/time_entry_activities"
        );
        assert_eq!(registry.config::<Tracker>().url_segment, "trackers");
    }

    #[test]
    fn test_decode_priorities_list() {
        let registry = EntityRegistry::standard();
        let body = json!({"issue_priorities": [
            {"id": 1, "name": "Low", "is_default": false},
            {"id": 2, "name": "Normal", "is_default": true, "active": true}
        ]});
        let priorities: Vec<IssuePriority> = registry.decode_list(&body).unwrap();
        assert_eq!(priorities.len(), 2);
        assert!(priorities[1].is_default);
        assert_eq!(priorities[0].active, None);
    }

    #[test]
    fn test_status_closed_flag() {
        let registry = EntityRegistry::standard();
        let status: IssueStatus = registry
            .decode(&json!({"id": 5, "name": "Closed", "is_closed": true}))
            .unwrap();
        assert!(status.is_closed);
        assert_eq!(status.id, Some(5));
    }
}
