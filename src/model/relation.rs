//
//  redmine-client
//  model/relation.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Relations between issues.
//!
//! Relations are created under the source issue
//! (`POST /issues/{id}/relations.json`) and read or deleted at
//! `/relations/{id}.json`.

use serde_json::Value;

use super::{id_string, Property};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter};
use crate::codec::{EntityConfig, EntityRegistry};

/// Relation type names.
pub mod relation_type {
    /// Plain link.
    pub const RELATES: &str = "relates";
    /// Duplicates the target.
    pub const DUPLICATES: &str = "duplicates";
    /// Duplicated by the target.
    pub const DUPLICATED: &str = "duplicated";
    /// Blocks the target.
    pub const BLOCKS: &str = "blocks";
    /// Blocked by the target.
    pub const BLOCKED: &str = "blocked";
    /// Must finish before the target starts; honours `delay`.
    pub const PRECEDES: &str = "precedes";
    /// Starts after the target finishes; honours `delay`.
    pub const FOLLOWS: &str = "follows";
    /// Copied to the target.
    pub const COPIED_TO: &str = "copied_to";
    /// Copied from the target.
    pub const COPIED_FROM: &str = "copied_from";
}

/// A directed relation from `issue_id` to `issue_to_id`.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::{relation_type, IssueRelation};
///
/// let relation = IssueRelation::new(12, relation_type::BLOCKS);
/// assert_eq!(relation.issue_to_id.get(), Some(&12));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueRelation {
    /// Relation id.
    pub id: Option<i64>,
    /// Source issue.
    pub issue_id: Option<i64>,
    /// Target issue.
    pub issue_to_id: Property<i64>,
    /// Relation type, see [`relation_type`].
    pub relation_type: Property<String>,
    /// Delay in days for `precedes`/`follows`.
    pub delay: Property<i64>,
}

impl IssueRelation {
    /// A new relation pointing at `issue_to_id`.
    pub fn new(issue_to_id: i64, relation_type: &str) -> Self {
        Self {
            issue_to_id: Property::Set(issue_to_id),
            relation_type: Property::Set(relation_type.to_string()),
            ..Self::default()
        }
    }
}

fn encode(relation: &IssueRelation) -> Value {
    ObjectWriter::new()
        .property("issue_to_id", &relation.issue_to_id)
        .property("relation_type", &relation.relation_type)
        .property("delay", &relation.delay)
        .finish()
}

fn decode(value: &Value, _: &EntityRegistry) -> Result<IssueRelation> {
    let fields = Fields::new(value, "relation")?;
    Ok(IssueRelation {
        id: fields.get("id")?,
        issue_id: fields.get("issue_id")?,
        issue_to_id: fields.property("issue_to_id")?,
        relation_type: fields.property("relation_type")?,
        delay: fields.property("delay")?,
    })
}

pub(super) fn codec() -> EntityConfig<IssueRelation> {
    EntityConfig::new(
        "relation",
        "relations",
        |relation: &IssueRelation| id_string(relation.id),
        encode,
        decode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_keeps_null_delay() {
        let registry = EntityRegistry::standard();
        let relation: IssueRelation = registry
            .decode(&json!({
                "id": 1819, "issue_id": 8470, "issue_to_id": 8469,
                "relation_type": "relates", "delay": null
            }))
            .unwrap();
        assert_eq!(relation.delay, Property::Null);
        assert_eq!(
            registry.encode(&relation),
            json!({"issue_to_id": 8469, "relation_type": "relates", "delay": null})
        );
    }
}
