//
//  redmine-client
//  model/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity types exchanged with the server.
//!
//! Every type here has a codec registered in
//! [`EntityRegistry::standard`](crate::codec::EntityRegistry::standard).
//!
//! # Overview
//!
//! | Entity | Collection path | Nested under |
//! |--------|-----------------|--------------|
//! | [`Project`] | `projects` | |
//! | [`Issue`] | `issues` | |
//! | [`User`] | `users` | |
//! | [`TimeEntry`] | `time_entries` | |
//! | [`Attachment`] | `attachments` | |
//! | [`IssueRelation`] | `relations` | issues |
//! | [`Version`] | `versions` | projects |
//! | [`IssueCategory`] | `issue_categories` | projects |
//! | [`Tracker`] | `trackers` | |
//! | [`IssueStatus`] | `issue_statuses` | |
//! | [`IssuePriority`] | `enumerations/issue_priorities` | |
//! | [`TimeEntryActivity`] | `enumerations/time_entry_activities` | |
//! | [`CustomField`] | `custom_fields` | |
//! | [`Journal`], [`JournalDetail`] | embedded in issues | |
//! | [`Upload`] | `uploads` | |
//!
//! # Field Conventions
//!
//! - Writable attributes are [`Property`] values, so an update can tell
//!   "leave alone" from "clear"
//! - Server-maintained attributes (timestamps, authors, counters) are plain
//!   `Option`s and are never written back
//! - Associations decode to full entity values holding whatever the server
//!   embedded (usually `id` and `name`); they are written back as `*_id`
//! - Collections decode to empty vectors when the server omits them

mod attachment;
mod custom_field;
mod issue;
mod journal;
mod lookup;
mod project;
mod property;
mod relation;
mod time_entry;
mod user;
mod version;

pub use attachment::*;
pub use custom_field::*;
pub use issue::*;
pub use journal::*;
pub use lookup::*;
pub use project::*;
pub use property::*;
pub use relation::*;
pub use time_entry::*;
pub use user::*;
pub use version::*;

use crate::codec::EntityRegistry;

/// Registers every built-in entity codec.
pub fn register_all(registry: &mut EntityRegistry) {
    registry
        .register(project::codec())
        .register(issue::codec())
        .register(user::codec())
        .register(time_entry::codec())
        .register(attachment::codec())
        .register(attachment::upload_codec())
        .register(relation::codec())
        .register(version::codec())
        .register(version::category_codec())
        .register(lookup::tracker_codec())
        .register(lookup::status_codec())
        .register(lookup::priority_codec())
        .register(lookup::activity_codec())
        .register(journal::codec())
        .register(journal::detail_codec())
        .register(custom_field::codec());
}

fn id_string(id: Option<i64>) -> Option<String> {
    id.map(|id| id.to_string())
}
