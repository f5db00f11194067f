//
//  redmine-client
//  model/attachment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attachments and upload tokens.
//!
//! # Attaching A File
//!
//! Files are attached in two phases:
//!
//! 1. The raw bytes are posted to `/uploads.json`, which answers with a
//!    token: `{"upload": {"token": "7167.ed1ccdb093229ca1bd0b043618d88743"}}`
//! 2. The token is referenced from the [`Issue::uploads`](super::Issue::uploads)
//!    of a create or update request, which turns it into an [`Attachment`]
//!
//! A token that is never referenced stays on the server as an orphaned blob.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{id_string, Property, User};
use crate::api::common::Result;
use crate::codec::fields::{Fields, ObjectWriter, ToWire};
use crate::codec::{EntityConfig, EntityRegistry};

/// A file attached to an issue, project file list or wiki page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attachment {
    /// Attachment id.
    pub id: Option<i64>,
    /// File name.
    pub filename: Property<String>,
    /// Description.
    pub description: Property<String>,
    /// MIME type.
    pub content_type: Property<String>,
    /// Size in bytes.
    pub filesize: Option<i64>,
    /// Absolute download URL.
    pub content_url: Option<String>,
    /// Thumbnail URL for images.
    pub thumbnail_url: Option<String>,
    /// Uploader.
    pub author: Option<User>,
    /// Creation timestamp.
    pub created_on: Option<DateTime<Utc>>,
}

impl Attachment {
    /// The description, or an empty string.
    pub fn description(&self) -> &str {
        self.description.get().map_or("", String::as_str)
    }
}

/// A reference to uploaded bytes, sent with an issue to attach them.
///
/// # Example
///
/// ```rust
/// use redmine_client::model::Upload;
///
/// let upload = Upload::new("7167.ed1ccdb0", "report.pdf").content_type("application/pdf");
/// assert_eq!(upload.filename, "report.pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Upload {
    /// Token returned by the upload endpoint.
    pub token: String,
    /// File name the attachment will carry.
    pub filename: String,
    /// MIME type.
    pub content_type: Option<String>,
    /// Attachment description.
    pub description: Option<String>,
}

impl Upload {
    /// A reference for `token` that will be named `filename`.
    pub fn new(token: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Sets the MIME type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ToWire for Upload {
    fn to_wire(&self) -> Value {
        let mut writer = ObjectWriter::new();
        writer.value("token", Value::String(self.token.clone()));
        if !self.filename.is_empty() {
            writer.value("filename", Value::String(self.filename.clone()));
        }
        if let Some(content_type) = &self.content_type {
            writer.value("content_type", Value::String(content_type.clone()));
        }
        if let Some(description) = &self.description {
            writer.value("description", Value::String(description.clone()));
        }
        writer.finish()
    }
}

fn encode(attachment: &Attachment) -> Value {
    ObjectWriter::new()
        .property("filename", &attachment.filename)
        .property("description", &attachment.description)
        .property("content_type", &attachment.content_type)
        .finish()
}

fn decode(value: &Value, registry: &EntityRegistry) -> Result<Attachment> {
    let fields = Fields::new(value, "attachment")?;
    Ok(Attachment {
        id: fields.get("id")?,
        filename: fields.property("filename")?,
        description: fields.property("description")?,
        content_type: fields.property("content_type")?,
        filesize: fields.get("filesize")?,
        content_url: fields.get("content_url")?,
        thumbnail_url: fields.get("thumbnail_url")?,
        author: fields.nested("author", registry)?.into_option(),
        created_on: fields.get("created_on")?,
    })
}

fn decode_upload(value: &Value, _: &EntityRegistry) -> Result<Upload> {
    let fields = Fields::new(value, "upload")?;
    Ok(Upload {
        token: fields.get_or_default("token")?,
        filename: fields.get_or_default("filename")?,
        content_type: fields.get("content_type")?,
        description: fields.get("description")?,
    })
}

pub(super) fn codec() -> EntityConfig<Attachment> {
    EntityConfig::new(
        "attachment",
        "attachments",
        |attachment: &Attachment| id_string(attachment.id),
        encode,
        decode,
    )
}

pub(super) fn upload_codec() -> EntityConfig<Upload> {
    EntityConfig::new("upload", "uploads", |_: &Upload| None, Upload::to_wire, decode_upload)
}
