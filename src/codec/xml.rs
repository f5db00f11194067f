//
//  redmine-client
//  codec/xml.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Legacy XML Documents
//!
//! Older servers accept request bodies as XML. Documents are built as a tree
//! of [`XmlElement`] values and rendered in one place, so every piece of text
//! and every attribute value goes through [`escape`].
//!
//! Only writing is supported. Responses are always read as JSON.
//!
//! ## Mapping From JSON
//!
//! | JSON | XML |
//! |------|-----|
//! | object | child elements, one per key |
//! | array | `type="array"` container, children named by singularising the key |
//! | `null` | empty element with `nil="true"` |
//! | string / number / bool | text content |
//!
//! ## Example
//!
//! ```rust
//! use redmine_client::codec::xml::XmlElement;
//! use serde_json::json;
//!
//! let doc = XmlElement::from_json("issue", &json!({"subject": "a < b"}));
//! assert_eq!(
//!     doc.to_document(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><issue><subject>a &lt; b</subject></issue>"
//! );
//! ```

use std::fmt::{self, Write};

use serde_json::Value;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Escapes the five XML special characters.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Content of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element.
    Element(XmlElement),
    /// Character data; escaped on render.
    Text(String),
}

/// One element of an XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Appends text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child nodes in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Converts a JSON value into an element named `name`.
    pub fn from_json(name: &str, value: &Value) -> Self {
        let element = Self::new(name);
        match value {
            Value::Null => element.attr("nil", "true"),
            Value::Bool(b) => element.text(b.to_string()),
            Value::Number(n) => element.text(n.to_string()),
            Value::String(s) => element.text(s.as_str()),
            Value::Array(items) => {
                let item_name = singularize(name);
                items.iter().fold(element.attr("type", "array"), |acc, item| {
                    acc.child(Self::from_json(&item_name, item))
                })
            }
            Value::Object(map) => map
                .iter()
                .fold(element, |acc, (key, item)| acc.child(Self::from_json(key, item))),
        }
    }

    /// Renders the element preceded by the XML declaration.
    pub fn to_document(&self) -> String {
        format!("{DECLARATION}{self}")
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", escape(value))?;
        }

        if self.children.is_empty() {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => write!(f, "{element}")?,
                XmlNode::Text(text) => f.write_str(&escape(text))?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

/// Element name for the items of an array, e.g. `custom_fields` → `custom_field`,
/// `watcher_user_ids` → `watcher_user_id`, `categories` → `category`.
fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix('s') {
        stem.to_string()
    } else {
        name.to_string()
    }
}
