//
//  redmine-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Across Server Dialects
//!
//! List endpoints return one page per request. Servers of this family speak
//! one of two paging dialects, and this module hides the difference behind
//! [`paginate`].
//!
//! # Overview
//!
//! | Dialect | Request | Stop condition |
//! |---------|---------|----------------|
//! | [`PaginationDialect::OffsetLimit`] | `limit=P&offset=O`, `O` from 0 | collected ≥ `total_count`, empty page, or no `total_count` |
//! | [`PaginationDialect::PageNumber`] | `page=N&per_page=P`, `N` from 1 | empty page, or a body identical to page 1 |
//!
//! # Offset Dialect
//!
//! The offset advances by the number of items actually received, not by the
//! requested limit, so a server that caps page sizes below `limit` still
//! yields every item exactly once. A response without `total_count` is an
//! unpaginated list and ends the walk.
//!
//! # Page-Number Dialect
//!
//! Some servers answer an out-of-range `page` with page 1 again instead of an
//! empty list. The raw body of page 1 is kept and every later body is
//! compared with it byte for byte; a match ends the walk. Lists whose bodies
//! are not deterministic (embedded timestamps, unstable ordering) defeat this
//! check, and the walk then ends only at an empty page.
//!
//! # Example
//!
//! ```rust
//! use redmine_client::api::common::{paginate, Page, PaginationDialect, ResultsWrapper};
//!
//! let pages = vec![vec![1, 2], vec![3]];
//! let items = paginate(PaginationDialect::OffsetLimit, 2, |params| {
//!     let offset: usize = params[1].value().parse().unwrap();
//!     let results = pages.get(offset / 2).cloned().unwrap_or_default();
//!     Ok(Page::new(String::new(), ResultsWrapper::new(results).with_total_count(3)))
//! })
//! .unwrap();
//!
//! assert_eq!(items, vec![1, 2, 3]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use super::Result;
use crate::api::endpoint::RequestParam;

/// Query parameter carrying the page size in the offset dialect.
pub const LIMIT_PARAM: &str = "limit";
/// Query parameter carrying the first index in the offset dialect.
pub const OFFSET_PARAM: &str = "offset";
/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";
/// Query parameter carrying the page size in the page-number dialect.
pub const PER_PAGE_PARAM: &str = "per_page";

/// Default number of objects requested per page.
pub const DEFAULT_OBJECTS_PER_PAGE: usize = 25;

/// The paging protocol spoken by the server.
///
/// Serialised as `"offset"` or `"page"` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaginationDialect {
    /// `limit`/`offset` with `total_count` in every list envelope.
    #[default]
    #[serde(rename = "offset")]
    OffsetLimit,
    /// `page`/`per_page`, no total.
    #[serde(rename = "page")]
    PageNumber,
}

impl PaginationDialect {
    /// Returns `true` if `name` is one of this dialect's paging parameters.
    pub fn is_paging_param(self, name: &str) -> bool {
        match self {
            Self::OffsetLimit => name == LIMIT_PARAM || name == OFFSET_PARAM,
            Self::PageNumber => name == PAGE_PARAM || name == PER_PAGE_PARAM,
        }
    }
}

/// One page of a list, with the paging metadata the server reported.
///
/// `total_count`, `limit` and `offset` are absent under the page-number
/// dialect and on unpaginated lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsWrapper<T> {
    /// Total number of items across all pages.
    pub total_count: Option<usize>,
    /// Page size the server applied.
    pub limit: Option<usize>,
    /// Index of the first item of this page.
    pub offset: Option<usize>,
    /// Items of this page, in server order.
    pub results: Vec<T>,
}

impl<T> ResultsWrapper<T> {
    /// Wraps items without metadata.
    pub fn new(results: Vec<T>) -> Self {
        Self {
            total_count: None,
            limit: None,
            offset: None,
            results,
        }
    }

    /// Sets `total_count`.
    pub fn with_total_count(mut self, total_count: usize) -> Self {
        self.total_count = Some(total_count);
        self
    }

    /// Reads the metadata of a list envelope and decodes its items with
    /// `decode`.
    pub fn from_envelope(
        envelope: &Value,
        decode: impl FnOnce(&Value) -> Result<Vec<T>>,
    ) -> Result<Self> {
        let info = PageInfo::deserialize(envelope)?;
        Ok(Self {
            total_count: info.total_count,
            limit: info.limit,
            offset: info.offset,
            results: decode(envelope)?,
        })
    }

    /// Returns `true` if the server reported more items after this page.
    pub fn has_more(&self) -> bool {
        match self.total_count {
            Some(total) => self.offset.unwrap_or(0) + self.results.len() < total,
            None => false,
        }
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    total_count: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

/// A fetched page together with its raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Response body exactly as received.
    pub raw: String,
    /// Decoded page.
    pub items: ResultsWrapper<T>,
}

impl<T> Page<T> {
    /// Pairs a raw body with its decoded content.
    pub fn new(raw: String, items: ResultsWrapper<T>) -> Self {
        Self { raw, items }
    }
}

/// Collects every item of a list, fetching pages with `fetch`.
///
/// `fetch` receives the paging parameters for the next request and returns
/// the decoded page. Items are returned in server order.
///
/// # Errors
///
/// The first error returned by `fetch` ends the walk and is propagated.
pub fn paginate<T>(
    dialect: PaginationDialect,
    per_page: usize,
    fetch: impl FnMut(&[RequestParam]) -> Result<Page<T>>,
) -> Result<Vec<T>> {
    let per_page = per_page.max(1);
    match dialect {
        PaginationDialect::OffsetLimit => paginate_offset(per_page, fetch),
        PaginationDialect::PageNumber => paginate_pages(per_page, fetch),
    }
}

fn paginate_offset<T>(
    limit: usize,
    mut fetch: impl FnMut(&[RequestParam]) -> Result<Page<T>>,
) -> Result<Vec<T>> {
    let mut collected = Vec::new();
    let mut offset = 0_usize;

    loop {
        let params = [
            RequestParam::new(LIMIT_PARAM, limit.to_string()),
            RequestParam::new(OFFSET_PARAM, offset.to_string()),
        ];
        let page = fetch(&params)?.items;
        let received = page.results.len();
        trace!(offset, received, total = ?page.total_count, "fetched page");

        let total = page.total_count;
        collected.extend(page.results);

        match total {
            None => break,
            Some(total) if collected.len() >= total => break,
            Some(_) if received == 0 => break,
            Some(_) => offset += received,
        }
    }

    Ok(collected)
}

fn paginate_pages<T>(
    per_page: usize,
    mut fetch: impl FnMut(&[RequestParam]) -> Result<Page<T>>,
) -> Result<Vec<T>> {
    let mut collected = Vec::new();
    let mut first_body: Option<String> = None;
    let mut number = 1_usize;

    loop {
        let params = [
            RequestParam::new(PAGE_PARAM, number.to_string()),
            RequestParam::new(PER_PAGE_PARAM, per_page.to_string()),
        ];
        let page = fetch(&params)?;
        trace!(page = number, received = page.items.results.len(), "fetched page");

        if page.items.results.is_empty() {
            break;
        }

        match &first_body {
            None => first_body = Some(page.raw),
            Some(first) if *first == page.raw => {
                warn!(page = number, "server returned page 1 again; treating the list as complete");
                break;
            }
            Some(_) => {}
        }

        collected.extend(page.items.results);
        number += 1;
    }

    Ok(collected)
}
