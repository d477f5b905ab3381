//! Query-composition layer.
//!
//! Each function composes a statement from `?` templates and `SqlValue`
//! parameters, runs it through the shared [`Database`](crate::db::Database),
//! and maps the rows straight to JSON payloads. Shared conventions live
//! here: dynamic WHERE assembly paired with an aligned params vec,
//! LIMIT/OFFSET pagination with a companion COUNT sharing the WHERE, and
//! IN-list expansion for batch lookups.

pub mod articles;
pub mod categories;
pub mod daily_tasks;
pub mod inviters;
pub mod products;

use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Page request: 1-based page number and page size.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Create a page request, clamping both fields to at least 1.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Row offset of this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination envelope attached to list responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// Build the envelope for a page over `total` matching rows.
    pub fn new(page: &Page, total: i64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            pages: (total + page.limit - 1) / page.limit,
        }
    }
}

/// `%term%` pattern for ILIKE matching.
pub fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}

/// First row's value for `column` as an integer, defaulting to 0.
/// COUNT queries come back through here.
pub(crate) fn scalar_i64(rows: &[Map<String, Value>], column: &str) -> i64 {
    rows.first()
        .and_then(|row| row.get(column))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}
