//! Cursor-based pagination shared by every list endpoint.
//!
//! List endpoints answer with a collection plus a `meta` block:
//!
//! ```json
//! { "instances": [...], "meta": { "total": 3, "links": { "next": "bmV4dA==", "prev": "" } } }
//! ```
//!
//! Cursors are opaque provider tokens. They are only ever copied from
//! [`Meta`] back into [`ListOptions::cursor`], never parsed or built, and a
//! cursor from one resource type is meaningless for another.

use serde::{Deserialize, Serialize};

use crate::query::{QueryPairs, QueryParams};

/// Options accepted by every list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Page size hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Opaque cursor from a previous page's metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Filter by main IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_ip: Option<String>,
    /// Filter by label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Filter by tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Filter by region id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Filter by description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListOptions {
    /// Options with no cursor, page size or filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size hint.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the cursor.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Filter by main IP address.
    #[must_use]
    pub fn with_main_ip(mut self, main_ip: impl Into<String>) -> Self {
        self.main_ip = Some(main_ip.into());
        self
    }

    /// Filter by label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Filter by tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Filter by region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Filter by description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Options for the page after the one described by `meta`.
    ///
    /// Filters and page size are kept; `None` means `meta` was the last page.
    #[must_use]
    pub fn next_page(&self, meta: &Meta) -> Option<Self> {
        meta.next_cursor()
            .map(|cursor| self.clone().with_cursor(cursor))
    }

    /// Options for the page before the one described by `meta`.
    #[must_use]
    pub fn prev_page(&self, meta: &Meta) -> Option<Self> {
        meta.prev_cursor()
            .map(|cursor| self.clone().with_cursor(cursor))
    }

    /// Query builder holding these options.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("per_page", self.per_page);
        params.push_non_empty("cursor", self.cursor.as_deref());
        params.push_non_empty("main_ip", self.main_ip.as_deref());
        params.push_non_empty("label", self.label.as_deref());
        params.push_non_empty("tag", self.tag.as_deref());
        params.push_non_empty("region", self.region.as_deref());
        params.push_non_empty("description", self.description.as_deref());
        params
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> QueryPairs {
        self.to_params().into_pairs()
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Total number of results across all pages
    pub total: u64,
    /// Cursors for adjacent pages
    pub links: Links,
}

/// Cursors for the pages around the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    /// Cursor of the next page, empty on the last page
    pub next: String,
    /// Cursor of the previous page, empty on the first page
    pub prev: String,
}

impl Meta {
    /// Cursor of the next page, if there is one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        Some(self.links.next.as_str()).filter(|c| !c.is_empty())
    }

    /// Cursor of the previous page, if there is one.
    #[must_use]
    pub fn prev_cursor(&self) -> Option<&str> {
        Some(self.links.prev.as_str()).filter(|c| !c.is_empty())
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination metadata for this page
    pub meta: Meta,
}

impl<T> Page<T> {
    /// Returns true when another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.meta.next_cursor().is_some()
    }

    /// Returns true when this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(next: &str, prev: &str) -> Meta {
        Meta {
            total: 10,
            links: Links {
                next: next.to_string(),
                prev: prev.to_string(),
            },
        }
    }

    #[test]
    fn default_options_produce_no_pairs() {
        assert!(ListOptions::new().to_pairs().is_empty());
    }

    #[test]
    fn options_serialize_cursor_and_filters_in_order() {
        let options = ListOptions::new()
            .with_per_page(25)
            .with_cursor("bmV4dF9fMjU=")
            .with_label("web")
            .with_region("ewr");
        assert_eq!(
            options.to_pairs(),
            vec![
                ("per_page", "25".to_string()),
                ("cursor", "bmV4dF9fMjU=".to_string()),
                ("label", "web".to_string()),
                ("region", "ewr".to_string()),
            ]
        );
    }

    #[test]
    fn next_page_copies_cursor_verbatim_and_keeps_filters() {
        let options = ListOptions::new().with_per_page(2).with_tag("db");
        let next = options.next_page(&meta("Y3Vyc29yOjI=", "")).unwrap();
        assert_eq!(next.cursor.as_deref(), Some("Y3Vyc29yOjI="));
        assert_eq!(next.per_page, Some(2));
        assert_eq!(next.tag.as_deref(), Some("db"));
        assert_ne!(next.to_pairs(), options.to_pairs());
    }

    #[test]
    fn empty_cursors_mean_boundaries() {
        let options = ListOptions::new();
        assert!(options.next_page(&meta("", "cHJldg==")).is_none());
        assert!(options.prev_page(&meta("bmV4dA==", "")).is_none());
        assert_eq!(
            options
                .prev_page(&meta("", "cHJldg=="))
                .and_then(|o| o.cursor),
            Some("cHJldg==".to_string())
        );
    }

    #[test]
    fn meta_defaults_missing_fields() {
        let meta: Meta = serde_json::from_str(r#"{"total": 4}"#).unwrap();
        assert_eq!(meta.total, 4);
        assert!(meta.next_cursor().is_none());
        assert!(meta.prev_cursor().is_none());
    }

    #[test]
    fn page_reports_next() {
        let page = Page {
            items: vec![1, 2],
            meta: meta("bmV4dA==", ""),
        };
        assert!(page.has_next());
        assert_eq!(page.len(), 2);
        assert_eq!(page.into_iter().sum::<i32>(), 3);
    }
}
