//! Pagination envelope shared with the backend: the canonical request
//! `Query` and the `Page`/`PageMeta` response wrapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_wire(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Canonical list-request query. Immutable: every change constructs a new
/// value, and equality is defined over the key/value pairs rather than any
/// serialized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub page: Option<u32>,
    pub take: Option<u32>,
    pub order: Option<SortOrder>,
    pub filters: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Adds a filter key. An empty value means "no preference" and the key
    /// is dropped rather than matched against the empty string.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Key/value pairs ready for urlencoding. Unset and empty values are
    /// omitted entirely.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.filters.len());
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(take) = self.take {
            pairs.push(("take".to_string(), take.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.as_wire().to_string()));
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                pairs.push((key.clone(), value.clone()));
            }
        }
        pairs
    }

    /// Canonical digest of the filter portion (everything except `page`).
    /// Two queries with the same fingerprint belong to the same collection
    /// epoch; a differing fingerprint forces a reset before the next fetch.
    pub fn filter_fingerprint(&self) -> String {
        let mut parts = Vec::with_capacity(2 + self.filters.len());
        if let Some(take) = self.take {
            parts.push(format!("take={take}"));
        }
        if let Some(order) = self.order {
            parts.push(format!("order={}", order.as_wire()));
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                parts.push(format!("{key}={value}"));
            }
        }
        parts.join("&")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub take: u32,
    pub item_count: u32,
    pub page_count: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
