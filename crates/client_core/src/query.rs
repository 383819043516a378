//! Merges badge selection, free-text search, and filter-panel values into
//! the one canonical [`Query`] sent to the backend.

use std::collections::BTreeMap;

use shared::{domain::AnimalKind, page::Query};

/// Reserved filter key the species badge writes to.
pub const TYPE_KEY: &str = "type";
/// Reserved filter key the search box writes to.
pub const NAME_KEY: &str = "name";

/// Pure merge, priority order: explicit filter-panel values win, then the
/// badge fills `type` if still unset, then the trimmed search text fills
/// `name` if still unset and non-empty.
pub fn compose(
    badge: Option<AnimalKind>,
    search_text: &str,
    filter_values: &BTreeMap<String, String>,
) -> Query {
    let mut query = Query::new();
    for (key, value) in filter_values {
        query = query.with_filter(key.clone(), value.clone());
    }

    if let Some(kind) = badge {
        if query.filter(TYPE_KEY).is_none() {
            query = query.with_filter(TYPE_KEY, kind.as_wire());
        }
    }

    let search = search_text.trim();
    if !search.is_empty() && query.filter(NAME_KEY).is_none() {
        query = query.with_filter(NAME_KEY, search);
    }

    query
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
