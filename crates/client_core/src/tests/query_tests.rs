use std::collections::BTreeMap;

use shared::domain::AnimalKind;

use super::*;

fn filters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn badge_search_and_filters_merge() {
    let query = compose(
        Some(AnimalKind::Dog),
        "Rex",
        &filters(&[("size", "LARGE")]),
    );

    assert_eq!(query.filter(TYPE_KEY), Some("DOG"));
    assert_eq!(query.filter(NAME_KEY), Some("Rex"));
    assert_eq!(query.filter("size"), Some("LARGE"));
}

#[test]
fn explicit_type_filter_beats_badge() {
    let query = compose(Some(AnimalKind::Dog), "", &filters(&[("type", "CAT")]));

    assert_eq!(query.filter(TYPE_KEY), Some("CAT"));
}

#[test]
fn explicit_name_filter_beats_search_text() {
    let query = compose(None, "Rex", &filters(&[("name", "Mia")]));

    assert_eq!(query.filter(NAME_KEY), Some("Mia"));
}

#[test]
fn search_text_is_trimmed_and_blank_is_unset() {
    let query = compose(None, "  Rex  ", &BTreeMap::new());
    assert_eq!(query.filter(NAME_KEY), Some("Rex"));

    let query = compose(None, "   ", &BTreeMap::new());
    assert_eq!(query.filter(NAME_KEY), None);
}

#[test]
fn empty_filter_values_mean_no_preference() {
    let query = compose(None, "", &filters(&[("size", ""), ("color", "BLACK")]));

    assert_eq!(query.filter("size"), None);
    assert_eq!(query.filter("color"), Some("BLACK"));
}

#[test]
fn same_inputs_same_query() {
    let values = filters(&[("size", "LARGE"), ("color", "BLACK")]);
    let a = compose(Some(AnimalKind::Cat), "Mia", &values);
    let b = compose(Some(AnimalKind::Cat), "Mia", &values);

    assert_eq!(a, b);
    assert_eq!(a.filter_fingerprint(), b.filter_fingerprint());
}
