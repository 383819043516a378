use super::*;

#[test]
fn empty_filter_values_are_omitted() {
    let query = Query::new()
        .with_filter("type", "DOG")
        .with_filter("size", "");

    assert_eq!(query.filter("type"), Some("DOG"));
    assert_eq!(query.filter("size"), None);
    let pairs = query.query_pairs();
    assert!(pairs.iter().all(|(key, _)| key != "size"));
}

#[test]
fn setting_an_empty_value_unsets_an_existing_filter() {
    let query = Query::new()
        .with_filter("name", "Rex")
        .with_filter("name", "");

    assert_eq!(query.filter("name"), None);
}

#[test]
fn query_pairs_carry_page_take_and_order() {
    let query = Query::new()
        .with_page(3)
        .with_take(10)
        .with_order(SortOrder::Desc)
        .with_filter("type", "CAT");

    assert_eq!(
        query.query_pairs(),
        vec![
            ("page".to_string(), "3".to_string()),
            ("take".to_string(), "10".to_string()),
            ("order".to_string(), "DESC".to_string()),
            ("type".to_string(), "CAT".to_string()),
        ]
    );
}

#[test]
fn fingerprint_ignores_page_but_tracks_filters() {
    let base = Query::new().with_take(10).with_filter("type", "DOG");
    let paged = base.clone().with_page(4);
    let refiltered = base.clone().with_filter("type", "CAT");

    assert_eq!(base.filter_fingerprint(), paged.filter_fingerprint());
    assert_ne!(base.filter_fingerprint(), refiltered.filter_fingerprint());
}

#[test]
fn equality_is_structural_not_insertion_ordered() {
    let a = Query::new().with_filter("size", "LARGE").with_filter("type", "DOG");
    let b = Query::new().with_filter("type", "DOG").with_filter("size", "LARGE");

    assert_eq!(a, b);
}

#[test]
fn page_meta_decodes_backend_camel_case() {
    let raw = r#"{
        "data": [1, 2, 3],
        "meta": {
            "page": 1,
            "take": 3,
            "itemCount": 7,
            "pageCount": 3,
            "hasPreviousPage": false,
            "hasNextPage": true
        }
    }"#;

    let page: Page<i64> = serde_json::from_str(raw).expect("decode page");
    assert_eq!(page.data, vec![1, 2, 3]);
    assert_eq!(page.meta.page_count, 3);
    assert!(page.meta.has_next_page);
    assert_eq!(page.meta.has_next_page, page.meta.page < page.meta.page_count);
}
