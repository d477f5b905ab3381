//! Integration tests for the query-composition conventions.

use layette_db::store::{DEFAULT_PAGE_SIZE, Page, Pagination, like_pattern};

#[test]
fn test_default_page() {
    let page = Page::default();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
    assert_eq!(page.offset(), 0);
}

#[test]
fn test_offset_advances_by_limit() {
    assert_eq!(Page::new(2, 20).offset(), 20);
    assert_eq!(Page::new(5, 10).offset(), 40);
}

#[test]
fn test_out_of_range_page_inputs_clamp() {
    let page = Page::new(-3, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 1);
}

#[test]
fn test_pagination_envelope() {
    let page = Page::new(2, 20);
    let pagination = Pagination::new(&page, 45);
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.limit, 20);
    assert_eq!(pagination.total, 45);
    assert_eq!(pagination.pages, 3);
}

#[test]
fn test_pagination_serializes_flat() {
    let pagination = Pagination::new(&Page::new(1, 20), 0);
    let value = serde_json::to_value(&pagination).unwrap();
    assert_eq!(value["page"], 1);
    assert_eq!(value["limit"], 20);
    assert_eq!(value["total"], 0);
    assert_eq!(value["pages"], 0);
}

#[test]
fn test_like_pattern_wraps_term() {
    assert_eq!(like_pattern("poussette"), "%poussette%");
}
