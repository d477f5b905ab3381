//! Integration tests for placeholder translation.
//!
//! These pin the translation contract the whole store layer builds on:
//! N markers become N distinct numbered parameters in encounter order, and
//! nothing else in the template changes.

use layette_db::db::{in_list, placeholder_count, to_pg_params};

#[test]
fn test_two_markers_number_left_to_right() {
    let translated = to_pg_params("SELECT * FROM t WHERE a = ? AND b = ?");
    assert_eq!(translated, "SELECT * FROM t WHERE a = $1 AND b = $2");
}

#[test]
fn test_marker_count_matches_distinct_numbers() {
    let template = "INSERT INTO daily_task (day, task, task_is_completed, time_group) \
                    VALUES (?::date, ?, FALSE, ?)";
    let translated = to_pg_params(template);

    assert_eq!(placeholder_count(template), 3);
    for n in 1..=3 {
        assert!(translated.contains(&format!("${n}")), "missing ${n}");
    }
    assert!(!translated.contains('?'));
}

#[test]
fn test_translation_preserves_surrounding_text() {
    let template = "UPDATE inviter SET baby_name = ? WHERE inviter_id = ?";
    let translated = to_pg_params(template);
    assert!(translated.starts_with("UPDATE inviter SET baby_name = $1"));
    assert!(translated.ends_with("WHERE inviter_id = $2"));
}

#[test]
fn test_no_markers_round_trips() {
    let template = "SELECT COUNT(*) AS total FROM products";
    assert_eq!(to_pg_params(template), template);
    assert_eq!(placeholder_count(template), 0);
}

#[test]
fn test_in_list_expansion_numbers_sequentially() {
    let template = format!(
        "SELECT product_id, image_path FROM product_images WHERE product_id IN ({})",
        in_list(4)
    );
    let translated = to_pg_params(&template);
    assert!(translated.contains("IN ($1, $2, $3, $4)"));
}
