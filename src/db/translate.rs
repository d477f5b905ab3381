//! Placeholder translation.
//!
//! Query templates are written with database-agnostic positional `?`
//! markers; PostgreSQL wants numbered `$1..$n`. The rewrite is a plain
//! left-to-right character walk and is not SQL-aware: a literal `?` inside a
//! quoted string would be renumbered too. None of the statements composed in
//! `store` put `?` inside literals; bind the text as a parameter instead.

/// Rewrite positional `?` markers into `$1..$n` in encounter order.
///
/// Pure function; every non-marker character passes through unchanged.
pub fn to_pg_params(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut next = 1usize;
    for ch in sql.chars() {
        if ch == '?' {
            out.push('$');
            out.push_str(&next.to_string());
            next += 1;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Number of positional markers in a template.
pub fn placeholder_count(sql: &str) -> usize {
    sql.bytes().filter(|&b| b == b'?').count()
}

/// `?, ?, ?` fragment for `IN (...)` expansion over `n` values.
pub fn in_list(n: usize) -> String {
    let mut out = String::with_capacity(n.saturating_mul(3));
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_markers_in_order() {
        assert_eq!(
            to_pg_params("SELECT * FROM t WHERE a = ? AND b = ?"),
            "SELECT * FROM t WHERE a = $1 AND b = $2"
        );
    }

    #[test]
    fn test_no_markers_is_identity() {
        let sql = "SELECT 1 AS ok";
        assert_eq!(to_pg_params(sql), sql);
    }

    #[test]
    fn test_all_other_characters_untouched() {
        assert_eq!(
            to_pg_params("INSERT INTO t (a, b, c) VALUES (?, ?, ?)"),
            "INSERT INTO t (a, b, c) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn test_many_markers_stay_sequential() {
        let sql = "? ? ? ? ? ? ? ? ? ? ?";
        assert_eq!(to_pg_params(sql), "$1 $2 $3 $4 $5 $6 $7 $8 $9 $10 $11");
        assert_eq!(placeholder_count(sql), 11);
    }

    // The scan is deliberately not SQL-aware; a marker inside a string
    // literal is rewritten like any other. Pinned so a future "fix" shows
    // up as a conscious behavior change.
    #[test]
    fn test_quoted_literal_marker_is_rewritten_too() {
        assert_eq!(
            to_pg_params("SELECT 'why?' AS q WHERE a = ?"),
            "SELECT 'why$1' AS q WHERE a = $2"
        );
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(placeholder_count("SELECT 1"), 0);
        assert_eq!(placeholder_count("a = ? AND b = ?"), 2);
    }

    #[test]
    fn test_in_list() {
        assert_eq!(in_list(0), "");
        assert_eq!(in_list(1), "?");
        assert_eq!(in_list(3), "?, ?, ?");
    }

    #[test]
    fn test_in_list_composes_with_translation() {
        let sql = format!("SELECT id FROM t WHERE id IN ({})", in_list(3));
        assert_eq!(
            to_pg_params(&sql),
            "SELECT id FROM t WHERE id IN ($1, $2, $3)"
        );
    }
}
