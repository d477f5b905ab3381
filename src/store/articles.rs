//! Advice-article queries.

use serde_json::Value;

use crate::db::{Database, SqlValue};
use crate::error::DbResult;
use super::{Page, Pagination, like_pattern, scalar_i64};

const LIST_COLUMNS: &str = "a.article_id AS _id, a.title AS title, a.slug AS slug, \
     a.summary AS summary, a.cover_image AS \"coverImage\", a.age_group AS \"ageGroup\"";

/// WHERE clause and aligned params for the published listing.
fn filter_clauses(tag: Option<&str>) -> (String, Vec<SqlValue>) {
    let mut where_clause = String::from("a.is_published = TRUE");
    let mut params = Vec::new();
    if let Some(tag) = tag {
        where_clause.push_str(" AND a.tags ILIKE ?");
        params.push(SqlValue::from(like_pattern(tag)));
    }
    (where_clause, params)
}

/// Published articles, optionally filtered by tag, in display order.
pub async fn list(
    db: &Database,
    page: &Page,
    tag: Option<&str>,
) -> DbResult<(Vec<Value>, Pagination)> {
    let (where_clause, params) = filter_clauses(tag);

    let sql = format!(
        "SELECT {LIST_COLUMNS}, \
                a.display_order AS \"DisplayOrder\", \
                a.is_published AS \"IsPublished\", \
                a.view_count AS \"ViewCount\" \
         FROM articles a \
         WHERE {where_clause} \
         ORDER BY a.display_order ASC, a.article_id DESC \
         LIMIT ? OFFSET ?"
    );
    let mut list_params = params.clone();
    list_params.push(page.limit.into());
    list_params.push(page.offset().into());
    let rows = db.query(&sql, &list_params).await?;

    let count_sql = format!("SELECT COUNT(*) AS total FROM articles a WHERE {where_clause}");
    let total = scalar_i64(&db.query(&count_sql, &params).await?, "total");

    Ok((
        rows.into_iter().map(Value::Object).collect(),
        Pagination::new(page, total),
    ))
}

/// One published article by slug, or `None`.
pub async fn by_slug(db: &Database, slug: &str) -> DbResult<Option<Value>> {
    let sql = format!(
        "SELECT {LIST_COLUMNS}, a.view_count AS \"ViewCount\" \
         FROM articles a \
         WHERE a.is_published = TRUE AND a.slug = ?"
    );
    let rows = db.query(&sql, &[slug.into()]).await?;
    Ok(rows.into_iter().next().map(Value::Object))
}

/// Increment an article's view count (NULL-safe) and return the new value.
/// `None` when the article does not exist.
pub async fn record_view(db: &Database, id: i64) -> DbResult<Option<i64>> {
    let affected = db
        .execute(
            "UPDATE articles SET view_count = COALESCE(view_count, 0) + 1 WHERE article_id = ?",
            &[id.into()],
        )
        .await?;
    if affected == 0 {
        return Ok(None);
    }

    let rows = db
        .query(
            "SELECT view_count AS \"ViewCount\" FROM articles WHERE article_id = ?",
            &[id.into()],
        )
        .await?;
    Ok(Some(scalar_i64(&rows, "ViewCount")))
}

/// Published articles carrying a tag, paginated.
pub async fn by_tag(
    db: &Database,
    tag: &str,
    page: &Page,
) -> DbResult<(Vec<Value>, Pagination)> {
    let pattern = like_pattern(tag);

    let sql = format!(
        "SELECT {LIST_COLUMNS} \
         FROM articles a \
         WHERE a.is_published = TRUE AND a.tags ILIKE ? \
         ORDER BY a.article_id DESC \
         LIMIT ? OFFSET ?"
    );
    let rows = db
        .query(
            &sql,
            &[
                pattern.as_str().into(),
                page.limit.into(),
                page.offset().into(),
            ],
        )
        .await?;

    let total_rows = db
        .query(
            "SELECT COUNT(*) AS total FROM articles a \
             WHERE a.is_published = TRUE AND a.tags ILIKE ?",
            &[pattern.as_str().into()],
        )
        .await?;
    let total = scalar_i64(&total_rows, "total");

    Ok((
        rows.into_iter().map(Value::Object).collect(),
        Pagination::new(page, total),
    ))
}
