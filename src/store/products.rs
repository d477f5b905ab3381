//! Product queries.
//!
//! Listings join the category row and attach the ordered image paths in a
//! single batch lookup, so a page of products costs three statements
//! regardless of page size.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::db::{Database, SqlValue, translate};
use crate::error::DbResult;
use super::{Page, Pagination, like_pattern, scalar_i64};

const CORE_COLUMNS: &str = "p.product_id AS _id, p.name AS name, p.slug AS slug, \
     p.description AS description, p.brand AS brand, p.price AS price, \
     p.currency AS currency, p.stock AS stock, p.rating AS rating";

const FLAG_COLUMNS: &str = "p.is_active AS \"isActive\", p.is_featured AS \"isFeatured\"";

const CATEGORY_COLUMNS: &str = "c.name AS \"categoryName\", c.slug AS \"categorySlug\", \
     c.icon AS \"categoryIcon\"";

/// Filters for the product listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub featured_only: bool,
}

/// WHERE clause and aligned params for a listing filter.
fn filter_clauses(filter: &ProductFilter) -> (String, Vec<SqlValue>) {
    let mut where_clause = String::from("p.is_active = TRUE");
    let mut params = Vec::new();
    if let Some(category_id) = filter.category_id {
        where_clause.push_str(" AND p.category_id = ?");
        params.push(SqlValue::from(category_id));
    }
    if filter.featured_only {
        where_clause.push_str(" AND p.is_featured = TRUE");
    }
    (where_clause, params)
}

/// Active products, newest first, with images and pagination meta.
pub async fn list(
    db: &Database,
    filter: &ProductFilter,
    page: &Page,
) -> DbResult<(Vec<Value>, Pagination)> {
    let (where_clause, params) = filter_clauses(filter);

    let sql = format!(
        "SELECT {CORE_COLUMNS}, {FLAG_COLUMNS}, {CATEGORY_COLUMNS} \
         FROM products p \
         LEFT JOIN categories c ON c.category_id = p.category_id \
         WHERE {where_clause} \
         ORDER BY p.product_id DESC \
         LIMIT ? OFFSET ?"
    );
    let mut list_params = params.clone();
    list_params.push(page.limit.into());
    list_params.push(page.offset().into());
    let rows = db.query(&sql, &list_params).await?;

    let images = images_for(db, &row_ids(&rows)).await?;
    let data = rows
        .into_iter()
        .map(|row| with_category_and_images(row, &images))
        .collect();

    let count_sql = format!("SELECT COUNT(*) AS total FROM products p WHERE {where_clause}");
    let total = scalar_i64(&db.query(&count_sql, &params).await?, "total");

    Ok((data, Pagination::new(page, total)))
}

/// Active products whose name or description matches the term,
/// case-insensitively, capped at 20.
pub async fn search(db: &Database, term: &str) -> DbResult<Vec<Value>> {
    let pattern = like_pattern(term);
    let sql = format!(
        "SELECT {CORE_COLUMNS}, {CATEGORY_COLUMNS} \
         FROM products p \
         LEFT JOIN categories c ON c.category_id = p.category_id \
         WHERE p.is_active = TRUE AND (p.name ILIKE ? OR p.description ILIKE ?) \
         ORDER BY p.product_id DESC \
         LIMIT 20"
    );
    let rows = db
        .query(&sql, &[pattern.as_str().into(), pattern.as_str().into()])
        .await?;

    let images = images_for(db, &row_ids(&rows)).await?;
    Ok(rows
        .into_iter()
        .map(|row| with_category_and_images(row, &images))
        .collect())
}

/// One active product by slug, or `None`.
pub async fn by_slug(db: &Database, slug: &str) -> DbResult<Option<Value>> {
    fetch_one(db, "p.slug = ?", slug.into()).await
}

/// One active product by id, or `None`.
pub async fn by_id(db: &Database, id: i64) -> DbResult<Option<Value>> {
    fetch_one(db, "p.product_id = ?", id.into()).await
}

async fn fetch_one(db: &Database, predicate: &str, param: SqlValue) -> DbResult<Option<Value>> {
    let sql = format!(
        "SELECT {CORE_COLUMNS}, {CATEGORY_COLUMNS} \
         FROM products p \
         LEFT JOIN categories c ON c.category_id = p.category_id \
         WHERE p.is_active = TRUE AND {predicate}"
    );
    let rows = db.query(&sql, std::slice::from_ref(&param)).await?;
    let Some(row) = rows.into_iter().next() else {
        return Ok(None);
    };

    let images = images_for(db, &row_ids(std::slice::from_ref(&row))).await?;
    Ok(Some(with_category_and_images(row, &images)))
}

/// Ordered image paths for a batch of products, keyed by product id.
/// An empty id list short-circuits without touching the database.
pub async fn images_for(db: &Database, ids: &[i64]) -> DbResult<HashMap<i64, Vec<String>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!(
        "SELECT product_id, image_path \
         FROM product_images \
         WHERE product_id IN ({}) \
         ORDER BY display_order ASC",
        translate::in_list(ids.len())
    );
    let params: Vec<SqlValue> = ids.iter().copied().map(SqlValue::from).collect();
    let rows = db.query(&sql, &params).await?;

    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    for row in &rows {
        let id = row.get("product_id").and_then(Value::as_i64);
        let path = row.get("image_path").and_then(Value::as_str);
        if let (Some(id), Some(path)) = (id, path) {
            map.entry(id).or_default().push(path.to_string());
        }
    }
    Ok(map)
}

fn row_ids(rows: &[Map<String, Value>]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("_id").and_then(Value::as_i64))
        .collect()
}

/// Fold the joined category columns into a nested object and attach the
/// product's image list.
fn with_category_and_images(
    mut row: Map<String, Value>,
    images: &HashMap<i64, Vec<String>>,
) -> Value {
    let id = row.get("_id").and_then(Value::as_i64).unwrap_or(0);
    let category = json!({
        "name": row.remove("categoryName").unwrap_or(Value::Null),
        "slug": row.remove("categorySlug").unwrap_or(Value::Null),
        "icon": row.remove("categoryIcon").unwrap_or(Value::Null),
    });
    let image_list = images.get(&id).cloned().unwrap_or_default();
    row.insert("images".to_string(), json!(image_list));
    row.insert("categoryId".to_string(), category);
    Value::Object(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_active_only() {
        let (where_clause, params) = filter_clauses(&ProductFilter::default());
        assert_eq!(where_clause, "p.is_active = TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_filter_category_adds_aligned_param() {
        let filter = ProductFilter {
            category_id: Some(7),
            featured_only: false,
        };
        let (where_clause, params) = filter_clauses(&filter);
        assert_eq!(where_clause, "p.is_active = TRUE AND p.category_id = ?");
        assert_eq!(params, vec![SqlValue::Int(7)]);
    }

    #[test]
    fn test_filter_featured_adds_no_param() {
        let filter = ProductFilter {
            category_id: Some(7),
            featured_only: true,
        };
        let (where_clause, params) = filter_clauses(&filter);
        assert_eq!(
            where_clause,
            "p.is_active = TRUE AND p.category_id = ? AND p.is_featured = TRUE"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_category_columns_fold_into_object() {
        let mut row = Map::new();
        row.insert("_id".to_string(), json!(3));
        row.insert("name".to_string(), json!("Biberon"));
        row.insert("categoryName".to_string(), json!("Repas"));
        row.insert("categorySlug".to_string(), json!("repas"));
        row.insert("categoryIcon".to_string(), json!("🍼"));

        let mut images = HashMap::new();
        images.insert(3i64, vec!["a.jpg".to_string(), "b.jpg".to_string()]);

        let value = with_category_and_images(row, &images);
        assert_eq!(value["categoryId"]["slug"], "repas");
        assert_eq!(value["images"], json!(["a.jpg", "b.jpg"]));
        assert!(value.get("categoryName").is_none());
    }

    #[test]
    fn test_missing_images_default_to_empty_list() {
        let mut row = Map::new();
        row.insert("_id".to_string(), json!(9));
        let value = with_category_and_images(row, &HashMap::new());
        assert_eq!(value["images"], json!([]));
    }
}
