//! Category queries.

use serde_json::{Value, json};

use crate::db::{Database, SqlValue};
use crate::error::DbResult;
use super::{Page, Pagination, scalar_i64};
use crate::store::products;

const CATEGORY_COLUMNS: &str = "c.category_id AS _id, c.name AS name, c.slug AS slug, \
     c.description AS description, c.icon AS icon, \
     c.display_order AS \"displayOrder\", c.is_active AS \"isActive\"";

/// Active categories in display order, each with its active-product count.
pub async fn list(db: &Database) -> DbResult<Vec<Value>> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS}, \
                COALESCE(pc.product_count, 0) AS \"productCount\" \
         FROM categories c \
         LEFT JOIN ( \
             SELECT category_id, COUNT(*) AS product_count \
             FROM products \
             WHERE is_active = TRUE \
             GROUP BY category_id \
         ) pc ON pc.category_id = c.category_id \
         WHERE c.is_active = TRUE \
         ORDER BY c.display_order ASC"
    );
    let rows = db.query(&sql, &[]).await?;
    Ok(rows.into_iter().map(Value::Object).collect())
}

/// One active category by id with its active-product count, or `None`.
pub async fn by_id(db: &Database, id: i64) -> DbResult<Option<Value>> {
    let Some(mut category) = fetch_category(db, id).await? else {
        return Ok(None);
    };

    let count_rows = db
        .query(
            "SELECT COUNT(*) AS cnt FROM products WHERE is_active = TRUE AND category_id = ?",
            &[id.into()],
        )
        .await?;
    category.insert(
        "productCount".to_string(),
        json!(scalar_i64(&count_rows, "cnt")),
    );
    Ok(Some(Value::Object(category)))
}

/// A category's active products, paginated, with images and the category
/// row itself. `None` when the category does not exist.
pub async fn products_of(
    db: &Database,
    id: i64,
    page: &Page,
) -> DbResult<Option<(Value, Vec<Value>, Pagination)>> {
    let Some(category) = fetch_category(db, id).await? else {
        return Ok(None);
    };

    let sql = "SELECT p.product_id AS _id, p.name AS name, p.slug AS slug, \
                      p.description AS description, p.brand AS brand, p.price AS price, \
                      p.currency AS currency, p.stock AS stock, p.rating AS rating, \
                      p.is_active AS \"isActive\", p.is_featured AS \"isFeatured\" \
               FROM products p \
               WHERE p.is_active = TRUE AND p.category_id = ? \
               ORDER BY p.product_id DESC \
               LIMIT ? OFFSET ?";
    let rows = db
        .query(sql, &[id.into(), page.limit.into(), page.offset().into()])
        .await?;

    let ids: Vec<i64> = rows
        .iter()
        .filter_map(|row| row.get("_id").and_then(Value::as_i64))
        .collect();
    let images = products::images_for(db, &ids).await?;

    // The category is already in hand; nest it instead of re-joining.
    let nested = json!({
        "name": category.get("name").cloned().unwrap_or(Value::Null),
        "slug": category.get("slug").cloned().unwrap_or(Value::Null),
        "icon": category.get("icon").cloned().unwrap_or(Value::Null),
    });
    let data: Vec<Value> = rows
        .into_iter()
        .map(|mut row| {
            let product_id = row.get("_id").and_then(Value::as_i64).unwrap_or(0);
            let image_list = images.get(&product_id).cloned().unwrap_or_default();
            row.insert("images".to_string(), json!(image_list));
            row.insert("categoryId".to_string(), nested.clone());
            Value::Object(row)
        })
        .collect();

    let total_rows = db
        .query(
            "SELECT COUNT(*) AS total FROM products WHERE is_active = TRUE AND category_id = ?",
            &[id.into()],
        )
        .await?;
    let total = scalar_i64(&total_rows, "total");

    Ok(Some((
        Value::Object(category),
        data,
        Pagination::new(page, total),
    )))
}

async fn fetch_category(
    db: &Database,
    id: i64,
) -> DbResult<Option<serde_json::Map<String, Value>>> {
    let sql = format!(
        "SELECT {CATEGORY_COLUMNS} \
         FROM categories c \
         WHERE c.is_active = TRUE AND c.category_id = ?"
    );
    let rows = db.query(&sql, &[SqlValue::from(id)]).await?;
    Ok(rows.into_iter().next())
}
