//! Statement execution pipeline.
//!
//! Every statement follows the same path: validate the placeholder/parameter
//! arity, translate markers to PostgreSQL syntax, bind values positionally
//! ($1 ← params[0]), execute against the shared pool, and decode rows to
//! JSON maps. Failures propagate immediately; there is no retry here.

use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::debug;

use crate::db::params::{SqlValue, bind_value};
use crate::db::row::row_to_map;
use crate::db::translate::{placeholder_count, to_pg_params};
use crate::error::{DbError, DbResult};

/// Check the template's marker count against the supplied values.
///
/// A purely positional substitution would silently misalign on mismatch, so
/// both directions fail up front.
fn check_arity(sql: &str, params: &[SqlValue]) -> DbResult<()> {
    let placeholders = placeholder_count(sql);
    if placeholders != params.len() {
        return Err(DbError::PlaceholderMismatch {
            placeholders,
            supplied: params.len(),
        });
    }
    Ok(())
}

/// Run a statement and return its rows (empty when none match).
pub(crate) async fn fetch_rows(
    pool: &PgPool,
    sql: &str,
    params: &[SqlValue],
) -> DbResult<Vec<Map<String, Value>>> {
    check_arity(sql, params)?;
    let translated = to_pg_params(sql);
    debug!(sql = %translated, params = params.len(), "Executing query");

    // Without parameters, skip the prepared-statement path so that
    // statements the extended protocol rejects still run.
    let rows = if params.is_empty() {
        use sqlx::Executor;
        pool.fetch_all(translated.as_str()).await?
    } else {
        let mut query = sqlx::query(&translated);
        for param in params {
            query = bind_value(query, param);
        }
        query.fetch_all(pool).await?
    };

    Ok(rows.iter().map(row_to_map).collect())
}

/// Run a statement and return the number of rows it affected.
pub(crate) async fn execute(pool: &PgPool, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
    check_arity(sql, params)?;
    let translated = to_pg_params(sql);
    debug!(sql = %translated, params = params.len(), "Executing statement");

    let result = if params.is_empty() {
        use sqlx::Executor;
        pool.execute(translated.as_str()).await?
    } else {
        let mut query = sqlx::query(&translated);
        for param in params {
            query = bind_value(query, param);
        }
        query.execute(pool).await?
    };

    Ok(result.rows_affected())
}
