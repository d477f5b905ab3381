//! Shared connection provider.
//!
//! One `Database` is constructed by the process entry point and passed by
//! reference to every query site; it owns the single shared pool for the
//! process lifetime. There is no health check or reconnect path after the
//! initial success: a pool that goes stale surfaces as an execution error on
//! the next query, and the caller decides what to do with it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::executor;
use crate::db::params::SqlValue;
use crate::error::{DbError, DbResult};

/// Owner of the shared PostgreSQL pool.
pub struct Database {
    pool: PgPool,
    closed: AtomicBool,
}

impl Database {
    /// Establish the shared pool, retrying with fixed backoff.
    ///
    /// Credentials are checked before any network activity; a missing pair
    /// is a `Configuration` error. Establishment failures are retried up to
    /// the configured attempt count with the configured delay in between;
    /// exhaustion propagates the last driver error as `Connection`.
    pub async fn connect(config: &Config) -> DbResult<Self> {
        config.validate()?;

        let attempts = config.connect_attempts.max(1);
        let pool = retry_fixed(attempts, config.retry_delay(), || {
            PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout_duration())
                .connect_with(config.connect_options())
        })
        .await
        .map_err(|e| DbError::connection(e.to_string(), attempts))?;

        info!(
            server = %config.server,
            database = %config.database,
            "Connected to PostgreSQL"
        );

        Ok(Self {
            pool,
            closed: AtomicBool::new(false),
        })
    }

    /// Run a statement and return its rows; a query matching nothing yields
    /// an empty vec, never an error.
    pub async fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Vec<Map<String, Value>>> {
        executor::fetch_rows(&self.pool, sql, params).await
    }

    /// Run a statement and return the number of rows it affected.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
        executor::execute(&self.pool, sql, params).await
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool. Safe to call from shutdown paths more than once;
    /// only the first call does the work.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.pool.close().await;
        info!("Database pool closed");
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Run `op` up to `attempts` times with a fixed `delay` between attempts,
/// returning the first success or the last error.
async fn retry_fixed<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    error = %e,
                    "Connection attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_attempt() {
        let config = Config::default_config();
        let err = Database::connect(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Configuration { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_runs_exactly_n_attempts() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), &str> = retry_fixed(3, Duration::from_millis(500), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("refused") }
        })
        .await;

        assert_eq!(result.unwrap_err(), "refused");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two sleeps between three attempts, none after the last.
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_on_first_success() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, &str> = retry_fixed(5, Duration::from_millis(500), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 3 { Err("refused") } else { Ok(n) } }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_has_no_delay() {
        let start = tokio::time::Instant::now();
        let result: Result<(), &str> =
            retry_fixed(1, Duration::from_millis(500), || async { Err("refused") }).await;
        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
