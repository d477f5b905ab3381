//! Layette data-layer bootstrap.
//!
//! Connects to PostgreSQL with the configured retry budget, probes the
//! connection, and ensures the household schema. Route servers link the
//! library crate; this binary is the ops-side readiness step run before
//! them.

use clap::Parser;
use layette_db::config::Config;
use layette_db::db::Database;
use layette_db::schema;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    info!(
        server = %config.server,
        database = %config.database,
        "Starting layette-db bootstrap v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db = tokio::select! {
        connected = Database::connect(&config) => match connected {
            Ok(db) => db,
            Err(e) => {
                error!(error = %e, "Database connection failed");
                return Err(e.into());
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted before the connection was established");
            return Ok(());
        }
    };

    let result = bootstrap(&db).await;

    // Close exactly once whether bootstrap succeeded or not.
    db.close().await;

    if let Err(e) = result {
        error!(error = %e, "Bootstrap failed");
        return Err(e.into());
    }

    info!("Bootstrap complete");
    Ok(())
}

async fn bootstrap(db: &Database) -> layette_db::DbResult<()> {
    db.query("SELECT 1 AS ok", &[]).await?;
    schema::ensure_schema(db).await?;
    Ok(())
}
