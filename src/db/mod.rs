//! SQL adaptation shim.
//!
//! The thin layer between the query-composition functions and the PostgreSQL
//! driver:
//! - Placeholder translation (`?` markers to numbered parameters)
//! - Typed parameter values and positional binding
//! - Shared pool lifecycle (connect with retry, idempotent close)
//! - The translate/validate/bind/execute pipeline
//! - Row decoding into JSON maps

pub(crate) mod executor;
pub mod params;
pub mod provider;
pub(crate) mod row;
pub mod translate;

pub use params::SqlValue;
pub use provider::Database;
pub use translate::{in_list, placeholder_count, to_pg_params};
