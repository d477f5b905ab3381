//! Layette relational data layer.
//!
//! The adaptation layer between the marketplace's route handlers and the
//! PostgreSQL driver: placeholder translation, typed parameter binding, a
//! shared connection provider with startup retry, and the query-composition
//! functions the routes call. Route handlers own user-visible behavior;
//! this crate only composes, executes, and propagates.

pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod store;

pub use config::Config;
pub use db::{Database, SqlValue};
pub use error::{DbError, DbResult};
