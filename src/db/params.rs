//! Typed parameter values and positional binding.
//!
//! Each value carries its column type as a variant tag, so binding never
//! inspects runtime types: a boolean can never be mistaken for a number and
//! a missing value is an explicit `Null`, bound as a NULL of text type.

use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::postgres::PgArguments;

/// A value bound to one positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL, bound with a text column type
    Null,
    /// BOOLEAN
    Bool(bool),
    /// BIGINT
    Int(i64),
    /// DOUBLE PRECISION
    Float(f64),
    /// TEXT
    Text(String),
}

impl SqlValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coerce any displayable value to its text representation.
    pub fn text(value: impl ToString) -> Self {
        Self::Text(value.to_string())
    }

    /// The type name of this value for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Missing values bind as the typed null.
impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

/// Bind a value to the next positional slot of a query.
pub(crate) fn bind_value<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    value: &'q SqlValue,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_pick_the_declared_type() {
        assert_eq!(SqlValue::from(42i64), SqlValue::Int(42));
        assert_eq!(SqlValue::from(3.14), SqlValue::Float(3.14));
        assert_eq!(SqlValue::from(true), SqlValue::Bool(true));
        assert_eq!(SqlValue::from("abc"), SqlValue::Text("abc".to_string()));
    }

    #[test]
    fn test_missing_value_becomes_null() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(None::<&str>), SqlValue::Null);
        assert_eq!(
            SqlValue::from(Some("x")),
            SqlValue::Text("x".to_string())
        );
        assert!(SqlValue::Null.is_null());
    }

    #[test]
    fn test_bool_is_not_numeric() {
        // The tag makes the precedence structural: a bool arrives as Bool
        // no matter what integer it would coerce to.
        let v: SqlValue = false.into();
        assert_eq!(v.type_name(), "bool");
        assert_ne!(v, SqlValue::Int(0));
    }

    #[test]
    fn test_text_coercion_for_other_types() {
        assert_eq!(
            SqlValue::text(uuid::Uuid::nil()),
            SqlValue::Text("00000000-0000-0000-0000-000000000000".to_string())
        );
        assert_eq!(SqlValue::text(7u8), SqlValue::Text("7".to_string()));
    }

    #[test]
    fn test_serde_shapes() {
        assert_eq!(serde_json::to_value(SqlValue::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(SqlValue::Int(5)).unwrap(),
            serde_json::json!(5)
        );
        let parsed: SqlValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(parsed, SqlValue::Text("x".to_string()));
    }
}
