//! Custom scalar implementations.
//!
//! A custom scalar is described by a [`CustomScalar`] implementation and is
//! registered on the schema parser. Before rendering, each registered scalar is
//! materialized into a [`ScalarResolver`], which is what the executable schema
//! uses to validate inputs and serialize outputs.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Name of the built-in date scalar.
pub const DATE_SCALAR: &str = "Date";

/// Name of the built-in JSON scalar.
pub const JSON_SCALAR: &str = "JSON";

/// Behavior of a custom scalar type.
///
/// - `parse_literal` coerces a value written in a query document.
/// - `parse_value` coerces a value supplied to a resolver argument.
/// - `serialize` converts a resolved value for output.
pub trait CustomScalar: Send + Sync + fmt::Debug {
    /// Scalar type name as it appears in the schema.
    fn name(&self) -> &str;

    /// Optional description for introspection.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Coerces a query literal.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the literal is invalid.
    fn parse_literal(&self, value: &Value) -> Result<Value, String>;

    /// Coerces an argument value.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the value is invalid.
    fn parse_value(&self, value: &Value) -> Result<Value, String>;

    /// Serializes an output value.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the value cannot be represented.
    fn serialize(&self, value: &Value) -> Result<Value, String>;
}

/// Returns the scalars every schema starts with: `Date`, then `JSON`.
#[must_use]
pub fn default_scalars() -> Vec<Arc<dyn CustomScalar>> {
    vec![Arc::new(DateScalar), Arc::new(JsonScalar)]
}

// =============================================================================
// Date
// =============================================================================

/// Date scalar.
///
/// Accepts RFC 3339 date-times, `YYYY-MM-DD` dates, and epoch milliseconds.
/// Date-times and epoch values are emitted as RFC 3339 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateScalar;

impl DateScalar {
    fn parse_str(s: &str) -> Result<String, String> {
        if let Ok(datetime) = OffsetDateTime::parse(s, &Rfc3339) {
            return datetime.format(&Rfc3339).map_err(|e| e.to_string());
        }
        let date_format = format_description!("[year]-[month]-[day]");
        if let Ok(date) = Date::parse(s, date_format) {
            return date.format(date_format).map_err(|e| e.to_string());
        }
        Err(format!(
            "Invalid date: '{s}'. Expected an RFC 3339 date-time or YYYY-MM-DD"
        ))
    }

    fn from_epoch_millis(value: &Value) -> Result<String, String> {
        let millis = match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| format!("Invalid epoch milliseconds: {n}"))?,
            other => return Err(format!("Expected a date string or number, got {other}")),
        };
        let datetime = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map_err(|e| e.to_string())?;
        datetime.format(&Rfc3339).map_err(|e| e.to_string())
    }

    fn coerce_input(value: &Value) -> Result<Value, String> {
        match value {
            Value::String(s) => Self::parse_str(s).map(Value::String),
            other => Self::from_epoch_millis(other).map(Value::String),
        }
    }
}

impl CustomScalar for DateScalar {
    fn name(&self) -> &str {
        DATE_SCALAR
    }

    fn description(&self) -> Option<&str> {
        Some("A date or date-time, serialized as an RFC 3339 string")
    }

    fn parse_literal(&self, value: &Value) -> Result<Value, String> {
        Self::coerce_input(value)
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        Self::coerce_input(value)
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            // Stored strings may use any store-side date format.
            Value::String(_) => Ok(value.clone()),
            other => Self::from_epoch_millis(other).map(Value::String),
        }
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Arbitrary JSON value, passed through unchanged in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonScalar;

impl CustomScalar for JsonScalar {
    fn name(&self) -> &str {
        JSON_SCALAR
    }

    fn description(&self) -> Option<&str> {
        Some("Arbitrary JSON value")
    }

    fn parse_literal(&self, value: &Value) -> Result<Value, String> {
        Ok(value.clone())
    }

    fn parse_value(&self, value: &Value) -> Result<Value, String> {
        Ok(value.clone())
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        Ok(value.clone())
    }
}

// =============================================================================
// Materialized resolver
// =============================================================================

/// Resolver entry materialized from a registered scalar.
#[derive(Debug, Clone)]
pub struct ScalarResolver {
    scalar: Arc<dyn CustomScalar>,
}

impl ScalarResolver {
    /// Wraps a scalar.
    #[must_use]
    pub fn new(scalar: Arc<dyn CustomScalar>) -> Self {
        Self { scalar }
    }

    /// Scalar name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.scalar.name()
    }

    /// Scalar description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.scalar.description()
    }

    /// See [`CustomScalar::parse_literal`].
    ///
    /// # Errors
    ///
    /// Propagates the scalar's error message.
    pub fn parse_literal(&self, value: &Value) -> Result<Value, String> {
        self.scalar.parse_literal(value)
    }

    /// See [`CustomScalar::parse_value`].
    ///
    /// # Errors
    ///
    /// Propagates the scalar's error message.
    pub fn parse_value(&self, value: &Value) -> Result<Value, String> {
        self.scalar.parse_value(value)
    }

    /// See [`CustomScalar::serialize`].
    ///
    /// # Errors
    ///
    /// Propagates the scalar's error message.
    pub fn serialize(&self, value: &Value) -> Result<Value, String> {
        self.scalar.serialize(value)
    }
}
