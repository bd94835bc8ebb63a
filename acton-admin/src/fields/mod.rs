//! Display fields
//!
//! A [`Field`] describes one column of a list table or one row of a detail
//! page: which key of the item to read, how to label it and how to turn the
//! value into text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::{self, Write};
use std::sync::Arc;

use crate::repository::{lookup, value_to_text};
use crate::routing::humanize;

/// Formatting callback for [`FieldFormat::Custom`]
pub type FormatFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// How a field value is turned into text
#[derive(Clone, Default)]
pub enum FieldFormat {
    /// Strings as-is, other values in their JSON form, `null` as empty
    #[default]
    Auto,
    /// `Yes` / `No` based on the value's truthiness
    Boolean,
    /// Timestamps formatted with a `chrono` pattern
    DateTime(String),
    /// Caller supplied formatting
    Custom(FormatFn),
}

impl fmt::Debug for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Boolean => f.write_str("Boolean"),
            Self::DateTime(pattern) => f.debug_tuple("DateTime").field(pattern).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A displayed field
///
/// # Example
///
/// ```rust
/// use acton_admin::fields::Field;
/// use serde_json::json;
///
/// let field = Field::new("author.name").label("Written by").sortable();
/// assert_eq!(field.render(&json!({"author": {"name": "Ada"}})), "Ada");
/// assert_eq!(Field::new("created_at").label, "Created at");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    /// Key in the item's JSON form; dots walk nested objects
    pub key: String,
    /// Column / row label
    pub label: String,
    /// Whether list pages can sort by this field
    pub sortable: bool,
    /// Whether detail pages show a copy button
    pub copyable: bool,
    /// Formatting rule
    pub format: FieldFormat,
}

impl Field {
    /// Create a field with a label derived from the key
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: humanize(&key),
            key,
            sortable: false,
            copyable: false,
            format: FieldFormat::Auto,
        }
    }

    /// Set the label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Allow sorting by this field
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Show a copy button on detail pages
    #[must_use]
    pub const fn copyable(mut self) -> Self {
        self.copyable = true;
        self
    }

    /// Render as `Yes` / `No`
    #[must_use]
    pub fn boolean(mut self) -> Self {
        self.format = FieldFormat::Boolean;
        self
    }

    /// Render timestamps with a `chrono` format pattern
    #[must_use]
    pub fn datetime(mut self, pattern: impl Into<String>) -> Self {
        self.format = FieldFormat::DateTime(pattern.into());
        self
    }

    /// Render with a custom function
    #[must_use]
    pub fn format_with<F>(mut self, format: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.format = FieldFormat::Custom(Arc::new(format));
        self
    }

    /// Raw value of this field in `item`
    #[must_use]
    pub fn value<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        lookup(item, &self.key)
    }

    /// Text shown for this field of `item`
    #[must_use]
    pub fn render(&self, item: &Value) -> String {
        let value = self.value(item).unwrap_or(&Value::Null);
        match &self.format {
            FieldFormat::Auto => value_to_text(value),
            FieldFormat::Boolean => match value {
                Value::Null => String::new(),
                other if is_truthy(other) => "Yes".to_string(),
                _ => "No".to_string(),
            },
            FieldFormat::DateTime(pattern) => format_datetime(value, pattern),
            FieldFormat::Custom(format) => format(value),
        }
    }
}

impl From<&str> for Field {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Field {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<(&str, &str)> for Field {
    fn from((key, label): (&str, &str)) -> Self {
        Self::new(key).label(label)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && !matches!(text.as_str(), "false" | "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn format_datetime(value: &Value, pattern: &str) -> String {
    let Value::String(text) = value else {
        return value_to_text(value);
    };

    let parsed = DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.naive_local())
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    // An invalid pattern makes the formatter fail instead of producing text
    let mut formatted = String::new();
    match parsed {
        Some(parsed) if write!(formatted, "{}", parsed.format(pattern)).is_ok() => formatted,
        _ => text.clone(),
    }
}
