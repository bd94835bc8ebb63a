//! Form schemas
//!
//! A [`FormSchema`] is the declarative description of a create or edit
//! form. It renders the form, and it turns a submission into a typed
//! [`Record`] or a set of [`ValidationErrors`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use validator::{ValidateEmail, ValidateUrl};

use super::builder::FormBuilder;
use super::error::ValidationErrors;
use super::field::{FieldKind, FormField, InputType};
use super::render::is_checked_value;
use crate::error::AdminError;
use crate::repository::{lookup, value_to_text, Record};

/// Values shown in a form, keyed by field name
pub type FormValues = HashMap<String, String>;

/// Cross-field validation run after every field parsed successfully
pub type FormValidator = Arc<dyn Fn(&Record) -> Result<(), ValidationErrors> + Send + Sync>;

/// Ordered set of form fields plus form-level validators
///
/// # Example
///
/// ```rust
/// use acton_admin::forms::{FormField, FormSchema};
///
/// let schema = FormSchema::new()
///     .field(FormField::text("label").required())
///     .field(FormField::number("rank").min(0.0));
///
/// let submitted = vec![
///     ("label".to_string(), "Item 1".to_string()),
///     ("rank".to_string(), "3".to_string()),
/// ];
/// let record = schema.parse(&submitted).unwrap();
/// assert_eq!(record["rank"], 3);
/// ```
#[derive(Clone, Default)]
pub struct FormSchema {
    fields: Vec<FormField>,
    validators: Vec<FormValidator>,
}

impl fmt::Debug for FormSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSchema")
            .field("fields", &self.fields)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl FormSchema {
    /// Create an empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a form-level validator
    #[must_use]
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Record) -> Result<(), ValidationErrors> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Fields in display order
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check that the schema itself is usable
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] for duplicate field names or
    /// invalid patterns.
    pub fn check(&self) -> Result<(), AdminError> {
        for (index, field) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(AdminError::Configuration(format!(
                    "form field '{}' is declared twice",
                    field.name
                )));
            }
            if let Some(error) = field.pattern.as_ref().and_then(|p| p.error()) {
                return Err(AdminError::Configuration(format!(
                    "form field '{}' has an invalid pattern: {error}",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Validate and coerce submitted pairs into a record
    ///
    /// For repeated names the last value wins. Undeclared, read-only and
    /// disabled fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns every field error found, or the errors of the form-level
    /// validators when all fields are valid.
    pub fn parse(&self, submitted: &[(String, String)]) -> Result<Record, ValidationErrors> {
        let values = Self::submitted_values(submitted);
        let mut record = Record::new();
        let mut errors = ValidationErrors::new();

        for field in self.fields.iter().filter(|field| !field.is_ignored()) {
            let raw = values.get(field.name.as_str()).copied();
            match parse_field(field, raw) {
                Ok(value) => {
                    record.insert(field.name.clone(), value);
                }
                Err(message) => errors.add(field.name.clone(), message),
            }
        }

        if errors.has_errors() {
            return Err(errors);
        }

        for validator in &self.validators {
            if let Err(validator_errors) = validator(&record) {
                errors.merge(&validator_errors);
            }
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(record)
        }
    }

    /// Form values of an existing item
    #[must_use]
    pub fn initial_values(&self, item: &Value) -> FormValues {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = lookup(item, &field.name)?;
                let text = match (&field.kind, value) {
                    (FieldKind::Checkbox, Value::Bool(flag)) => flag.to_string(),
                    (FieldKind::Input(InputType::DateTimeLocal), Value::String(text)) => {
                        datetime_local_value(text)
                    }
                    _ => value_to_text(value),
                };
                Some((field.name.clone(), text))
            })
            .collect()
    }

    /// Form values of a submission, for re-rendering
    #[must_use]
    pub fn submitted_form_values(submitted: &[(String, String)]) -> FormValues {
        Self::submitted_values(submitted)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Builder rendering this schema with `values` and `errors`
    #[must_use]
    pub fn to_builder<'a>(
        &self,
        action: impl Into<String>,
        values: &FormValues,
        errors: &'a ValidationErrors,
    ) -> FormBuilder<'a> {
        self.fields
            .iter()
            .fold(FormBuilder::new(action, "post"), |form, field| {
                let mut field = field.clone();
                if let Some(value) = values.get(&field.name) {
                    field.value = Some(value.clone());
                }
                form.field(field)
            })
            .errors(errors)
    }

    fn submitted_values(submitted: &[(String, String)]) -> HashMap<&str, &str> {
        submitted
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

const REQUIRED: &str = "This field is required.";

fn parse_field(field: &FormField, raw: Option<&str>) -> Result<Value, String> {
    match &field.kind {
        FieldKind::Checkbox => {
            let checked = raw.is_some_and(is_checked_value);
            if field.flags.required && !checked {
                return Err(REQUIRED.into());
            }
            Ok(Value::Bool(checked))
        }
        FieldKind::Select { options } => {
            let raw = raw.unwrap_or_default();
            if raw.is_empty() {
                return empty_value(field, false);
            }
            if options.iter().any(|o| o.value == raw && !o.disabled) {
                Ok(Value::String(raw.to_string()))
            } else {
                Err(format!("Select a valid choice. '{raw}' is not one of the available choices."))
            }
        }
        FieldKind::Textarea { .. } => parse_text(field, raw.unwrap_or_default()),
        FieldKind::Input(InputType::Number) => parse_number(field, raw.unwrap_or_default().trim()),
        FieldKind::Input(input_type) if input_type.is_text() => {
            parse_text(field, raw.unwrap_or_default())
        }
        FieldKind::Input(input_type) => {
            let raw = raw.unwrap_or_default().trim();
            if raw.is_empty() {
                return empty_value(field, false);
            }
            check_temporal(*input_type, raw)?;
            Ok(Value::String(raw.to_string()))
        }
    }
}

fn empty_value(field: &FormField, text: bool) -> Result<Value, String> {
    if field.flags.required {
        Err(REQUIRED.into())
    } else if text {
        Ok(Value::String(String::new()))
    } else {
        Ok(Value::Null)
    }
}

fn parse_text(field: &FormField, raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return empty_value(field, true);
    }

    let length = raw.chars().count();
    if let Some(min) = field.min_length {
        if length < min {
            return Err(format!("Ensure this value has at least {min} characters."));
        }
    }
    if let Some(max) = field.max_length {
        if length > max {
            return Err(format!("Ensure this value has at most {max} characters."));
        }
    }

    match field.kind {
        FieldKind::Input(InputType::Email) if !raw.validate_email() => {
            return Err("Enter a valid email address.".into());
        }
        FieldKind::Input(InputType::Url) if !raw.validate_url() => {
            return Err("Enter a valid URL.".into());
        }
        _ => {}
    }

    if let Some(pattern) = &field.pattern {
        if !pattern.is_match(raw) {
            return Err("Enter a value in the expected format.".into());
        }
    }

    Ok(Value::String(raw.to_string()))
}

fn parse_number(field: &FormField, raw: &str) -> Result<Value, String> {
    if raw.is_empty() {
        return empty_value(field, false);
    }

    #[allow(clippy::cast_precision_loss)]
    let (number, as_float) = if let Ok(integer) = raw.parse::<i64>() {
        (Number::from(integer), integer as f64)
    } else {
        let float = raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| "Enter a number.".to_string())?;
        let number = Number::from_f64(float).ok_or_else(|| "Enter a number.".to_string())?;
        (number, float)
    };

    if let Some(min) = field.min {
        if as_float < min {
            return Err(format!("Ensure this value is greater than or equal to {min}."));
        }
    }
    if let Some(max) = field.max {
        if as_float > max {
            return Err(format!("Ensure this value is less than or equal to {max}."));
        }
    }

    Ok(Value::Number(number))
}

fn check_temporal(input_type: InputType, raw: &str) -> Result<(), String> {
    let valid = match input_type {
        InputType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok(),
        InputType::Time => ["%H:%M", "%H:%M:%S"]
            .iter()
            .any(|layout| NaiveTime::parse_from_str(raw, layout).is_ok()),
        InputType::DateTimeLocal => ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .any(|layout| NaiveDateTime::parse_from_str(raw, layout).is_ok()),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("Enter a valid {}.", input_type.as_str().replace('-', " ")))
    }
}

/// `datetime-local` inputs only accept `YYYY-MM-DDTHH:MM[:SS]`
fn datetime_local_value(text: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_or_else(
            |_| text.to_string(),
            |parsed| parsed.format("%Y-%m-%dT%H:%M:%S").to_string(),
        )
}
