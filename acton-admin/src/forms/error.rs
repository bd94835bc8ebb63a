//! Form validation errors
//!
//! Errors are collected per field while a submission is parsed and shown
//! next to the offending inputs when the form is re-rendered. Problems that
//! concern the record as a whole, such as a duplicate primary key reported
//! by the repository, go under [`NON_FIELD_ERRORS`] and appear in the
//! summary above the form.

use std::collections::BTreeMap;
use std::fmt;

/// Key for errors that concern the form as a whole
pub const NON_FIELD_ERRORS: &str = "__all__";

/// One message shown next to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create an error with `message`
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors of one submission, keyed by form field name
///
/// # Examples
///
/// ```rust
/// use acton_admin::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("slug", "This field is required.");
/// errors.add_form_error("An item with this slug already exists.");
///
/// assert!(errors.has_field_error("slug"));
/// assert_eq!(errors.form_errors().len(), 1);
/// assert_eq!(errors.count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// No errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.by_field
            .entry(field.into())
            .or_default()
            .push(FieldError::new(message));
    }

    /// Record a message for the whole form
    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// Whether anything was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.by_field.is_empty()
    }

    /// Whether `field` has at least one error
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    /// Errors of `field`, in the order they were added
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[FieldError] {
        self.by_field.get(field).map_or(&[], Vec::as_slice)
    }

    /// Errors of the whole form
    #[must_use]
    pub fn form_errors(&self) -> &[FieldError] {
        self.for_field(NON_FIELD_ERRORS)
    }

    /// Number of messages across all fields
    #[must_use]
    pub fn count(&self) -> usize {
        self.by_field.values().map(Vec::len).sum()
    }

    /// Append every error of `other`
    pub fn merge(&mut self, other: &Self) {
        for (field, messages) in &other.by_field {
            self.by_field
                .entry(field.clone())
                .or_default()
                .extend_from_slice(messages);
        }
    }

    /// Fields and their errors, ordered by field name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.by_field
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (field, m)));
        if let Some((field, message)) = parts.next() {
            write!(f, "{field}: {message}")?;
        }
        for (field, message) in parts {
            write!(f, "; {field}: {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(!errors.has_errors());

        errors.add("label", "This field is required.");
        errors.add("label", "Ensure this value has at most 40 characters.");

        assert!(errors.has_field_error("label"));
        assert!(!errors.has_field_error("rank"));
        assert_eq!(errors.for_field("label").len(), 2);
        assert!(errors.for_field("rank").is_empty());
        assert_eq!(errors.count(), 2);
    }

    #[test]
    fn test_merge_keeps_form_errors_apart() {
        let mut errors = ValidationErrors::new();
        errors.add("label", "This field is required.");

        let mut other = ValidationErrors::new();
        other.add("rank", "Enter a number.");
        other.add_form_error("Ranks must be unique.");

        errors.merge(&other);

        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, [NON_FIELD_ERRORS, "label", "rank"]);
        assert_eq!(errors.form_errors()[0].message, "Ranks must be unique.");
        assert_eq!(errors.count(), 3);
    }

    #[test]
    fn test_display() {
        let mut errors = ValidationErrors::new();
        errors.add("label", "is required");
        errors.add("rank", "must be at least 1");
        assert_eq!(errors.to_string(), "label: is required; rank: must be at least 1");
        assert_eq!(ValidationErrors::new().to_string(), "");
    }
}
