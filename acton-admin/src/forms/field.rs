//! Form field types and input configuration
//!
//! Defines the input kinds an admin form supports and the constraints
//! checked when a submission is parsed.

use regex::Regex;

use crate::routing::humanize;

/// Field attribute flags grouped for better ergonomics
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldFlags {
    /// Whether field is required
    pub required: bool,
    /// Whether field is disabled (not submitted, ignored when parsing)
    pub disabled: bool,
    /// Whether field is read-only (ignored when parsing)
    pub readonly: bool,
    /// Autofocus this field
    pub autofocus: bool,
}

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Text input (default)
    #[default]
    Text,
    /// Email input, checked with `validator`
    Email,
    /// Password input (masked)
    Password,
    /// Number input, parsed into a JSON number
    Number,
    /// Telephone input
    Tel,
    /// URL input, checked with `validator`
    Url,
    /// Date input (`YYYY-MM-DD`)
    Date,
    /// Time input (`HH:MM`)
    Time,
    /// Date and time input (`YYYY-MM-DDTHH:MM`)
    DateTimeLocal,
    /// Color picker
    Color,
    /// Hidden input
    Hidden,
}

impl InputType {
    /// Get the HTML type attribute value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTimeLocal => "datetime-local",
            Self::Color => "color",
            Self::Hidden => "hidden",
        }
    }

    /// Whether submitted values are kept as free text
    ///
    /// Empty optional text stays an empty string; other inputs turn it
    /// into `null`.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Email | Self::Password | Self::Tel | Self::Url | Self::Hidden
        )
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
    /// Whether this option is disabled
    pub disabled: bool,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Create a disabled option (useful for placeholder)
    #[must_use]
    pub fn disabled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: true,
        }
    }
}

/// Kind of form field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Standard input field
    Input(InputType),
    /// Textarea for multi-line text
    Textarea {
        /// Number of visible text lines
        rows: Option<u32>,
    },
    /// Select dropdown
    Select {
        /// Available options
        options: Vec<SelectOption>,
    },
    /// Checkbox, submitted as a boolean
    Checkbox,
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::Input(InputType::default())
    }
}

/// Regex constraint of a field
///
/// Matches the whole value, like the HTML `pattern` attribute.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    /// Pattern as written, rendered into the `pattern` attribute
    pub source: String,
    compiled: Result<Regex, String>,
}

impl FieldPattern {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Regex::new(&format!("^(?:{source})$")).map_err(|e| e.to_string()),
        }
    }

    /// Whether `value` matches; an invalid pattern matches nothing
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.as_ref().is_ok_and(|regex| regex.is_match(value))
    }

    /// Compilation error, if the pattern is invalid
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }
}

/// A form field with all its attributes
///
/// # Example
///
/// ```rust
/// use acton_admin::forms::{FormField, InputType};
///
/// let field = FormField::input("label", InputType::Text)
///     .required()
///     .max_length(40)
///     .help("Shown in lists");
/// assert_eq!(field.label.as_deref(), Some("Label"));
/// ```
#[derive(Debug, Clone)]
pub struct FormField {
    /// Field name (used for form submission and as the record key)
    pub name: String,
    /// Field kind (input, textarea, select, checkbox)
    pub kind: FieldKind,
    /// Label text
    pub label: Option<String>,
    /// Placeholder text
    pub placeholder: Option<String>,
    /// Current value
    pub value: Option<String>,
    /// Field attribute flags (required, disabled, readonly, autofocus)
    pub flags: FieldFlags,
    /// Minimum length for text inputs
    pub min_length: Option<usize>,
    /// Maximum length for text inputs
    pub max_length: Option<usize>,
    /// Minimum value for number inputs
    pub min: Option<f64>,
    /// Maximum value for number inputs
    pub max: Option<f64>,
    /// Step value for number inputs
    pub step: Option<String>,
    /// Pattern for validation (regex)
    pub pattern: Option<FieldPattern>,
    /// CSS class(es)
    pub class: Option<String>,
    /// Help text shown below the field
    pub help_text: Option<String>,
}

impl FormField {
    /// Create an input field
    #[must_use]
    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::new(name, FieldKind::Input(input_type))
    }

    /// Create a text input
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Text)
    }

    /// Create a number input
    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Number)
    }

    /// Create a textarea
    #[must_use]
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea { rows: None })
    }

    /// Create a select dropdown
    #[must_use]
    pub fn select(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Select { options: Vec::new() })
    }

    /// Create a checkbox
    #[must_use]
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: Some(humanize(&name)),
            name,
            kind,
            placeholder: None,
            value: None,
            flags: FieldFlags::default(),
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            step: None,
            pattern: None,
            class: None,
            help_text: None,
        }
    }

    /// Set the label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the placeholder
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the current value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.flags.required = true;
        self
    }

    /// Mark as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.flags.disabled = true;
        self
    }

    /// Mark as read-only
    #[must_use]
    pub const fn readonly(mut self) -> Self {
        self.flags.readonly = true;
        self
    }

    /// Autofocus this field
    #[must_use]
    pub const fn autofocus(mut self) -> Self {
        self.flags.autofocus = true;
        self
    }

    /// Minimum length in characters
    #[must_use]
    pub const fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Maximum length in characters
    #[must_use]
    pub const fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Minimum numeric value
    #[must_use]
    pub const fn min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self
    }

    /// Maximum numeric value
    #[must_use]
    pub const fn max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self
    }

    /// Step of a number input (`"any"` allows decimals in browsers)
    #[must_use]
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Regex the whole value must match
    #[must_use]
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(FieldPattern::new(pattern));
        self
    }

    /// Add a select option
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        if let FieldKind::Select { options } = &mut self.kind {
            options.push(SelectOption::new(value, label));
        }
        self
    }

    /// Add several select options from `(value, label)` pairs
    #[must_use]
    pub fn options<I, V, L>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        pairs
            .into_iter()
            .fold(self, |field, (value, label)| field.option(value, label))
    }

    /// Visible rows of a textarea
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        if let FieldKind::Textarea { rows: current } = &mut self.kind {
            *current = Some(rows);
        }
        self
    }

    /// Set CSS class(es)
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Help text shown below the field
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Element id, derived from the name
    #[must_use]
    pub fn effective_id(&self) -> String {
        format!("field-{}", self.name.replace('.', "-"))
    }

    /// Whether submissions for this field are ignored
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.flags.readonly || self.flags.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_as_str() {
        assert_eq!(InputType::Text.as_str(), "text");
        assert_eq!(InputType::DateTimeLocal.as_str(), "datetime-local");
        assert_eq!(InputType::Email.to_string(), "email");
    }

    #[test]
    fn test_field_builders() {
        let field = FormField::text("first_name")
            .required()
            .min_length(2)
            .placeholder("Ada");
        assert_eq!(field.label.as_deref(), Some("First name"));
        assert!(field.flags.required);
        assert_eq!(field.min_length, Some(2));
        assert_eq!(field.effective_id(), "field-first_name");
    }

    #[test]
    fn test_select_options() {
        let field = FormField::select("status").options([("draft", "Draft"), ("live", "Live")]);
        let FieldKind::Select { options } = &field.kind else {
            panic!("expected a select");
        };
        assert_eq!(options.len(), 2);
        assert_eq!(options[1], SelectOption::new("live", "Live"));
    }

    #[test]
    fn test_option_ignored_for_non_select() {
        let field = FormField::text("label").option("a", "A");
        assert!(matches!(field.kind, FieldKind::Input(InputType::Text)));
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let field = FormField::text("code").pattern("[A-Z]{3}");
        let pattern = field.pattern.unwrap();
        assert!(pattern.is_match("ABC"));
        assert!(!pattern.is_match("ABCD"));
        assert!(pattern.error().is_none());

        let broken = FormField::text("code").pattern("(").pattern.unwrap();
        assert!(broken.error().is_some());
        assert!(!broken.is_match("("));
    }
}
