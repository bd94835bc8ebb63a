//! Form builder API with fluent interface
//!
//! Collects the form-level attributes and the fields to render. Admin
//! forms are usually produced by [`FormSchema::to_builder`], which fills in
//! values and errors.
//!
//! [`FormSchema::to_builder`]: super::FormSchema::to_builder

use super::error::ValidationErrors;
use super::field::FormField;
use super::render::FormRenderer;

/// Builder for an HTML form
///
/// # Examples
///
/// ```rust
/// use acton_admin::forms::{FormBuilder, FormField};
///
/// let html = FormBuilder::new("/admin/post/create", "POST")
///     .field(FormField::text("title").required())
///     .submit("Save")
///     .build();
///
/// assert!(html.contains(r#"name="title""#));
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder<'a> {
    /// Form action URL
    pub action: String,
    /// HTTP method
    pub method: String,
    /// Form ID
    pub id: Option<String>,
    /// CSS class(es)
    pub class: Option<String>,
    /// Fields in display order
    pub fields: Vec<FormField>,
    /// Validation errors shown next to the fields
    pub errors: Option<&'a ValidationErrors>,
    /// Submit button text
    pub submit_text: Option<String>,
    /// Submit button class
    pub submit_class: Option<String>,
    /// Skip browser-side validation
    pub novalidate: bool,
    /// Custom attributes
    pub custom_attrs: Vec<(String, String)>,
}

impl<'a> FormBuilder<'a> {
    /// Create a new form builder
    #[must_use]
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            id: None,
            class: None,
            fields: Vec::new(),
            errors: None,
            submit_text: None,
            submit_class: None,
            novalidate: false,
            custom_attrs: Vec::new(),
        }
    }

    /// Set form ID
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set form CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set validation errors to display
    #[must_use]
    pub const fn errors(mut self, errors: &'a ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Add submit button
    #[must_use]
    pub fn submit(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Set submit button class
    #[must_use]
    pub fn submit_class(mut self, class: impl Into<String>) -> Self {
        self.submit_class = Some(class.into());
        self
    }

    /// Disable browser-side validation
    #[must_use]
    pub const fn novalidate(mut self) -> Self {
        self.novalidate = true;
        self
    }

    /// Add custom attribute to form
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Render the form to HTML
    #[must_use]
    pub fn build(&self) -> String {
        FormRenderer::render(self)
    }
}
