//! HTML rendering of forms
//!
//! Produces the markup the admin templates embed verbatim, so every value
//! taken from a field, a stored item or a submission is escaped here.

use std::fmt::{Display, Write};

use super::builder::FormBuilder;
use super::error::{FieldError, ValidationErrors};
use super::field::{FieldKind, FormField, InputType};

/// CSS classes emitted by [`FormRenderer`]
#[derive(Debug, Clone)]
pub struct FormRenderOptions {
    /// Wrapper around a label, its control and its messages
    pub group_class: String,
    /// Labels
    pub label_class: String,
    /// Every control
    pub input_class: String,
    /// Error messages, field-level and in the summary
    pub error_class: String,
    /// Help text
    pub help_class: String,
    /// Submit button, unless the builder sets its own
    pub submit_class: String,
    /// Added to controls whose field has errors
    pub input_error_class: String,
}

impl Default for FormRenderOptions {
    fn default() -> Self {
        Self {
            group_class: "form-group".into(),
            label_class: "form-label".into(),
            input_class: "form-input".into(),
            error_class: "form-error".into(),
            help_class: "form-help".into(),
            submit_class: "button button-primary".into(),
            input_error_class: "form-input-error".into(),
        }
    }
}

/// Opening tag being written into the output
struct Tag<'h> {
    html: &'h mut String,
}

impl<'h> Tag<'h> {
    fn open(html: &'h mut String, indent: &str, name: &str) -> Self {
        let _ = write!(html, "{indent}<{name}");
        Self { html }
    }

    fn attr(self, name: &str, value: &str) -> Self {
        let _ = write!(self.html, r#" {name}="{}""#, escape_attr(value));
        self
    }

    fn attr_opt<T: Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.attr(name, &value.to_string()),
            None => self,
        }
    }

    fn flag(self, name: &str, on: bool) -> Self {
        if on {
            self.html.push(' ');
            self.html.push_str(name);
        }
        self
    }

    fn close(self) {
        self.html.push('>');
    }
}

/// Renders a [`FormBuilder`] to HTML
pub struct FormRenderer;

impl FormRenderer {
    /// Render with the default classes
    #[must_use]
    pub fn render(form: &FormBuilder<'_>) -> String {
        Self::render_with_options(form, &FormRenderOptions::default())
    }

    /// Render with the classes in `options`
    #[must_use]
    pub fn render_with_options(form: &FormBuilder<'_>, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(1024);

        let mut tag = Tag::open(&mut html, "", "form")
            .attr("action", &form.action)
            .attr("method", &form.method)
            .attr_opt("id", form.id.as_ref())
            .attr_opt("class", form.class.as_ref())
            .flag("novalidate", form.novalidate);
        for (name, value) in &form.custom_attrs {
            tag = tag.attr(name, value);
        }
        tag.close();
        html.push('\n');

        let summary = form.errors.map(ValidationErrors::form_errors).unwrap_or_default();
        for error in summary {
            let _ = writeln!(
                html,
                r#"  <p class="{} form-error-summary">{}</p>"#,
                options.error_class,
                escape_html(&error.message)
            );
        }

        for field in &form.fields {
            Self::write_field(&mut html, field, form.errors, options);
        }

        if let Some(text) = &form.submit_text {
            let class = form.submit_class.as_deref().unwrap_or(&options.submit_class);
            Tag::open(&mut html, "  ", "button")
                .attr("type", "submit")
                .attr("class", class)
                .close();
            let _ = writeln!(html, "{}</button>", escape_html(text));
        }

        html.push_str("</form>");
        html
    }

    fn write_field(
        html: &mut String,
        field: &FormField,
        errors: Option<&ValidationErrors>,
        options: &FormRenderOptions,
    ) {
        let messages: &[FieldError] = errors.map_or(&[], |errors| errors.for_field(&field.name));
        let invalid = !messages.is_empty();

        if matches!(field.kind, FieldKind::Input(InputType::Hidden)) {
            Self::write_control(html, field, invalid, options, "  ");
            html.push('\n');
            return;
        }

        let id = field.effective_id();
        let is_checkbox = matches!(field.kind, FieldKind::Checkbox);
        let _ = writeln!(html, r#"  <div class="{}">"#, options.group_class);

        if let Some(label) = field.label.as_ref().filter(|_| !is_checkbox) {
            let marker = if field.flags.required { " *" } else { "" };
            let _ = writeln!(
                html,
                r#"    <label for="{}" class="{}">{}{marker}</label>"#,
                escape_attr(&id),
                options.label_class,
                escape_html(label)
            );
        }

        Self::write_control(html, field, invalid, options, "    ");

        // Checkbox labels follow the box
        if let Some(label) = field.label.as_ref().filter(|_| is_checkbox) {
            let _ = write!(
                html,
                r#" <label for="{}" class="{}">{}</label>"#,
                escape_attr(&id),
                options.label_class,
                escape_html(label)
            );
        }
        html.push('\n');

        for error in messages {
            Self::write_note(html, &options.error_class, &error.message);
        }
        if let Some(help) = &field.help_text {
            Self::write_note(html, &options.help_class, help);
        }

        html.push_str("  </div>\n");
    }

    fn write_control(
        html: &mut String,
        field: &FormField,
        invalid: bool,
        options: &FormRenderOptions,
        indent: &str,
    ) {
        match &field.kind {
            FieldKind::Input(input_type) => {
                // Passwords are never echoed back
                let value = field
                    .value
                    .as_ref()
                    .filter(|_| *input_type != InputType::Password);
                let tag = Tag::open(html, indent, "input").attr("type", input_type.as_str());
                Self::control_attrs(tag, field, invalid, options)
                    .attr_opt("value", value)
                    .attr_opt("placeholder", field.placeholder.as_ref())
                    .flag("readonly", field.flags.readonly)
                    .flag("autofocus", field.flags.autofocus)
                    .attr_opt("minlength", field.min_length)
                    .attr_opt("maxlength", field.max_length)
                    .attr_opt("min", field.min)
                    .attr_opt("max", field.max)
                    .attr_opt("step", field.step.as_ref())
                    .attr_opt("pattern", field.pattern.as_ref().map(|p| &p.source))
                    .close();
            }
            FieldKind::Textarea { rows } => {
                Self::control_attrs(Tag::open(html, indent, "textarea"), field, invalid, options)
                    .attr_opt("placeholder", field.placeholder.as_ref())
                    .attr_opt("rows", *rows)
                    .flag("readonly", field.flags.readonly)
                    .attr_opt("maxlength", field.max_length)
                    .close();
                if let Some(value) = &field.value {
                    html.push_str(&escape_html(value));
                }
                html.push_str("</textarea>");
            }
            FieldKind::Select { options: choices } => {
                Self::control_attrs(Tag::open(html, indent, "select"), field, invalid, options)
                    .close();
                html.push('\n');
                if !field.flags.required {
                    html.push_str("      <option value=\"\"></option>\n");
                }
                for choice in choices {
                    Tag::open(html, "      ", "option")
                        .attr("value", &choice.value)
                        .flag("disabled", choice.disabled)
                        .flag("selected", field.value.as_ref() == Some(&choice.value))
                        .close();
                    let _ = writeln!(html, "{}</option>", escape_html(&choice.label));
                }
                let _ = write!(html, "{indent}</select>");
            }
            FieldKind::Checkbox => {
                let tag = Tag::open(html, indent, "input").attr("type", "checkbox");
                Self::control_attrs(tag, field, invalid, options)
                    .attr("value", "true")
                    .flag("checked", field.value.as_deref().is_some_and(is_checked_value))
                    .close();
            }
        }
    }

    /// Attributes shared by every control
    fn control_attrs<'h>(
        tag: Tag<'h>,
        field: &FormField,
        invalid: bool,
        options: &FormRenderOptions,
    ) -> Tag<'h> {
        let class = [
            Some(options.input_class.as_str()),
            field.class.as_deref(),
            invalid.then_some(options.input_error_class.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        tag.attr("name", &field.name)
            .attr("id", &field.effective_id())
            .attr_opt("class", Some(class.as_str()).filter(|c| !c.is_empty()))
            // Required checkboxes are enforced by the schema, not the browser
            .flag(
                "required",
                field.flags.required && !matches!(field.kind, FieldKind::Checkbox),
            )
            .flag("disabled", field.flags.disabled)
            .attr_opt("aria-invalid", invalid.then_some("true"))
    }

    fn write_note(html: &mut String, class: &str, text: &str) {
        let _ = writeln!(
            html,
            r#"    <span class="{class}">{}</span>"#,
            escape_html(text)
        );
    }
}

/// Whether a submitted checkbox value means "checked"
#[must_use]
pub fn is_checked_value(value: &str) -> bool {
    matches!(value, "true" | "on" | "1" | "yes")
}

/// Escape a string for use in an HTML attribute value
#[must_use]
pub fn escape_attr(s: &str) -> String {
    escape(s, true)
}

/// Escape a string for use in HTML content
#[must_use]
pub fn escape_html(s: &str) -> String {
    escape(s, false)
}

fn escape(s: &str, quotes: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(field: FormField) -> String {
        FormBuilder::new("/admin/item/create", "post").field(field).build()
    }

    #[test]
    fn test_form_attributes_and_submit() {
        let html = FormBuilder::new("/admin/item/3", "post")
            .id("admin-form")
            .submit("Save")
            .build();

        assert!(html.starts_with(r#"<form action="/admin/item/3" method="post" id="admin-form">"#));
        assert!(html.contains(r#"<button type="submit" class="button button-primary">Save</button>"#));
        assert!(html.ends_with("</form>"));
    }

    #[test]
    fn test_text_input() {
        let html = render(
            FormField::text("label")
                .value("Item \"1\"")
                .required()
                .max_length(20),
        );

        assert!(html.contains(
            r#"<input type="text" name="label" id="field-label" class="form-input" required value="Item &quot;1&quot;" maxlength="20">"#
        ));
        assert!(html.contains("Label *</label>"));
    }

    #[test]
    fn test_errors_mark_the_control() {
        let mut errors = ValidationErrors::new();
        errors.add("label", "This field is required.");
        errors.add_form_error("An item with id '1' already exists.");

        let html = FormBuilder::new("/admin/item/create", "post")
            .field(FormField::text("label"))
            .errors(&errors)
            .build();

        assert!(html.contains(r#"class="form-input form-input-error""#));
        assert!(html.contains(r#"aria-invalid="true""#));
        assert!(html.contains(r#"<span class="form-error">This field is required.</span>"#));
        assert!(html.contains(
            r#"<p class="form-error form-error-summary">An item with id '1' already exists.</p>"#
        ));
    }

    #[test]
    fn test_password_value_not_rendered() {
        let html = render(FormField::input("secret", InputType::Password).value("hunter2"));
        assert!(!html.contains("hunter2"));
    }

    #[test]
    fn test_textarea_escapes_content() {
        let html = render(FormField::textarea("notes").rows(4).value("<b>hi</b>"));

        assert!(html.contains(r#"rows="4""#));
        assert!(html.contains(">&lt;b&gt;hi&lt;/b&gt;</textarea>"));
    }

    #[test]
    fn test_select_marks_choice() {
        let html = render(
            FormField::select("status")
                .option("draft", "Draft")
                .option("live", "Live")
                .value("live"),
        );

        assert!(html.contains(r#"<option value=""></option>"#));
        assert!(html.contains(r#"<option value="draft">Draft</option>"#));
        assert!(html.contains(r#"<option value="live" selected>Live</option>"#));
        assert!(html.contains("    </select>\n"));
    }

    #[test]
    fn test_checkbox_label_follows_box() {
        let html = render(FormField::checkbox("active").value("on"));

        assert!(html.contains(
            r#"<input type="checkbox" name="active" id="field-active" class="form-input" value="true" checked> <label for="field-active" class="form-label">Active</label>"#
        ));
        assert!(!html.contains(" required"));
    }

    #[test]
    fn test_hidden_input_has_no_wrapper() {
        let html = render(FormField::input("token", InputType::Hidden).value("abc"));
        assert!(html.contains(r#"type="hidden""#));
        assert!(!html.contains("form-group"));
    }

    #[test]
    fn test_help_text() {
        let html = render(FormField::text("slug").help("Lowercase & dashes"));
        assert!(html.contains(r#"<span class="form-help">Lowercase &amp; dashes</span>"#));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html(r#"a & "b""#), r#"a &amp; "b""#);
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
        assert!(is_checked_value("on"));
        assert!(!is_checked_value("false"));
    }
}
