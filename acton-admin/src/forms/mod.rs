//! Form handling, building, and validation for admin views
//!
//! This module provides:
//! - [`FormSchema`]: the declared fields of a create/edit form, which parses
//!   submissions into a typed [`Record`](crate::repository::Record)
//! - [`FormBuilder`] and [`FormRenderer`]: HTML rendering with values and
//!   field-level errors
//! - [`ValidationErrors`]: errors keyed by field name
//!
//! # Quick Start
//!
//! ```rust
//! use acton_admin::forms::{FormField, FormSchema, InputType};
//!
//! let schema = FormSchema::new()
//!     .field(FormField::text("title").required().max_length(80))
//!     .field(FormField::input("contact", InputType::Email))
//!     .field(FormField::number("rank").min(0.0))
//!     .field(FormField::checkbox("published"));
//!
//! let submitted = vec![
//!     ("title".to_string(), "Hello".to_string()),
//!     ("contact".to_string(), "editor@example.com".to_string()),
//!     ("rank".to_string(), "3".to_string()),
//! ];
//!
//! let record = schema.parse(&submitted).unwrap();
//! assert_eq!(record["rank"], 3);
//! assert_eq!(record["published"], false);
//! ```
//!
//! # Validation Errors
//!
//! Invalid submissions come back as [`ValidationErrors`], which render next
//! to their fields:
//!
//! ```rust
//! use acton_admin::forms::{FormField, FormSchema, FormValues, ValidationErrors};
//!
//! let schema = FormSchema::new().field(FormField::text("title").required());
//! let errors = schema.parse(&[]).unwrap_err();
//! assert!(errors.has_field_error("title"));
//!
//! let html = schema
//!     .to_builder("/admin/post/create", &FormValues::new(), &errors)
//!     .build();
//! assert!(html.contains("aria-invalid"));
//! ```

mod builder;
mod error;
mod field;
mod render;
mod schema;

pub use builder::FormBuilder;
pub use error::{FieldError, ValidationErrors, NON_FIELD_ERRORS};
pub use field::{FieldFlags, FieldKind, FieldPattern, FormField, InputType, SelectOption};
pub use render::{escape_attr, escape_html, is_checked_value, FormRenderOptions, FormRenderer};
pub use schema::{FormSchema, FormValidator, FormValues};
