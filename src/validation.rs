//! Form validation and sanitization helpers.
//!
//! Field rules are declared with `validator` derives on the input forms. This module turns the
//! resulting `ValidationErrors` into an ordered list of `{field, message}` pairs and provides the
//! sanitizers applied to every submitted value, whatever the validation outcome.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of evaluating every rule of a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Flatten a `validate()` result, ordering errors by `fields` and then by rule declaration.
    pub fn collect(result: Result<(), ValidationErrors>, fields: &[&str]) -> Self {
        let Err(errors) = result else {
            return Self::default();
        };

        let by_field = errors.field_errors();
        let mut ordered = Vec::new();
        for field in fields {
            let Some(list) = by_field.get(*field) else {
                continue;
            };
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                ordered.push(FieldError::new(*field, message));
            }
        }

        Self { errors: ordered }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Build a `ValidationError` carrying a user-facing message.
pub fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// HTML-escape a value so it can be echoed back safely.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

/// Trim then escape.
pub fn clean(value: &str) -> String {
    escape(value.trim())
}

/// Parse an ISO-8601 date or date-time, keeping the calendar date.
/// Blank or unparseable input yields `None`.
pub fn parse_iso8601(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}
