//! Typed edit forms
//!
//! Each record type declares its form as a plain struct with one [`Slot`] per
//! field. A slot carries the current value plus two flags: whether the user
//! may change it, and whether it must be filled before the form can be saved.
//! The `id` slot is always present, always required and never editable.

use std::fmt;
use thiserror::Error;

use crate::core::identity::EntityRef;

/// One editable (or display-only) form field
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    value: T,
    editable: bool,
    required: bool,
}

impl<T> Slot<T> {
    /// An ordinary user-editable field
    pub fn editable(value: T) -> Self {
        Self {
            value,
            editable: true,
            required: false,
        }
    }

    /// A display-only field (the user cannot change it)
    pub fn locked(value: T) -> Self {
        Self {
            value,
            editable: false,
            required: false,
        }
    }

    /// Mark the field mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Change the value as the user would; fails on a locked field
    pub fn set(&mut self, field: &'static str, value: T) -> Result<(), FormError> {
        if !self.editable {
            return Err(FormError::ReadOnly(field));
        }
        self.value = value;
        Ok(())
    }

    /// Overwrite the value regardless of the editable flag (form reset)
    pub fn reset(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: Clone> Slot<T> {
    pub fn value(&self) -> T {
        self.value.clone()
    }
}

impl Slot<Option<String>> {
    /// Empty strings count as missing, like a blank text input
    pub fn is_missing(&self) -> bool {
        self.value.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

impl Slot<Option<i64>> {
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

impl Slot<Option<EntityRef>> {
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// A required field left empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "this field is required".to_string(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised while editing a form
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("field '{0}' is read-only")]
    ReadOnly(&'static str),

    #[error("unknown field '{field}' (valid: {valid})")]
    UnknownField { field: String, valid: String },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{id} is not an available option for '{field}'")]
    UnknownOption { field: String, id: i64 },

    #[error("field '{0}' is a reference; choose one of its options instead")]
    ReferenceField(&'static str),

    #[error("form is invalid: {}", format_violations(.0))]
    Invalid(Vec<FieldViolation>),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The editable representation of one record type
pub trait EntityForm: Clone + fmt::Debug {
    type Entity;

    /// Field names in display order, `id` first
    const FIELDS: &'static [&'static str];

    /// Fresh form seeded from `seed`, or from the empty draft
    fn build(seed: Option<&Self::Entity>) -> Self;

    /// Read every field, including the locked `id`, back into a record value
    fn extract(&self) -> Self::Entity;

    /// Re-seed an existing form in place; `id` becomes locked again
    fn reset(&mut self, seed: &Self::Entity);

    /// Assign a user-entered textual value to a scalar field
    ///
    /// An empty string clears optional fields. Reference fields answer
    /// [`FormError::ReferenceField`]: they only change through
    /// [`EntityForm::set_reference`], which the edit session calls after
    /// checking the id against the published options.
    fn set(&mut self, field: &str, raw: &str) -> Result<(), FormError>;

    /// Assign (or clear) a reference field
    ///
    /// No option check happens here; go through the edit session's
    /// `select_reference` when the value comes from a user.
    fn set_reference(&mut self, field: &str, value: Option<EntityRef>) -> Result<(), FormError> {
        let _ = value;
        Err(unknown_field(field, Self::FIELDS))
    }

    /// Required fields that are still empty
    fn violations(&self) -> Vec<FieldViolation>;

    fn validate(&self) -> Result<(), FormError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(violations))
        }
    }
}

pub(crate) fn unknown_field(field: &str, valid: &[&str]) -> FormError {
    FormError::UnknownField {
        field: field.to_string(),
        valid: valid.join(", "),
    }
}

/// Parse helpers shared by the per-entity forms
pub(crate) fn parse_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

pub(crate) fn parse_integer(field: &str, raw: &str) -> Result<Option<i64>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|e| FormError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a reference id; `none` (or empty) clears the reference
pub(crate) fn parse_reference(field: &str, raw: &str) -> Result<Option<EntityRef>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(parse_integer(field, raw)?.map(EntityRef::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_slot_rejects_set() {
        let mut slot = Slot::locked(Some(3_i64)).required();
        assert!(!slot.is_editable());
        assert!(slot.is_required());
        assert_eq!(slot.set("id", Some(4)), Err(FormError::ReadOnly("id")));
        assert_eq!(*slot.get(), Some(3));

        slot.reset(None);
        assert_eq!(*slot.get(), None);
    }

    #[test]
    fn test_editable_slot_set() {
        let mut slot = Slot::editable(None::<String>);
        slot.set("title", Some("Manual".into())).unwrap();
        assert_eq!(slot.value(), Some("Manual".to_string()));
    }

    #[test]
    fn test_blank_text_is_missing() {
        assert!(Slot::editable(None::<String>).is_missing());
        assert!(Slot::editable(Some("  ".to_string())).is_missing());
        assert!(!Slot::editable(Some("x".to_string())).is_missing());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("size", "42").unwrap(), Some(42));
        assert_eq!(parse_integer("size", "").unwrap(), None);
        assert!(matches!(
            parse_integer("size", "big"),
            Err(FormError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("car", "none").unwrap(), None);
        assert_eq!(parse_reference("car", "7").unwrap(), Some(EntityRef::new(7)));
        assert!(parse_reference("car", "seven").is_err());
    }

    #[test]
    fn test_invalid_message_lists_fields() {
        let err = FormError::Invalid(vec![
            FieldViolation::required("title"),
            FieldViolation::required("size"),
        ]);
        assert_eq!(
            err.to_string(),
            "form is invalid: title: this field is required; size: this field is required"
        );
    }
}
