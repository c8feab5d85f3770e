//! Per-field validation rules.
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. required and empty
//! 2. email kind and not an email address
//! 3. shorter than `min_length`
//! 4. longer than `max_length`
//! 5. non-empty and not matching `pattern`
//!
//! Values are trimmed before any check, and lengths count characters. The
//! length checks also apply to empty optional fields, so an optional field
//! with a minimum length rejects an empty value.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FieldError, FormError};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Returns `true` if `value` looks like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    (*EMAIL).as_ref().is_some_and(|email| email.is_match(value))
}

/// The input type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Textarea,
}

/// Validation rules for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    kind: FieldKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

impl FieldRules {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn email() -> Self {
        Self::new(FieldKind::Email)
    }

    pub fn textarea() -> Self {
        Self::new(FieldKind::Textarea)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Adds a pattern the value must contain a match for.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, FormError> {
        let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Checks `value` for the field called `field`.
    pub fn check(&self, field: &str, value: &str) -> Result<(), FieldError> {
        let value = value.trim();
        let len = value.chars().count();

        if self.required && value.is_empty() {
            return Err(FieldError::Required {
                field: field.to_string(),
            });
        }
        if self.kind == FieldKind::Email && !value.is_empty() && !is_valid_email(value) {
            return Err(FieldError::InvalidEmail);
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(FieldError::TooShort { min });
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(FieldError::TooLong { max });
            }
        }
        if let Some(pattern) = &self.pattern {
            if !value.is_empty() && !pattern.is_match(value) {
                return Err(FieldError::InvalidFormat);
            }
        }
        Ok(())
    }
}
