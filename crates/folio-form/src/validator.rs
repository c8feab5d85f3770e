//! Whole-form validation.

use std::collections::BTreeMap;

use crate::error::{FieldError, FormError};
use crate::rules::FieldRules;

/// Submitted values by field name.
pub type FormData = BTreeMap<String, String>;

/// An ordered set of named fields and their rules.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    fields: Vec<(String, FieldRules)>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A later field with the same name replaces the earlier rules.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = rules,
            None => self.fields.push((name, rules)),
        }
        self
    }

    pub fn rules(&self, name: &str) -> Option<&FieldRules> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rules)| rules)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Validates a single field value.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] if no rules exist for `name`,
    /// [`FormError::Invalid`] if the value fails them.
    pub fn validate_field(&self, name: &str, value: &str) -> Result<(), FormError> {
        let rules = self
            .rules(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        rules.check(name, value).map_err(|error| FormError::Invalid {
            field: name.to_string(),
            error,
        })
    }

    /// Validates every field. Missing values count as empty.
    pub fn validate_form(&self, data: &FormData) -> ValidationReport {
        let errors = self
            .fields
            .iter()
            .filter_map(|(name, rules)| {
                let value = data.get(name).map(String::as_str).unwrap_or("");
                rules.check(name, value).err().map(|e| (name.clone(), e))
            })
            .collect();
        ValidationReport { errors }
    }
}

/// Outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<(String, FieldError)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures in field order.
    pub fn errors(&self) -> &[(String, FieldError)] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, error)| error)
    }
}
