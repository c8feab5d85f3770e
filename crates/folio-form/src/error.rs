//! Error types for form validation and submission.

/// Why a single field value was rejected.
///
/// The `Display` text is the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Minimum length is {min} characters")]
    TooShort { min: usize },

    #[error("Maximum length is {max} characters")]
    TooLong { max: usize },

    #[error("Invalid format")]
    InvalidFormat,
}

/// Errors from building validators or submitting a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A `pattern` rule did not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The validator has no rules for this field.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The field value failed validation.
    #[error("{field}: {error}")]
    Invalid { field: String, error: FieldError },

    /// The transport could not deliver the message.
    #[error("submission failed: {0}")]
    Transport(String),
}

impl FormError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_messages() {
        let required = FieldError::Required {
            field: "email".to_string(),
        };
        assert_eq!(required.to_string(), "email is required");
        assert_eq!(
            FieldError::TooShort { min: 10 }.to_string(),
            "Minimum length is 10 characters"
        );
        assert_eq!(FieldError::InvalidFormat.to_string(), "Invalid format");
    }

    #[test]
    fn invalid_wraps_field_error() {
        let err = FormError::Invalid {
            field: "name".to_string(),
            error: FieldError::TooLong { max: 5 },
        };
        assert_eq!(err.to_string(), "name: Maximum length is 5 characters");
    }
}
