//! Contact form validation and submission.
//!
//! - [`FieldRules`]: required / email / length / pattern rules for one field
//! - [`FormValidator`]: named fields, validated one at a time or all together
//! - [`ContactSubmission`]: validate, then hand the message to a [`ContactTransport`]
//! - [`password_strength`]: coarse strength rating
//!
//! ```rust
//! use folio_form::{contact_form, FieldError, FormData};
//!
//! let mut data = FormData::new();
//! data.insert("email".into(), "ada@example".into());
//!
//! let report = contact_form().validate_form(&data);
//! assert!(!report.is_valid());
//! assert_eq!(report.error_for("email"), Some(&FieldError::InvalidEmail));
//! ```

mod contact;
mod error;
mod password;
mod rules;
mod validator;

pub use contact::{
    contact_form, ContactMessage, ContactSubmission, ContactTransport, Feedback, FeedbackKind,
    SimulatedTransport, SubmitOutcome, SubmitState, ERROR_MESSAGE, SUCCESS_MESSAGE,
};
pub use error::{FieldError, FormError};
pub use password::{password_strength, Strength};
pub use rules::{is_valid_email, FieldKind, FieldRules};
pub use validator::{FormData, FormValidator, ValidationReport};
