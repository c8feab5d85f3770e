//! The portfolio contact form and its submission flow.
//!
//! ```text
//! Idle ──submit──► Sending ──transport ok──► Sent
//!   ▲                  └────transport err──► Failed
//!   └── validation errors keep the form Idle
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::FormError;
use crate::rules::FieldRules;
use crate::validator::{FormData, FormValidator, ValidationReport};

pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent. I will get back to you soon.";
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Rules for the contact form: name, email, subject, message.
pub fn contact_form() -> FormValidator {
    FormValidator::new()
        .field(
            "name",
            FieldRules::text().required().min_length(2).max_length(100),
        )
        .field("email", FieldRules::email().required())
        .field("subject", FieldRules::text().required().max_length(150))
        .field(
            "message",
            FieldRules::textarea()
                .required()
                .min_length(10)
                .max_length(5000),
        )
}

/// A message sent through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Builds a message from form data, trimming each value.
    pub fn from_form_data(data: &FormData) -> Self {
        let field = |name: &str| {
            data.get(name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            name: field("name"),
            email: field("email"),
            subject: field("subject"),
            message: field("message"),
        }
    }

    pub fn to_form_data(&self) -> FormData {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    /// Plain-text summary suitable for the clipboard.
    pub fn clipboard_text(&self, sent_at: &str) -> String {
        format!(
            "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n\n---\nSent at: {}",
            self.name, self.email, self.subject, self.message, sent_at
        )
    }
}

/// Delivers a validated message somewhere.
pub trait ContactTransport {
    fn send(&self, message: &ContactMessage) -> Result<(), FormError>;
}

/// Pretends to send: waits, logs, succeeds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

impl ContactTransport for SimulatedTransport {
    fn send(&self, message: &ContactMessage) -> Result<(), FormError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        info!(
            name = %message.name,
            email = %message.email,
            subject = %message.subject,
            "message received"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Sending,
    Sent,
    Failed,
}

impl SubmitState {
    /// Text of the submit button in this state.
    pub fn button_label(self) -> &'static str {
        match self {
            SubmitState::Sending => "Sending...",
            _ => "Send Message",
        }
    }

    pub fn is_busy(self) -> bool {
        self == SubmitState::Sending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Banner shown above the form after a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: &'static str,
}

impl Feedback {
    pub fn success() -> Self {
        Self {
            kind: FeedbackKind::Success,
            text: SUCCESS_MESSAGE,
        }
    }

    pub fn error() -> Self {
        Self {
            kind: FeedbackKind::Error,
            text: ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationReport),
    Sent {
        message: ContactMessage,
        feedback: Feedback,
    },
    Failed(Feedback),
}

/// A contact form bound to a transport.
#[derive(Debug)]
pub struct ContactSubmission<T> {
    validator: FormValidator,
    transport: T,
    state: SubmitState,
}

impl<T: ContactTransport> ContactSubmission<T> {
    pub fn new(transport: T) -> Self {
        Self::with_validator(contact_form(), transport)
    }

    pub fn with_validator(validator: FormValidator, transport: T) -> Self {
        Self {
            validator,
            transport,
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Validates `data` and, if it passes, sends it.
    pub fn submit(&mut self, data: &FormData) -> SubmitOutcome {
        match self.begin(data) {
            Ok(message) => self.deliver(message),
            Err(report) => SubmitOutcome::Rejected(report),
        }
    }

    /// First half of [`submit`](Self::submit): validates `data` and moves to
    /// [`SubmitState::Sending`], so the host can show the busy button before
    /// the transport runs.
    pub fn begin(&mut self, data: &FormData) -> Result<ContactMessage, ValidationReport> {
        let report = self.validator.validate_form(data);
        if !report.is_valid() {
            info!(errors = report.errors().len(), "form has validation errors");
            self.state = SubmitState::Idle;
            return Err(report);
        }
        self.state = SubmitState::Sending;
        Ok(ContactMessage::from_form_data(data))
    }

    /// Second half of [`submit`](Self::submit): hands `message` to the
    /// transport and settles on `Sent` or `Failed`.
    pub fn deliver(&mut self, message: ContactMessage) -> SubmitOutcome {
        self.state = SubmitState::Sending;
        match self.transport.send(&message) {
            Ok(()) => {
                self.state = SubmitState::Sent;
                SubmitOutcome::Sent {
                    message,
                    feedback: Feedback::success(),
                }
            }
            Err(err) => {
                error!(error = %err, "form submission error");
                self.state = SubmitState::Failed;
                SubmitOutcome::Failed(Feedback::error())
            }
        }
    }

    /// Back to a fresh form.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use std::cell::RefCell;

    struct Recording {
        sent: RefCell<Vec<ContactMessage>>,
        fail: bool,
    }

    impl Recording {
        fn ok() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl ContactTransport for Recording {
        fn send(&self, message: &ContactMessage) -> Result<(), FormError> {
            if self.fail {
                return Err(FormError::transport("network down"));
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn valid_message() -> ContactMessage {
        ContactMessage {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Collaboration".to_string(),
            message: "Would you like to build an engine together?".to_string(),
        }
    }

    #[test]
    fn valid_submission_is_sent() {
        let mut form = ContactSubmission::new(Recording::ok());
        let outcome = form.submit(&valid_message().to_form_data());

        match outcome {
            SubmitOutcome::Sent { message, feedback } => {
                assert_eq!(message, valid_message());
                assert_eq!(feedback.text, SUCCESS_MESSAGE);
            }
            other => panic!("expected Sent, got {:?}", other),
        }
        assert_eq!(form.state(), SubmitState::Sent);
        assert_eq!(form.transport.sent.borrow().len(), 1);
    }

    #[test]
    fn invalid_submission_is_rejected_without_sending() {
        let mut form = ContactSubmission::new(Recording::ok());
        let mut data = valid_message().to_form_data();
        data.insert("email".to_string(), "not-an-email".to_string());
        data.insert("message".to_string(), "short".to_string());

        let SubmitOutcome::Rejected(report) = form.submit(&data) else {
            panic!("expected rejection");
        };
        assert_eq!(report.error_for("email"), Some(&FieldError::InvalidEmail));
        assert_eq!(
            report.error_for("message"),
            Some(&FieldError::TooShort { min: 10 })
        );
        assert_eq!(form.state(), SubmitState::Idle);
        assert!(form.transport.sent.borrow().is_empty());
    }

    #[test]
    fn transport_failure_shows_error() {
        let mut form = ContactSubmission::new(Recording::failing());
        let outcome = form.submit(&valid_message().to_form_data());
        assert_eq!(outcome, SubmitOutcome::Failed(Feedback::error()));
        assert_eq!(form.state(), SubmitState::Failed);

        form.reset();
        assert_eq!(form.state(), SubmitState::Idle);
    }

    #[test]
    fn begin_shows_sending_until_delivered() {
        let mut form = ContactSubmission::new(Recording::ok());
        let message = form.begin(&valid_message().to_form_data()).unwrap();

        assert_eq!(form.state(), SubmitState::Sending);
        assert_eq!(form.state().button_label(), "Sending...");
        assert!(form.transport.sent.borrow().is_empty());

        assert!(matches!(form.deliver(message), SubmitOutcome::Sent { .. }));
        assert_eq!(form.state(), SubmitState::Sent);
        assert_eq!(form.state().button_label(), "Send Message");
    }

    #[test]
    fn begin_rejects_invalid_data() {
        let mut form = ContactSubmission::new(Recording::ok());
        let report = form.begin(&FormData::new()).unwrap_err();
        assert!(!report.is_valid());
        assert_eq!(form.state(), SubmitState::Idle);
    }

    #[test]
    fn message_is_trimmed() {
        let mut data = valid_message().to_form_data();
        data.insert("name".to_string(), "  Ada Lovelace \n".to_string());
        assert_eq!(ContactMessage::from_form_data(&data).name, "Ada Lovelace");
    }

    #[test]
    fn button_labels() {
        assert_eq!(SubmitState::Idle.button_label(), "Send Message");
        assert_eq!(SubmitState::Sending.button_label(), "Sending...");
        assert!(SubmitState::Sending.is_busy());
    }

    #[test]
    fn clipboard_layout() {
        let text = valid_message().clipboard_text("2024-05-01 10:00");
        assert!(text.starts_with("Name: Ada Lovelace\nEmail: ada@example.com\n"));
        assert!(text.contains("\n\nMessage:\nWould you like"));
        assert!(text.ends_with("---\nSent at: 2024-05-01 10:00"));
    }

    #[test]
    fn simulated_transport_succeeds() {
        assert!(SimulatedTransport::instant().send(&valid_message()).is_ok());
    }
}
