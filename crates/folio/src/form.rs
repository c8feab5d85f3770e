//! Contact and password commands.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Result};
use console::style;
use folio_form::{
    password_strength, ContactMessage, ContactSubmission, ContactTransport,
    SimulatedTransport, Strength, SubmitOutcome,
};

use crate::cli::ContactArgs;

pub fn contact(args: ContactArgs, out: &mut dyn Write) -> Result<()> {
    let transport = SimulatedTransport::new(Duration::from_millis(args.delay_ms));
    submit(args, transport, out)
}

fn submit<T: ContactTransport>(args: ContactArgs, transport: T, out: &mut dyn Write) -> Result<()> {
    let data = ContactMessage {
        name: args.name,
        email: args.email,
        subject: args.subject,
        message: args.message,
    }
    .to_form_data();

    let mut submission = ContactSubmission::new(transport);
    let message = match submission.begin(&data) {
        Ok(message) => message,
        Err(report) => {
            for (field, error) in report.errors() {
                writeln!(out, "{} {field}: {error}", style("✗").red())?;
            }
            bail!("{} field(s) failed validation", report.errors().len());
        }
    };
    writeln!(out, "{}", style(submission.state().button_label()).dim())?;
    out.flush()?;

    match submission.deliver(message) {
        SubmitOutcome::Rejected(report) => {
            bail!("{} field(s) failed validation", report.errors().len());
        }
        SubmitOutcome::Sent { message, feedback } => {
            writeln!(out, "{}", style(feedback.text).green())?;
            let sent_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
            writeln!(out)?;
            writeln!(out, "{}", message.clipboard_text(&sent_at))?;
        }
        SubmitOutcome::Failed(feedback) => {
            writeln!(out, "{}", style(feedback.text).red())?;
            bail!("message was not sent");
        }
    }
    Ok(())
}

pub fn password(value: &str, out: &mut dyn Write) -> Result<()> {
    let strength = password_strength(value);
    let label = match strength {
        Strength::Empty => style("empty".to_string()).dim(),
        Strength::Weak => style(strength.label().to_string()).red(),
        Strength::Fair => style(strength.label().to_string()).yellow(),
        Strength::Good => style(strength.label().to_string()).cyan(),
        Strength::Strong => style(strength.label().to_string()).green(),
    };
    writeln!(out, "Strength: {label}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_form::FormError;

    struct Offline;

    impl ContactTransport for Offline {
        fn send(&self, _: &ContactMessage) -> Result<(), FormError> {
            Err(FormError::transport("offline"))
        }
    }

    fn args() -> ContactArgs {
        ContactArgs {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Engines".to_string(),
            message: "Shall we build an analytical engine?".to_string(),
            delay_ms: 0,
        }
    }

    #[test]
    fn sent_message_prints_summary() {
        let mut out = Vec::new();
        submit(args(), SimulatedTransport::instant(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.lines().next().unwrap().contains("Sending..."));
        assert!(out.contains("Thank you! Your message has been sent."));
        assert!(out.contains("Name: Ada Lovelace"));
        assert!(out.contains("Sent at: "));
    }

    #[test]
    fn invalid_fields_are_listed() {
        let mut bad = args();
        bad.email = "ada".to_string();
        bad.message = "hi".to_string();

        let mut out = Vec::new();
        let err = submit(bad, SimulatedTransport::instant(), &mut out).unwrap_err();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("email: Please enter a valid email address"));
        assert!(out.contains("message: Minimum length is 10 characters"));
        assert!(err.to_string().starts_with("2 field(s)"));
    }

    #[test]
    fn transport_failure_is_an_error() {
        let mut out = Vec::new();
        assert!(submit(args(), Offline, &mut out).is_err());
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("An error occurred. Please try again."));
    }

    #[test]
    fn password_levels() {
        let mut out = Vec::new();
        password("Abcdefg1!", &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Strong"));
    }
}
