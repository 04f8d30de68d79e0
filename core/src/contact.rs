use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::error::ValidationError;
use crate::questionnaire::QuestionnaireInput;

/// Same grammar browsers apply to `<input type="email">`.
const EMAIL_PATTERN: &str = concat!(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@",
    r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
    r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
);

#[allow(clippy::expect_used)]
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

/// Name and email typed into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
}

impl ContactDetails {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
    }
}

/// Snapshot taken for a single submit attempt and dropped once it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub estimated_waste: String,
    pub answers: QuestionnaireInput,
}

impl ContactSubmission {
    pub fn new(
        contact: &ContactDetails,
        answers: QuestionnaireInput,
        estimated_waste: impl Into<String>,
    ) -> Self {
        Self {
            name: contact.name.trim().to_string(),
            email: contact.email.trim().to_string(),
            estimated_waste: estimated_waste.into(),
            answers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_ordinary_addresses() {
        for email in [
            "ada@example.com",
            "first.last+tag@sub.example.co.uk",
            "x@localhost",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "ada", "ada@", "@example.com", "a b@example.com", "ada@-bad.com"] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn validation_reports_first_problem() {
        assert_eq!(
            ContactDetails::new("  ", "ada@example.com").validate(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            ContactDetails::new("Ada", "nope").validate(),
            Err(ValidationError::InvalidEmail("nope".to_string()))
        );
        assert!(ContactDetails::new("Ada", "ada@example.com").is_complete());
    }

    #[test]
    fn submission_trims_contact_fields() {
        let contact = ContactDetails::new(" Ada Lovelace ", " ada@example.com ");
        let submission = ContactSubmission::new(&contact, QuestionnaireInput::default(), "$1.00");
        assert_eq!(submission.name, "Ada Lovelace");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.estimated_waste, "$1.00");
    }
}
