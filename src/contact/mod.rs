//! Contact form
//!
//! Submissions are turned into a `mailto:` compose URL for the visitor's own
//! mail client. Nothing is delivered server-side.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// RFC 3986 unreserved characters stay literal, everything else is escaped
const MAILTO_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("name is required")]
    MissingName,

    #[error("message is required")]
    MissingMessage,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// A filled-in contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingMessage);
        }
        if !is_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Validate and build the compose URL addressed to `recipient`
    pub fn mailto(&self, recipient: &str) -> Result<String, ContactError> {
        self.validate()?;

        let name = self.name.trim();
        let subject = match self.subject.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("Message from {}", name),
        };
        let body = format!(
            "{}\n\nFrom: {} <{}>",
            self.message.trim(),
            name,
            self.email.trim()
        );

        Ok(format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            utf8_percent_encode(&subject, MAILTO_COMPONENT),
            utf8_percent_encode(&body, MAILTO_COMPONENT)
        ))
    }
}

/// `local@domain.tld` with no whitespace
fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "Hi & hello?".to_string(),
        }
    }

    #[test]
    fn test_mailto_encoding() {
        let url = message().mailto("me@site.test").unwrap();
        assert_eq!(
            url,
            "mailto:me@site.test?subject=Message%20from%20Ada\
             &body=Hi%20%26%20hello%3F%0A%0AFrom%3A%20Ada%20%3Cada%40example.com%3E"
        );
    }

    #[test]
    fn test_custom_subject() {
        let mut msg = message();
        msg.subject = Some("Job offer".to_string());
        let url = msg.mailto("me@site.test").unwrap();
        assert!(url.contains("subject=Job%20offer&"));
    }

    #[test]
    fn test_validation() {
        let mut msg = message();
        msg.message = "   ".to_string();
        assert_eq!(msg.validate(), Err(ContactError::MissingMessage));

        let mut msg = message();
        msg.name = String::new();
        assert_eq!(msg.validate(), Err(ContactError::MissingName));

        for bad in ["ada", "ada@", "@example.com", "ada@example", "a da@example.com", "a@b@c.d"] {
            let mut msg = message();
            msg.email = bad.to_string();
            assert!(
                matches!(msg.validate(), Err(ContactError::InvalidEmail(_))),
                "{} should be rejected",
                bad
            );
        }
    }
}
