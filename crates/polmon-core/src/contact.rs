//! # Export Contact Validation
//!
//! The relay mails the export to the address the user typed, tagged with
//! their institution. Both are validated before any serialization or
//! network call happens.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ContactError;

/// Minimum institution name length, in characters.
pub const MIN_INSTITUTION_CHARS: usize = 2;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$";

fn email_regex() -> Result<&'static Regex, ContactError> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(|e| ContactError::Pattern(e.to_string()))
}

/// Validated `(email, institution)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    email: String,
    institution: String,
}

impl Contact {
    /// Validate raw form input. Surrounding whitespace is ignored.
    pub fn parse(email: &str, institution: &str) -> Result<Self, ContactError> {
        let email = email.trim();
        if !email_regex()?.is_match(email) {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }
        let institution = institution.trim();
        if institution.chars().count() < MIN_INSTITUTION_CHARS {
            return Err(ContactError::InstitutionTooShort {
                min: MIN_INSTITUTION_CHARS,
            });
        }
        Ok(Self {
            email: email.to_string(),
            institution: institution.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn institution(&self) -> &str {
        &self.institution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_compiles() {
        assert!(email_regex().is_ok());
    }

    #[test]
    fn accepts_plain_address() {
        let c = Contact::parse(" analyst@pku.edu.cn ", " 北大 ").unwrap();
        assert_eq!(c.email(), "analyst@pku.edu.cn");
        assert_eq!(c.institution(), "北大");
    }

    #[test]
    fn accepts_plus_and_dots() {
        assert!(Contact::parse("first.last+tag@example.co.uk", "MGF").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["not-an-email", "a@b", "@example.com", "a b@example.com", ""] {
            assert_eq!(
                Contact::parse(bad, "MGF").unwrap_err(),
                ContactError::InvalidEmail(bad.trim().to_string()),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_one_character_institution() {
        assert_eq!(
            Contact::parse("a@example.com", "A").unwrap_err(),
            ContactError::InstitutionTooShort { min: 2 }
        );
        assert!(Contact::parse("a@example.com", "  A  ").is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // One CJK character is three bytes but still too short.
        assert!(Contact::parse("a@example.com", "北").is_err());
        assert!(Contact::parse("a@example.com", "北大").is_ok());
    }

    #[test]
    fn email_is_checked_before_institution() {
        assert!(matches!(
            Contact::parse("nope", "A"),
            Err(ContactError::InvalidEmail(_))
        ));
    }
}
