use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("compile email regex")
});

pub const PASSWORD_MIN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && email.len() <= 254
}

pub fn is_valid_password(pass: &str) -> bool {
    pass.len() >= PASSWORD_MIN
}

/// One rejected field from a submitted form body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

/// Every issue found while checking a form body. Empty means the body
/// passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidateError {
    pub issues: Vec<Issue>,
}

impl ValidateError {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, is_valid_password, ValidateError};

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("gush@gmail.com"));
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));

        assert!(!is_valid_email("nada_neutho"));
        assert!(!is_valid_email("missing@"));
        assert!(!is_valid_email("@missing.local"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("secret1"));
        assert!(is_valid_password("6chars"));
        assert!(!is_valid_password("five5"));
        assert!(!is_valid_password(""));
    }

    #[test]
    fn collects_issues_in_order() {
        let mut form = ValidateError::default();
        assert!(form.is_empty());

        form.push("name", "name is required");
        form.push("email", "invalid email");

        assert!(!form.is_empty());
        assert_eq!(form.issues.len(), 2);
        assert_eq!(form.issues[0].field, "name");
        assert_eq!(form.issues[1].message, "invalid email");
    }
}
