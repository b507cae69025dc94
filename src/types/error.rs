use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::util::validation::ValidateError;

/// Client-facing error taxonomy. Each variant maps to exactly one
/// HTTP status and one human-readable message at the HTTP boundary.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
    Internal,
    NotFound,
    InvalidUserId,
    Unauthorized,
    InvalidCredentials,
    EmailTaken,
    NoFieldsProvided,
    ReadonlyMode,
    InvalidFormBody(ValidateError),
}

impl Error {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Internal => "Server error",
            Self::NotFound => "User not found",
            Self::InvalidUserId => "Invalid user id",
            Self::Unauthorized => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::EmailTaken => "Email already in use",
            Self::NoFieldsProvided => "No fields provided for update",
            Self::ReadonlyMode => "Service is temporarily read-only",
            Self::InvalidFormBody(..) => "Invalid input",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serde_test::Token;

    #[track_caller]
    fn assert_unit_variant(value: Error, variant: &'static str) {
        serde_test::assert_tokens(
            &value,
            &[
                Token::Struct {
                    name: "Error",
                    len: 1,
                },
                Token::Str("type"),
                Token::Str(variant),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_serde_impl() {
        assert_unit_variant(Error::Internal, "internal");
        assert_unit_variant(Error::NotFound, "not_found");
        assert_unit_variant(Error::InvalidUserId, "invalid_user_id");
        assert_unit_variant(Error::Unauthorized, "unauthorized");
        assert_unit_variant(Error::InvalidCredentials, "invalid_credentials");
        assert_unit_variant(Error::EmailTaken, "email_taken");
        assert_unit_variant(Error::NoFieldsProvided, "no_fields_provided");
        assert_unit_variant(Error::ReadonlyMode, "readonly_mode");
    }

    #[test]
    fn form_body_variant_carries_issues() {
        let mut form = ValidateError::default();
        form.push("email", "invalid email");

        let value = serde_json::to_value(Error::InvalidFormBody(form)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "invalid_form_body",
                "issues": [{ "field": "email", "message": "invalid email" }],
            }),
        );
    }
}
