use chrono::Utc;
use error_stack::Report;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Error;
use crate::config;
use crate::types::{self, UserId};

/// Claims carried by a bearer token: the subject user, their email at
/// issue time, and the issue/expiry timestamps.
///
/// Tokens are never stored server-side; validity is decided solely by
/// the signature and `exp` at each use. A token issued before an
/// account was changed or deleted stays structurally valid until it
/// expires.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Jwt {
    pub sub: UserId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
#[error("Failed to encode jwt")]
pub struct EncodeJwtError;

#[derive(Debug, Error)]
#[error("Failed to decode jwt")]
pub struct DecodeJwtError;

impl Jwt {
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            email: email.into(),
            iat: now,
            exp: now + expires_in_secs,
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn encode(&self, auth: &config::Auth) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS512);
        let key = EncodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());

        jsonwebtoken::encode(&header, self, &key).map_err(|e| {
            Error::from_report(
                types::Error::Internal,
                Report::new(e).change_context(EncodeJwtError),
            )
        })
    }

    /// Checks signature, structure and expiry with zero leeway. Every
    /// failure denies access the same way; callers cannot tell a
    /// forged token from an expired one.
    #[tracing::instrument(skip_all)]
    pub fn decode(token: &str, auth: &config::Auth) -> Result<Self, Error> {
        let key = DecodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_exp = true;

        match jsonwebtoken::decode::<Self>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(error) => {
                if matches!(error.kind(), ErrorKind::ExpiredSignature) {
                    tracing::debug!("rejected expired bearer token");
                }
                Err(Error::from_report(
                    types::Error::Unauthorized,
                    Report::new(error).change_context(DecodeJwtError),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Auth, TokenExpiry};
    use crate::util::Sensitive;

    fn test_auth(secret: &str) -> Auth {
        Auth {
            jwt_secret: Sensitive::new(secret.to_string()),
            token_expires: TokenExpiry::default(),
        }
    }

    #[test]
    fn roundtrips_claims() {
        let auth = test_auth("roster-test-signing-key");
        let claims = Jwt::new(UserId(42), "ana@example.com", 3_600);

        let token = claims.encode(&auth).unwrap();
        let decoded = Jwt::decode(&token, &auth).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_foreign_signatures() {
        let token = Jwt::new(UserId(1), "a@x.com", 3_600)
            .encode(&test_auth("roster-test-signing-key"))
            .unwrap();

        let error = Jwt::decode(&token, &test_auth("another-signing-key")).unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);
    }

    #[test]
    fn rejects_garbage_tokens() {
        let auth = test_auth("roster-test-signing-key");
        let error = Jwt::decode("definitely.not.a-token", &auth).unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);
    }

    #[test]
    fn rejects_already_expired_tokens() {
        let auth = test_auth("roster-test-signing-key");
        let token = Jwt::new(UserId(1), "a@x.com", -60).encode(&auth).unwrap();

        let error = Jwt::decode(&token, &auth).unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);
    }

    #[test]
    fn short_lived_token_dies_on_time() {
        let auth = test_auth("roster-test-signing-key");
        let token = Jwt::new(UserId(1), "a@x.com", 1).encode(&auth).unwrap();
        assert!(Jwt::decode(&token, &auth).is_ok());

        std::thread::sleep(std::time::Duration::from_secs(2));
        assert!(Jwt::decode(&token, &auth).is_err());
    }
}
