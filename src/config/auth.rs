use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Secret key used to sign and verify bearer tokens.
    ///
    /// **Environment variables**:
    /// - `ROSTER_AUTH_JWT_SECRET` or `JWT_SECRET`
    pub jwt_secret: Sensitive<String>,
    /// How long issued tokens stay valid.
    ///
    /// **Environment variables**:
    /// - `ROSTER_AUTH_TOKEN_EXPIRES` or `JWT_EXPIRES`
    #[serde(default)]
    pub token_expires: TokenExpiry,
}

/// Token lifetime accepted as either a bare amount of seconds or a
/// `<amount><unit>` duration string (`s`, `m`, `h`, `d` or `w`).
/// Unset or blank values fall back to seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenExpiry(i64);

impl TokenExpiry {
    const DEFAULT_SECS: i64 = 7 * 24 * 60 * 60;

    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Some(Self::default());
        }
        if !value.is_ascii() {
            return None;
        }
        if value.bytes().all(|b| b.is_ascii_digit()) {
            return value.parse::<i64>().ok().filter(|n| *n > 0).map(Self);
        }

        let (amount, unit) = value.split_at(value.len() - 1);
        let multiplier = match unit {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 24 * 60 * 60,
            "w" => 7 * 24 * 60 * 60,
            _ => return None,
        };

        let amount = amount.parse::<i64>().ok().filter(|n| *n > 0)?;
        amount.checked_mul(multiplier).map(Self)
    }
}

impl Default for TokenExpiry {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

impl<'de> Deserialize<'de> for TokenExpiry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExpiryVisitor;

        impl Visitor<'_> for ExpiryVisitor {
            type Value = TokenExpiry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("seconds or a duration string such as \"7d\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                if v > 0 {
                    Ok(TokenExpiry(v))
                } else {
                    Err(E::custom("token expiry must be positive"))
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let v = i64::try_from(v).map_err(|_| E::custom("token expiry is too large"))?;
                self.visit_i64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                TokenExpiry::parse(v)
                    .ok_or_else(|| E::custom(format!("invalid token expiry {v:?}")))
            }
        }

        deserializer.deserialize_any(ExpiryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::TokenExpiry;
    use serde_json::json;

    #[test]
    fn parses_durations_and_seconds() {
        assert_eq!(TokenExpiry::parse("7d"), Some(TokenExpiry(604_800)));
        assert_eq!(TokenExpiry::parse("12h"), Some(TokenExpiry(43_200)));
        assert_eq!(TokenExpiry::parse("30m"), Some(TokenExpiry(1_800)));
        assert_eq!(TokenExpiry::parse("45s"), Some(TokenExpiry(45)));
        assert_eq!(TokenExpiry::parse("2w"), Some(TokenExpiry(1_209_600)));
        assert_eq!(TokenExpiry::parse("3600"), Some(TokenExpiry(3_600)));
    }

    #[test]
    fn blank_falls_back_to_default() {
        assert_eq!(TokenExpiry::parse(""), Some(TokenExpiry::default()));
        assert_eq!(TokenExpiry::parse("   "), Some(TokenExpiry::default()));
        assert_eq!(TokenExpiry::default().as_secs(), 604_800);
    }

    #[test]
    fn rejects_nonsense() {
        assert_eq!(TokenExpiry::parse("abc"), None);
        assert_eq!(TokenExpiry::parse("10x"), None);
        assert_eq!(TokenExpiry::parse("-5m"), None);
        assert_eq!(TokenExpiry::parse("0"), None);
        assert_eq!(TokenExpiry::parse("d"), None);
    }

    #[test]
    fn deserializes_from_both_shapes() {
        let expiry: TokenExpiry = serde_json::from_value(json!(3600)).unwrap();
        assert_eq!(expiry.as_secs(), 3_600);

        let expiry: TokenExpiry = serde_json::from_value(json!("1d")).unwrap();
        assert_eq!(expiry.as_secs(), 86_400);

        let expiry: TokenExpiry = serde_json::from_value(json!("")).unwrap();
        assert_eq!(expiry, TokenExpiry::default());

        assert!(serde_json::from_value::<TokenExpiry>(json!("never")).is_err());
        assert!(serde_json::from_value::<TokenExpiry>(json!(-1)).is_err());
    }
}
