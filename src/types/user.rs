use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::UserId;
use crate::schema::User;

/// The subset of a stored user that any caller may see. Conversion
/// from [`User`] drops the password hash by construction; there is no
/// way to serialize it through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> UserView {
        User {
            id: UserId(7),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
        }
        .into()
    }

    #[test]
    fn never_carries_the_password_hash() {
        let value = serde_json::to_value(sample()).unwrap();
        let keys = value.as_object().unwrap();
        assert!(!keys.contains_key("password_hash"));
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn timestamps_render_as_iso8601() {
        let value = serde_json::to_value(sample()).unwrap();
        let created_at = value["created_at"].as_str().unwrap();
        assert!(created_at.starts_with("2024-05-01T12:00:00"));
        assert!(created_at.contains('T'));
    }
}
