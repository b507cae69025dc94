mod delete_account;
mod list;
mod login;
mod me;
mod register;
mod update_profile;

pub use delete_account::DeleteAccount;
pub use list::{ListUsers, ListUsersResult};
pub use login::{Login, LoginResult};
pub use me::Me;
pub use register::{Register, RegisterResult};
pub use update_profile::UpdateProfile;

use crate::http::Error;
use crate::types::{self, UserId};

/// Identifiers arriving over HTTP are opaque strings; they must be
/// structurally sound before anything touches the database.
fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<UserId>()
        .map_err(|e| Error::from_context(types::Error::InvalidUserId, e))
}

#[cfg(test)]
mod tests {
    use super::parse_user_id;
    use crate::types;

    #[test]
    fn surfaces_invalid_ids_before_any_query() {
        assert!(parse_user_id("31").is_ok());

        let error = parse_user_id("64c8f0d1b2").unwrap_err();
        assert_eq!(error.as_type(), &types::Error::InvalidUserId);

        let error = parse_user_id("-2").unwrap_err();
        assert_eq!(error.as_type(), &types::Error::InvalidUserId);
    }
}
