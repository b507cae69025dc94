use tokio::task::spawn_blocking;

use super::parse_user_id;
use crate::http::Error;
use crate::schema::{UpdateUser, User};
use crate::types::{self, UserView};
use crate::util::password;
use crate::util::validation::{self, ValidateError};
use crate::util::Sensitive;
use crate::App;

/// Partial profile update. Blank-after-trim fields count as omitted;
/// a request that effectively provides nothing is rejected before the
/// store is touched.
#[derive(Debug)]
pub struct UpdateProfile<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<Sensitive<&'a str>>,
}

impl UpdateProfile<'_> {
    #[tracing::instrument(skip_all, name = "services.users.update_profile")]
    pub async fn perform(self, app: &App) -> Result<UserView, Error> {
        let id = parse_user_id(self.id)?;

        let name = effective(self.name);
        let email = effective(self.email);
        let password = self.password.and_then(|v| effective(Some(v.into_inner())));

        if name.is_none() && email.is_none() && password.is_none() {
            #[derive(Debug, thiserror::Error)]
            #[error("Update request carried no usable fields")]
            struct EmptyUpdate;
            return Err(Error::from_context(
                types::Error::NoFieldsProvided,
                EmptyUpdate,
            ));
        }

        let mut form = ValidateError::default();
        if let Some(email) = email {
            if !validation::is_valid_email(email) {
                form.push("email", "invalid email");
            }
        }
        if let Some(password) = password {
            if !validation::is_valid_password(password) {
                form.push("password", "password must be >= 6 chars");
            }
        }
        if !form.is_empty() {
            return Err(form.into());
        }

        let email = email.map(str::to_lowercase);

        let mut conn = app.db_write().await?;
        if let Some(email) = email.as_deref() {
            // The user's own current email is not a conflict.
            if User::check_email_taken_by_other(&mut conn, email, id).await? {
                #[derive(Debug, thiserror::Error)]
                #[error("Email belongs to another account")]
                struct EmailInUse;
                return Err(Error::from_context(types::Error::EmailTaken, EmailInUse));
            }
        }

        let password_hash = match password {
            Some(password) => {
                let password = password.to_owned();
                let hash = spawn_blocking(move || password::hash(password))
                    .await?
                    .map_err(|e| Error::from_report(types::Error::Internal, e))?;
                Some(hash)
            }
            None => None,
        };

        let update = UpdateUser {
            id,
            name,
            email: email.as_deref(),
            password_hash: password_hash.as_deref(),
        };

        let Some(user) = update.update(&mut conn).await? else {
            #[derive(Debug, thiserror::Error)]
            #[error("Account no longer exists")]
            struct Gone;
            return Err(Error::from_context(types::Error::NotFound, Gone));
        };

        Ok(user.into())
    }
}

/// Trims a provided field and drops it entirely when nothing is left.
fn effective(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::effective;

    #[test]
    fn blank_fields_count_as_omitted() {
        assert_eq!(effective(None), None);
        assert_eq!(effective(Some("")), None);
        assert_eq!(effective(Some("   ")), None);
        assert_eq!(effective(Some("  Ana ")), Some("Ana"));
    }
}
