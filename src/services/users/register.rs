use tokio::task::spawn_blocking;

use crate::http::Error;
use crate::schema::{InsertUser, User};
use crate::types::{self, UserView};
use crate::util::password;
use crate::util::validation::{self, ValidateError};
use crate::util::Sensitive;
use crate::App;

/// New-account request. All validation and the email-uniqueness rules
/// live here; the HTTP layer only parses the body.
///
/// Registration deliberately does not issue a token. Logging in is a
/// separate step.
#[derive(Debug)]
pub struct Register<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: Sensitive<&'a str>,
}

#[derive(Debug)]
pub struct RegisterResult {
    pub user: UserView,
}

impl Register<'_> {
    #[tracing::instrument(skip_all, name = "services.users.register")]
    pub async fn perform(self, app: &App) -> Result<RegisterResult, Error> {
        let name = self.name.trim();
        let email = self.email.trim();

        let mut form = ValidateError::default();
        if name.is_empty() {
            form.push("name", "name is required");
        }
        if !validation::is_valid_email(email) {
            form.push("email", "invalid email");
        }
        if !validation::is_valid_password(self.password.as_str()) {
            form.push("password", "password must be >= 6 chars");
        }
        if !form.is_empty() {
            return Err(form.into());
        }

        let email = email.to_lowercase();

        let mut conn = app.db_write().await?;
        if User::check_email_taken(&mut conn, &email).await? {
            #[derive(Debug, thiserror::Error)]
            #[error("Email is already registered")]
            struct EmailInUse;
            return Err(Error::from_context(types::Error::EmailTaken, EmailInUse));
        }

        let password = self.password.as_str().to_owned();
        let password_hash = spawn_blocking(move || password::hash(password))
            .await?
            .map_err(|e| Error::from_report(types::Error::Internal, e))?;

        // The unique index still guards against a concurrent
        // registration winning the race after the check above; a lost
        // race surfaces as the same conflict.
        let user = InsertUser {
            name,
            email: &email,
            password_hash: &password_hash,
        }
        .insert(&mut conn)
        .await?;

        Ok(RegisterResult { user: user.into() })
    }
}
