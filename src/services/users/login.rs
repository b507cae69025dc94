use tokio::task::spawn_blocking;

use crate::http::{Error, Jwt};
use crate::schema::User;
use crate::types::{self, UserView};
use crate::util::password;
use crate::util::validation::{self, ValidateError};
use crate::util::Sensitive;
use crate::App;

/// Credential check that issues a bearer token on success. There is
/// no lockout; a wrong password fails the same way no matter how many
/// attempts came before it.
#[derive(Debug)]
pub struct Login<'a> {
    pub email: &'a str,
    pub password: Sensitive<&'a str>,
}

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub user: UserView,
}

impl Login<'_> {
    #[tracing::instrument(skip_all, name = "services.users.login")]
    pub async fn perform(self, app: &App) -> Result<LoginResult, Error> {
        let email = self.email.trim();

        let mut form = ValidateError::default();
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

        // We need the latest account state to check credentials.
        let mut conn = app.db_read_prefer_primary().await?;
        let Some(user) = User::find_by_email(&mut conn, &email).await? else {
            #[derive(Debug, thiserror::Error)]
            #[error("No account under the given email")]
            struct UnknownEmail;
            return Err(Error::from_context(types::Error::NotFound, UnknownEmail));
        };
        drop(conn);

        let password = self.password.as_str().to_owned();
        let stored_hash = user.password_hash.clone();
        let matched = spawn_blocking(move || password::verify(password, &stored_hash)).await?;

        if !matched {
            #[derive(Debug, thiserror::Error)]
            #[error("Password mismatch")]
            struct BadPassword;
            return Err(Error::from_context(
                types::Error::InvalidCredentials,
                BadPassword,
            ));
        }

        let expires_in = app.config.auth.token_expires.as_secs();
        let token = Jwt::new(user.id, user.email.clone(), expires_in).encode(&app.config.auth)?;

        Ok(LoginResult {
            token,
            user: user.into(),
        })
    }
}
