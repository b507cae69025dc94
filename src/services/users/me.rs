use crate::http::Error;
use crate::schema::User;
use crate::types::{self, UserId, UserView};
use crate::App;

/// Self-lookup for an already-verified token subject. The token can
/// outlive its account, so the lookup still has to decide.
#[derive(Debug)]
pub struct Me {
    pub id: UserId,
}

impl Me {
    #[tracing::instrument(skip(app), name = "services.users.me")]
    pub async fn perform(self, app: &App) -> Result<UserView, Error> {
        let mut conn = app.db_read().await?;
        let Some(user) = User::find(&mut conn, self.id).await? else {
            #[derive(Debug, thiserror::Error)]
            #[error("Account no longer exists")]
            struct Gone;
            return Err(Error::from_context(types::Error::NotFound, Gone));
        };

        Ok(user.into())
    }
}
