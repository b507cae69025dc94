use super::parse_user_id;
use crate::http::Error;
use crate::schema::User;
use crate::types;
use crate::App;

/// Permanent account removal. There is no soft-delete and nothing to
/// cascade; tokens issued earlier keep verifying until they expire
/// but their subject stops resolving.
#[derive(Debug)]
pub struct DeleteAccount<'a> {
    pub id: &'a str,
}

impl DeleteAccount<'_> {
    #[tracing::instrument(skip(app), name = "services.users.delete_account")]
    pub async fn perform(self, app: &App) -> Result<(), Error> {
        let id = parse_user_id(self.id)?;

        let mut conn = app.db_write().await?;
        if !User::delete(&mut conn, id).await? {
            #[derive(Debug, thiserror::Error)]
            #[error("Account no longer exists")]
            struct Gone;
            return Err(Error::from_context(types::Error::NotFound, Gone));
        }

        Ok(())
    }
}
