use error_stack::ResultExt;
use sqlx::migrate::Migrator;
use tokio::time::Instant;
use tracing::info;

use super::{MigrationError, Pool};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Applies any migrations not yet present in the target database.
#[tracing::instrument(skip_all, name = "migrations.run_pending")]
pub async fn run_pending(pool: &Pool) -> error_stack::Result<(), MigrationError> {
    let now = Instant::now();
    info!("Performing database migrations... (this may take a while)");

    let mut conn = pool.get().await.change_context(MigrationError)?;
    MIGRATOR
        .run(&mut *conn)
        .await
        .change_context(MigrationError)?;

    let elapsed = now.elapsed();
    info!("Successfully performed database migrations! took {elapsed:.2?}");

    Ok(())
}
