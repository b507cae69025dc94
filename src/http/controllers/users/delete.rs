use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::http::{Actor, Error};
use crate::services::users::DeleteAccount;
use crate::App;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

#[tracing::instrument(skip_all)]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    // Possession of any valid token authorizes the call; the subject
    // is not matched against the target id.
    let _claims = actor.require_auth()?;

    DeleteAccount { id: path.as_str() }.perform(&app).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "User deleted",
    }))
}
