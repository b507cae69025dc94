use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::http::{Actor, Error};
use crate::services::users::UpdateProfile;
use crate::types::UserView;
use crate::util::Sensitive;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct PatchRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Sensitive<String>>,
}

#[derive(Debug, Serialize)]
pub struct PatchResponse {
    pub message: &'static str,
    pub user: UserView,
}

#[tracing::instrument(skip_all)]
pub async fn patch(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
    request: web::Json<PatchRequest>,
) -> Result<HttpResponse, Error> {
    // Possession of any valid token authorizes the call; the subject
    // is not matched against the target id.
    let _claims = actor.require_auth()?;

    let user = UpdateProfile {
        id: path.as_str(),
        name: request.name.as_deref(),
        email: request.email.as_deref(),
        password: request.password.as_ref().map(|v| v.as_deref()),
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(PatchResponse {
        message: "User updated",
        user,
    }))
}
