use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::http::{Actor, Error};
use crate::services::users::Me;
use crate::types::UserView;
use crate::App;

#[derive(Debug, Serialize)]
pub struct GetResponse {
    pub user: UserView,
}

#[tracing::instrument(skip_all)]
pub async fn get(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let claims = actor.require_auth()?;
    let user = Me { id: claims.sub }.perform(&app).await?;

    Ok(HttpResponse::Ok().json(GetResponse { user }))
}
