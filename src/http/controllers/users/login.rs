use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::http::Error;
use crate::services::users::Login;
use crate::types::UserView;
use crate::util::Sensitive;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub email: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub message: &'static str,
    pub user: UserView,
    pub token: String,
}

#[tracing::instrument(skip_all)]
pub async fn post(
    app: web::Data<App>,
    request: web::Json<PostRequest>,
) -> Result<HttpResponse, Error> {
    let result = Login {
        email: &request.email,
        password: Sensitive::new(request.password.as_str()),
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        message: "Logged in",
        user: result.user,
        token: result.token,
    }))
}
