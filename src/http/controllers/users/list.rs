use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::http::Error;
use crate::services::users::ListUsers;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct GetQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn get(app: web::Data<App>, query: web::Query<GetQuery>) -> Result<HttpResponse, Error> {
    let result = ListUsers {
        query: query.q.as_deref(),
        page: query.page,
        limit: query.limit,
        sort: query.sort.as_deref(),
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(result))
}
