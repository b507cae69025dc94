use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use super::{Error, Jwt};
use crate::{types, App};

/// Identity attached to a request, derived from the Authorization
/// header. `Anonymous` means no bearer token was presented at all; a
/// presented but unverifiable token rejects the request outright.
#[derive(Debug)]
pub enum Actor {
    Anonymous,
    Authenticated(Jwt),
}

impl Actor {
    pub fn require_auth(self) -> Result<Jwt, Error> {
        #[derive(Debug, Error)]
        #[error("Attempt to access user-only route")]
        struct Unauthorized;

        match self {
            Self::Authenticated(claims) => Ok(claims),
            Self::Anonymous => Err(Error::from_context(types::Error::Unauthorized, Unauthorized)),
        }
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Box::pin(ready(Ok(Actor::Anonymous)));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            #[derive(Debug, Error)]
            #[error("The web app has no available configuration")]
            struct NoConfig;
            return Box::pin(ready(Err(Error::from_context(
                types::Error::Internal,
                NoConfig,
            ))));
        };

        let result = Jwt::decode(token, &app.config.auth).map(Actor::Authenticated);
        Box::pin(ready(result))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::dev::Payload;
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;

    use super::Actor;
    use crate::types;

    #[tokio::test]
    async fn missing_header_means_anonymous() {
        let req = TestRequest::default().to_http_request();
        let actor = Actor::from_request(&req, &mut Payload::None).await.unwrap();
        assert!(matches!(actor, Actor::Anonymous));
    }

    #[tokio::test]
    async fn non_bearer_scheme_means_anonymous() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();

        let actor = Actor::from_request(&req, &mut Payload::None).await.unwrap();
        assert!(matches!(actor, Actor::Anonymous));
    }

    #[test]
    fn anonymous_actors_cannot_pass_auth() {
        let error = Actor::Anonymous.require_auth().unwrap_err();
        assert_eq!(error.as_type(), &types::Error::Unauthorized);
    }
}
