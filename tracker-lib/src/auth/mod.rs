use actix_web::dev::ServiceRequest;
use actix_web::{web, Error, HttpMessage, Scope};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jwt::JWTAuth;
use tracing_actix_web::RootSpan;
use tracker_repo::user_repo::UserId;

use crate::error::HandlerError;

pub mod handlers;
pub mod jwt;
pub mod password;

pub fn auth_service() -> Scope {
    web::scope("")
        .service(handlers::register)
        .service(handlers::login)
}

/// Validates credentials using [JWTAuth]. If valid, injects the user id into
/// the request and into the [RootSpan]. A missing Authorization header is
/// rejected with 401 by the bearer extractor before this runs; a header that
/// fails validation gets 403, whatever the reason.
pub async fn credentials_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let jwt_auth = req.app_data::<JWTAuth>().unwrap();
    match jwt_auth.validate_token(credentials.token()) {
        Ok(user_id) => {
            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", user_id);
            }
            req.extensions_mut().insert::<UserId>(user_id);
            Ok(req)
        }
        Err(rejection) => {
            tracing::debug!(?rejection, "token rejected");
            Err((HandlerError::InvalidToken.into(), req))
        }
    }
}
