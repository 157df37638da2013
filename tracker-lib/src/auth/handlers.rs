use crate::auth::jwt::JWTAuth;
use crate::auth::password;
use crate::error::HandlerError;
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use tracker_repo::user_repo::{NewUser, UserRepo};

#[derive(Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[post("/register")]
pub async fn register(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(HandlerError::Validation(
            "Username and password are required".to_owned(),
        ));
    }

    let password_hash = password::encode_password(&credentials.password)?;
    let user = user_repo
        .create_user(NewUser {
            username: credentials.username,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "registered user");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully"
    })))
}

#[post("/login")]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    credentials: web::Json<Credentials>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(HandlerError::Validation(
            "Username and password are required".to_owned(),
        ));
    }

    // An unknown username converts to the same 401 as a bad password.
    let user = user_repo
        .get_user_by_username(&credentials.username)
        .await?;

    if !password::verify_password(&credentials.password, &user.password_hash) {
        return Err(HandlerError::InvalidCredentials);
    }

    let jwt_auth = req.app_data::<JWTAuth>().unwrap();
    let token = jwt_auth.create_token(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
