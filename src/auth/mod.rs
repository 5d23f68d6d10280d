//! Signup/login and the bearer-credential extractor.
//!
//! Credentials are opaque to callers: an HS256 JWT carrying the user id,
//! attached as `Authorization: Bearer <token>` on every authenticated call.

pub mod jwt;
pub mod password;

use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header, request::Parts},
    routing::post,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, config::Config};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[derive(Deserialize)]
pub(crate) struct SignupBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub(crate) struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    Json(SignupBody { name, email, password }): Json<SignupBody>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("Please provide name, email and password".to_owned()));
    }

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email=?")
        .bind(&email)
        .fetch_optional(&db_pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("User already exists".to_owned()));
    }

    let id = Uuid::now_v7();
    let password_hash = password::hash_password(&password).map_err(|e| anyhow::anyhow!(e))?;
    sqlx::query("INSERT INTO users (id,name,email,password_hash,created_at) VALUES (?,?,?,?,?)")
        .bind(id.to_string())
        .bind(&name)
        .bind(&email)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(&db_pool)
        .await?;

    info!(%id, email, "user signed up");

    let token = jwt::issue_token(id, &config.jwt_secret, config.token_expiry_hours)
        .map_err(anyhow::Error::from)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { token, user: UserInfo { id, name, email } }),
    ))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    Json(LoginBody { email, password }): Json<LoginBody>,
) -> AppResult<Json<AuthResponse>> {
    let row: Option<(String, String, String, String)> =
        sqlx::query_as("SELECT id,name,email,password_hash FROM users WHERE email=?")
            .bind(&email)
            .fetch_optional(&db_pool)
            .await?;

    let Some((id, name, email, password_hash)) = row else {
        return Err(AppError::Unauthorized("Invalid email or password".to_owned()));
    };

    let matches = password::verify_password(&password, &password_hash)
        .map_err(|e| anyhow::anyhow!(e))?;
    if !matches {
        return Err(AppError::Unauthorized("Invalid email or password".to_owned()));
    }

    let id = Uuid::parse_str(&id).map_err(anyhow::Error::from)?;
    let token = jwt::issue_token(id, &config.jwt_secret, config.token_expiry_hours)
        .map_err(anyhow::Error::from)?;
    Ok(Json(AuthResponse { token, user: UserInfo { id, name, email } }))
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
pub struct AuthUser {
    pub id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<Config>::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_owned()))?;

        let claims = jwt::validate_token(token, &config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Not authorized, token failed".to_owned()))?;

        Ok(AuthUser { id: claims.sub })
    }
}

/// Like [`AuthUser`], but yields `None` instead of rejecting when no valid
/// credential is attached. Used where public tours are readable anonymously.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(AuthUser::from_request_parts(parts, state).await.ok()))
    }
}
