use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    extract_token_from_headers, hash_password, hash_token, sign_jwt_for_user, verify_password,
    AuthUser,
};
use crate::constants::DEFAULT_MAX_USERS;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::User;
use crate::validation::{is_valid_email, validate_password, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            email: value.email.clone(),
            username: value.username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Issue an access token and persist its session row.
fn issue_token(user_id: &str, state: &AppState) -> Result<String, AppError> {
    let access_token = sign_jwt_for_user(
        user_id,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    let token_hash = hash_token(&access_token);
    state.store().create_session(&Session {
        token_hash,
        user_id: user_id.to_string(),
        token_type: "user".to_string(),
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(state.config().jwt_expires_in_hours as i64),
        revoked: false,
    })?;

    Ok(access_token)
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request(
            "AUTH_INVALID_EMAIL",
            "Invalid email format",
        ));
    }
    let username = req.username.trim();
    if let Err(msg) = validate_username(username) {
        return Err(AppError::bad_request("AUTH_INVALID_USERNAME", msg));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }

    if state.store().get_user_by_email(&email)?.is_some() {
        return Err(AppError::conflict(
            "AUTH_EMAIL_EXISTS",
            "Email already registered",
        ));
    }

    if state.store().count_users()? as u64 >= DEFAULT_MAX_USERS {
        return Err(AppError::forbidden("User registration limit reached"));
    }

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        username: username.to_string(),
        password_hash: hash_password(&req.password)?,
        is_banned: false,
        created_at: now,
        updated_at: now,
    };

    state.store().create_user(&user)?;

    let access_token = issue_token(&user.id, &state)?;

    Ok(created(AuthResponse {
        access_token,
        user: UserProfile::from(&user),
    })
    .into_response())
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = state
        .store()
        .get_user_by_email(&email)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    if user.is_banned {
        return Err(AppError::forbidden("User is banned"));
    }

    let access_token = issue_token(&user.id, &state)?;

    Ok(ok(AuthResponse {
        access_token,
        user: UserProfile::from(&user),
    })
    .into_response())
}

async fn logout(
    _user: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = extract_token_from_headers(&headers)?;
    state.store().delete_session(&hash_token(&token))?;
    Ok(ok(serde_json::json!({"loggedOut": true})).into_response())
}
