use axum::extract::State;
use axum::routing::post;
use axum::Router;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, hash_token, sign_jwt_for_admin, verify_password};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::admins::Admin;
use crate::store::operations::sessions::Session;
use crate::validation::{is_valid_email, validate_password};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/setup", post(setup))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminCredentials {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminAuthResponse {
    token: String,
    admin_id: String,
}

fn issue_admin_token(admin_id: &str, state: &AppState) -> Result<String, AppError> {
    let token = sign_jwt_for_admin(
        admin_id,
        &state.config().admin_jwt_secret,
        state.config().admin_jwt_expires_in_hours,
    )?;

    state.store().create_admin_session(&Session {
        token_hash: hash_token(&token),
        user_id: admin_id.to_string(),
        token_type: "admin".to_string(),
        created_at: Utc::now(),
        expires_at: Utc::now()
            + Duration::hours(state.config().admin_jwt_expires_in_hours as i64),
        revoked: false,
    })?;

    Ok(token)
}

/// Bootstrap the first admin account. Refused once any admin exists;
/// further admins are provisioned out of band.
async fn setup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AdminCredentials>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if state.store().count_admins()? > 0 {
        return Err(AppError::forbidden("Admin account already exists"));
    }

    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request(
            "AUTH_INVALID_EMAIL",
            "Invalid email format",
        ));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }

    let admin = Admin {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        created_at: Utc::now(),
    };
    state.store().create_admin(&admin)?;

    let token = issue_admin_token(&admin.id, &state)?;
    Ok(created(AdminAuthResponse {
        token,
        admin_id: admin.id,
    }))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AdminCredentials>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    let admin = state
        .store()
        .get_admin_by_email(&email)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !verify_password(&req.password, &admin.password_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = issue_admin_token(&admin.id, &state)?;
    Ok(ok(AdminAuthResponse {
        token,
        admin_id: admin.id,
    }))
}
