use axum::http::Method;
use axum::Router;

use super::http::{request, response_json};

pub async fn login_and_get_token(app: &Router) -> String {
    let (token, _user_id) = register_and_get_token(app).await;
    token
}

/// Returns (access_token, user_id).
pub async fn register_and_get_token(app: &Router) -> (String, String) {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());
    let password = "Passw0rd!";

    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": username,
            "password": password,
        })),
        &[],
    )
    .await;

    let (status, _headers, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    let access = body["data"]["accessToken"]
        .as_str()
        .expect("access token in register response")
        .to_string();
    let user_id = body["data"]["user"]["id"]
        .as_str()
        .expect("user id in register response")
        .to_string();

    (access, user_id)
}

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn setup_admin_and_get_token(app: &Router) -> String {
    let email = format!("admin-{}@test.com", uuid::Uuid::new_v4());
    let password = "AdminPassw0rd!";

    let response = request(
        app,
        Method::POST,
        "/api/admin/auth/setup",
        Some(serde_json::json!({
            "email": email,
            "password": password,
        })),
        &[],
    )
    .await;

    let (status, _headers, body) = response_json(response).await;
    assert!(status.is_success(), "admin setup failed: {body}");

    body["data"]["token"]
        .as_str()
        .expect("admin token in setup response")
        .to_string()
}
