mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::auth::{auth_header, login_and_get_token, register_and_get_token};
use common::http::{assert_json_error, assert_status_ok_json, request, response_json};

#[tokio::test]
async fn it_register_then_me() {
    let app = spawn_test_server().await;
    let (token, user_id) = register_and_get_token(&app.app).await;

    let response = request(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["id"], user_id.as_str());
}

#[tokio::test]
async fn it_me_requires_auth() {
    let app = spawn_test_server().await;

    let response = request(&app.app, Method::GET, "/api/users/me", None, &[]).await;
    let (status, _, _) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_register_rejects_weak_password() {
    let app = spawn_test_server().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "weak@test.com",
            "username": "weakling",
            "password": "short",
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "AUTH_WEAK_PASSWORD");
}

#[tokio::test]
async fn it_duplicate_email_conflicts() {
    let app = spawn_test_server().await;

    let payload = serde_json::json!({
        "email": "dupe@test.com",
        "username": "first-user",
        "password": "Passw0rd!",
    });
    let response = request(&app.app, Method::POST, "/api/auth/register", Some(payload), &[]).await;
    assert!(response.status().is_success());

    let payload = serde_json::json!({
        "email": "dupe@test.com",
        "username": "second-user",
        "password": "Passw0rd!",
    });
    let response = request(&app.app, Method::POST, "/api/auth/register", Some(payload), &[]).await;
    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "AUTH_EMAIL_EXISTS");
}

#[tokio::test]
async fn it_login_with_wrong_password_fails() {
    let app = spawn_test_server().await;

    let email = "login-test@test.com";
    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": "login-user",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;
    assert!(response.status().is_success());

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": email, "password": "WrongPass1"})),
        &[],
    )
    .await;
    let (status, _, _) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": email, "password": "Passw0rd!"})),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert!(body["data"]["accessToken"].is_string());
}

#[tokio::test]
async fn it_logout_revokes_session() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app).await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/logout",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    assert!(response.status().is_success());

    let response = request(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, _) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
