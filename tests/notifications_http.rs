mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;

use common::app::spawn_test_server;
use common::auth::{auth_header, register_and_get_token};
use common::http::{assert_status_ok_json, request, response_json};
use dailyword_backend::store::operations::notifications::{Notification, NotificationType};

fn seed_notification(store: &dailyword_backend::store::Store, user_id: &str, id: &str) {
    store
        .create_notification(&Notification {
            id: id.to_string(),
            user_id: user_id.to_string(),
            notification_type: NotificationType::WordDelivery,
            title: "Word of the day".to_string(),
            message: "test".to_string(),
            read: false,
            created_at: Utc::now(),
        })
        .unwrap();
}

#[tokio::test]
async fn it_list_and_mark_read() {
    let app = spawn_test_server().await;
    let (token, user_id) = register_and_get_token(&app.app).await;
    seed_notification(app.state.store(), &user_id, "n1");
    seed_notification(app.state.store(), &user_id, "n2");

    let response = request(
        &app.app,
        Method::GET,
        "/api/notifications",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = request(
        &app.app,
        Method::POST,
        "/api/notifications/n1/read",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["read"], true);

    let response = request(
        &app.app,
        Method::GET,
        "/api/notifications/unread-count",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["unread"], 1);
}

#[tokio::test]
async fn it_mark_read_for_missing_notification_is_404() {
    let app = spawn_test_server().await;
    let (token, _user_id) = register_and_get_token(&app.app).await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/notifications/missing/read",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, _) = response_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_notifications_are_scoped_to_the_caller() {
    let app = spawn_test_server().await;
    let (token_a, user_a) = register_and_get_token(&app.app).await;
    let (token_b, _user_b) = register_and_get_token(&app.app).await;
    seed_notification(app.state.store(), &user_a, "n1");

    let response = request(
        &app.app,
        Method::GET,
        "/api/notifications",
        None,
        &[("authorization", auth_header(&token_a))],
    )
    .await;
    let (_, _, body) = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = request(
        &app.app,
        Method::GET,
        "/api/notifications",
        None,
        &[("authorization", auth_header(&token_b))],
    )
    .await;
    let (_, _, body) = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
