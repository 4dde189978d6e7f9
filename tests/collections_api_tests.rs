// SPDX-License-Identifier: MIT

//! Collection endpoint tests against the Firestore emulator.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn unique_user_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

fn save_body(name: &str) -> String {
    serde_json::json!({
        "name": name,
        "flashcards": [
            {"front": "What is the powerhouse of the cell?", "back": "The mitochondria"},
            {"front": "What carries genetic information?", "back": "DNA"},
        ],
    })
    .to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_save_then_list_and_read() {
    require_emulator!();

    let (app, _state) = common::create_emulator_app().await;
    let user_id = unique_user_id("api-save");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&format!("/api/users/{}/collections", user_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(save_body("biology")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(&format!("/api/users/{}/collections", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body, serde_json::json!([{"name": "biology"}]));

    let response = app
        .oneshot(
            Request::builder()
                .uri(&format!("/api/users/{}/collections/biology", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body[0]["front"], "What is the powerhouse of the cell?");
    assert_eq!(body[0]["back"], "The mitochondria");
    assert_eq!(body[1]["front"], "What carries genetic information?");
}

#[tokio::test]
async fn test_duplicate_save_conflicts() {
    require_emulator!();

    let (app, state) = common::create_emulator_app().await;
    let user_id = unique_user_id("api-dup");

    // A paid user, so the duplicate is what gets rejected
    state
        .db
        .set_subscription_status(&user_id, flashdeck::models::SubscriptionStatus::Paid)
        .await
        .unwrap();

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(&format!("/api/users/{}/collections", user_id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(save_body("biology")))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_free_tier_second_save_forbidden() {
    require_emulator!();

    let (app, _state) = common::create_emulator_app().await;
    let user_id = unique_user_id("api-cap");

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&format!("/api/users/{}/collections", user_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(save_body("biology")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&format!("/api/users/{}/collections", user_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(save_body("chemistry")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_collection_is_404() {
    require_emulator!();

    let (app, _state) = common::create_emulator_app().await;
    let user_id = unique_user_id("api-missing");

    let response = app
        .oneshot(
            Request::builder()
                .uri(&format!("/api/users/{}/collections/nope", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscription_endpoint_defaults_to_free() {
    require_emulator!();

    let (app, _state) = common::create_emulator_app().await;
    let user_id = unique_user_id("api-sub");

    let response = app
        .oneshot(
            Request::builder()
                .uri(&format!("/api/users/{}/subscription", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "free");
}
