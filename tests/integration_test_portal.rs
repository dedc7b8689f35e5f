mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use manege_backend::domain::models::api_key::ApiKey;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn portal_me(app: &TestApp, key: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/api/v1/portal/me");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    app.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

#[tokio::test]
async fn test_missing_key_is_401_with_code() {
    let app = TestApp::new().await;
    let res = portal_me(&app, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "MISSING_API_KEY");
}

#[tokio::test]
async fn test_unknown_key_is_401_with_code() {
    let app = TestApp::new().await;
    let res = portal_me(&app, Some("nope")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "INVALID_API_KEY");
}

#[tokio::test]
async fn test_expired_key_is_rejected_and_not_touched() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;

    let key = ApiKey::new(customer.id.clone(), Some(Utc::now() - Duration::hours(1)));
    let created = app.state.api_key_repo.create(&key).await.unwrap();

    let res = portal_me(&app, Some(&created.api_key)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "INVALID_API_KEY");

    let stored = app.state.api_key_repo.find_by_key(&created.api_key).await.unwrap().unwrap();
    assert!(stored.last_used_at.is_none());
}

#[tokio::test]
async fn test_revoked_key_is_rejected() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;
    let key = app.state.api_key_repo.create(&ApiKey::new(customer.id.clone(), None)).await.unwrap();

    sqlx::query("UPDATE api_keys SET status = 'REVOKED' WHERE id = ?")
        .bind(&key.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = portal_me(&app, Some(&key.api_key)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_key_returns_snapshot_and_touches_last_used() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("carla").await;
    let dependent = app.seed_dependent(&customer, "Kim").await;
    let lesson = app.seed_lesson(0, 8).await;
    app.seed_roster_entry(&lesson, &customer, Some(dependent.id.clone())).await;
    app.seed_card(&customer, 12, 90).await;
    app.seed_open_transaction(&customer, "Leskaart augustus", 15000).await;

    let key = app.state.api_key_repo.create(&ApiKey::new(customer.id.clone(), None)).await.unwrap();

    let res = portal_me(&app, Some(&key.api_key)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["customer"]["id"], customer.id.as_str());
    assert_eq!(body["totaalResterendeLessen"], 12);
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);
    assert_eq!(body["dependents"].as_array().unwrap().len(), 1);
    assert_eq!(body["open_transactions"].as_array().unwrap().len(), 1);
    assert!(body["failed_sections"].as_array().unwrap().is_empty());

    // Dutch locale (default), lesson seeded on Monday, attended via dependent.
    let lessons = body["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["day_name"], "maandag");
    assert_eq!(lessons[0]["start_time"], "10:00");
    assert_eq!(lessons[0]["via_dependent"], true);
    assert_eq!(lessons[0]["attendee_name"], "Kim");

    let stored = app.state.api_key_repo.find_by_key(&key.api_key).await.unwrap().unwrap();
    assert!(stored.last_used_at.is_some());
}

#[tokio::test]
async fn test_snapshot_degrades_per_section_instead_of_failing() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("carla").await;
    let lesson = app.seed_lesson(0, 8).await;
    app.seed_roster_entry(&lesson, &customer, None).await;
    app.seed_card(&customer, 12, 90).await;

    // Break exactly one sub-query; everything else must still come back.
    sqlx::query("DROP TABLE transactions")
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/customers/{}/snapshot", customer.id))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["totaalResterendeLessen"], 12);
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);
    assert_eq!(body["lessons"].as_array().unwrap().len(), 1);
    assert!(body["open_transactions"].is_null());

    let failures = body["failed_sections"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["section"], "open_transactions");
}

#[tokio::test]
async fn test_snapshot_lessons_exclude_inactive_dependents() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("carla").await;
    let dependent = app.seed_dependent(&customer, "Kim").await;
    let lesson = app.seed_lesson(0, 8).await;
    app.seed_roster_entry(&lesson, &customer, Some(dependent.id.clone())).await;

    sqlx::query("UPDATE dependents SET status = 'INACTIVE' WHERE id = ?")
        .bind(&dependent.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let key = app.state.api_key_repo.create(&ApiKey::new(customer.id.clone(), None)).await.unwrap();
    let res = portal_me(&app, Some(&key.api_key)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    // The roster entry still exists, but the attendee is inactive, so the
    // lesson must not be rendered as upcoming.
    assert!(body["lessons"].as_array().unwrap().is_empty());
    assert!(body["failed_sections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_key_for_deleted_customer_is_404_customer_not_found() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;
    let key = app.state.api_key_repo.create(&ApiKey::new(customer.id.clone(), None)).await.unwrap();

    // The store never hard-deletes customers in production; simulate the
    // inconsistent-upstream case directly.
    sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(&customer.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = portal_me(&app, Some(&key.api_key)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
}

#[tokio::test]
async fn test_api_key_issue_endpoint() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/customers/{}/api-keys", customer.id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({}).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let issued_key = body["api_key"].as_str().unwrap();
    assert_eq!(issued_key.len(), 48);

    let res = portal_me(&app, Some(issued_key)).await;
    assert_eq!(res.status(), StatusCode::OK);
}
