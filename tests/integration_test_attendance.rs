mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Duration;
use common::{next_date_for_weekday, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn generate(app: &TestApp, lesson_id: &str, date: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/lessons/{}/occurrences", lesson_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "date": date }).to_string()))
            .unwrap()
    ).await.unwrap()
}

async fn post_action(app: &TestApp, record_id: &str, action: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/attendance/{}/{}", record_id, action))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_generation_reports_gap_for_cardless_attendee() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let with_card = app.seed_customer("anna").await;
    let without_card = app.seed_customer("bart").await;
    app.seed_card(&with_card, 10, 90).await;
    app.seed_roster_entry(&lesson, &with_card, None).await;
    app.seed_roster_entry(&lesson, &without_card, None).await;

    let date = next_date_for_weekday(2).to_string();
    let res = generate(&app, &lesson.id, &date).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    let gaps = body["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["customer_id"], without_card.id.as_str());
    assert_eq!(gaps[0]["reason"], "no active credit card");
}

#[tokio::test]
async fn test_generation_rejects_wrong_weekday() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;

    let wrong_date = (next_date_for_weekday(2) + Duration::days(1)).to_string();
    let res = generate(&app, &lesson.id, &wrong_date).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generation_is_idempotent_per_attendee() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let first = parse_body(generate(&app, &lesson.id, &date).await).await;
    assert_eq!(first["records"].as_array().unwrap().len(), 1);

    let second = parse_body(generate(&app, &lesson.id, &date).await).await;
    assert!(second["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_attended_deducts_one_credit() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    let card = app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let record_id = body["records"][0]["id"].as_str().unwrap().to_string();

    let res = post_action(&app, &record_id, "attend").await;
    assert_eq!(res.status(), StatusCode::OK);
    let outcome = parse_body(res).await;
    assert_eq!(outcome["record"]["status"], "ATTENDED");
    assert_eq!(outcome["record"]["auto_deducted"], true);
    assert_eq!(outcome["credit_deducted"], true);

    let card = app.state.card_repo.find_by_id(&card.id).await.unwrap().unwrap();
    assert_eq!(card.remaining_credits, 9);
    assert_eq!(card.used_credits, 1);
}

#[tokio::test]
async fn test_attend_with_empty_card_lands_in_not_counted() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    let card = app.seed_card(&customer, 1, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let record_id = body["records"][0]["id"].as_str().unwrap().to_string();

    // Drain the card behind the ledger's back.
    app.state.card_repo.deduct(&card.id, 1).await.unwrap();

    let res = post_action(&app, &record_id, "attend").await;
    assert_eq!(res.status(), StatusCode::OK);
    let outcome = parse_body(res).await;
    assert_eq!(outcome["record"]["status"], "NOT_COUNTED");
    assert_eq!(outcome["credit_deducted"], false);
}

#[tokio::test]
async fn test_cancel_is_idempotent_and_restores_nothing_extra() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    let card = app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let record_id = body["records"][0]["id"].as_str().unwrap().to_string();

    let first = parse_body(post_action(&app, &record_id, "cancel").await).await;
    assert_eq!(first["status"], "CANCELLED");

    let second_res = post_action(&app, &record_id, "cancel").await;
    assert_eq!(second_res.status(), StatusCode::OK);
    let second = parse_body(second_res).await;
    assert_eq!(second["status"], "CANCELLED");

    // No deduction ever happened, so the balance is untouched either way.
    let card = app.state.card_repo.find_by_id(&card.id).await.unwrap().unwrap();
    assert_eq!(card.remaining_credits, 10);
}

#[tokio::test]
async fn test_correction_restores_a_deducted_credit() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    let card = app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let record_id = body["records"][0]["id"].as_str().unwrap().to_string();

    post_action(&app, &record_id, "attend").await;

    let res = post_action(&app, &record_id, "not-counted").await;
    assert_eq!(res.status(), StatusCode::OK);
    let corrected = parse_body(res).await;
    assert_eq!(corrected["status"], "NOT_COUNTED");
    assert_eq!(corrected["auto_deducted"], false);

    let card = app.state.card_repo.find_by_id(&card.id).await.unwrap().unwrap();
    assert_eq!(card.remaining_credits, 10);
    assert_eq!(card.used_credits, 0);
}

#[tokio::test]
async fn test_attended_record_cannot_be_cancelled_directly() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let record_id = body["records"][0]["id"].as_str().unwrap().to_string();

    post_action(&app, &record_id, "attend").await;

    let res = post_action(&app, &record_id, "cancel").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_occurrence_records_listing() {
    let app = TestApp::new().await;
    let lesson = app.seed_lesson(2, 8).await;
    let customer = app.seed_customer("anna").await;
    app.seed_card(&customer, 10, 90).await;
    app.seed_roster_entry(&lesson, &customer, None).await;

    let date = next_date_for_weekday(2).to_string();
    let body = parse_body(generate(&app, &lesson.id, &date).await).await;
    let occurrence_id = body["occurrence_id"].as_str().unwrap();

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/occurrences/{}/records", occurrence_id))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let records = parse_body(res).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}
