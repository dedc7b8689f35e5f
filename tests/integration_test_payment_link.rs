mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::Value;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn request_link(app: &TestApp, transaction_id: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/transactions/{}/payment-link", transaction_id))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_payment_link_created_and_stored() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;
    let transaction = app.seed_open_transaction(&customer, "Leskaart september", 15000).await;

    let res = request_link(&app, &transaction.id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["transaction_id"], transaction.id.as_str());
    assert_eq!(body["payment_id"], "pay_test_1");
    assert_eq!(body["payment_url"], "https://pay.example/pay_test_1");

    let stored = app.state.transaction_repo.find_by_id(&transaction.id).await.unwrap().unwrap();
    assert_eq!(stored.payment_id.as_deref(), Some("pay_test_1"));
}

#[tokio::test]
async fn test_payment_link_rejected_for_paid_transaction() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("anna").await;
    let transaction = app.seed_open_transaction(&customer, "Leskaart september", 15000).await;

    sqlx::query("UPDATE transactions SET status = 'PAID' WHERE id = ?")
        .bind(&transaction.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = request_link(&app, &transaction.id).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_payment_link_unknown_transaction_is_404() {
    let app = TestApp::new().await;
    let res = request_link(&app, "missing").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
