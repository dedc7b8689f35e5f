use axum::{
    body::Body,
    extract::Request,
    http::Method,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, card, roster, attendance, customer, transaction, portal};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    // The portal is consumed by a browser app on a different origin; it is
    // read-only, so GET/OPTIONS from anywhere is all it ever needs.
    let portal_routes = Router::new()
        .route("/api/v1/portal/me", get(portal::me))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any),
        );

    Router::new()
        .route("/health", get(health::health_check))

        // Credit cards
        .route("/api/v1/customers/{customer_id}/cards", post(card::issue_card).get(card::list_cards))
        .route("/api/v1/customers/{customer_id}/credits", get(card::remaining_credits))

        // Aggregation & portal keys
        .route("/api/v1/customers/{customer_id}/snapshot", get(customer::get_snapshot))
        .route("/api/v1/customers/{customer_id}/api-keys", post(customer::issue_api_key))

        // Roster
        .route("/api/v1/lessons/{lesson_id}/roster", get(roster::get_resolved_roster).post(roster::add_roster_entry))
        .route("/api/v1/lessons/{lesson_id}/roster/{entry_id}", delete(roster::delete_roster_entry))

        // Attendance ledger
        .route("/api/v1/lessons/{lesson_id}/occurrences", post(attendance::generate_occurrence))
        .route("/api/v1/occurrences/{occurrence_id}/records", get(attendance::list_occurrence_records))
        .route("/api/v1/attendance/{record_id}/attend", post(attendance::mark_attended))
        .route("/api/v1/attendance/{record_id}/cancel", post(attendance::cancel))
        .route("/api/v1/attendance/{record_id}/not-counted", post(attendance::correct_to_not_counted))

        // Outbound payment trigger
        .route("/api/v1/transactions/{transaction_id}/payment-link", post(transaction::create_payment_link))

        .merge(portal_routes)

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
