pub mod bids;
pub mod health;
pub mod reviews;
pub mod tenders;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public liveness probe
        .route("/api/ping", get(health::ping))
        // Tenders
        .route("/api/tenders", get(tenders::list_tenders))
        .route("/api/tenders/new", post(tenders::create_tender))
        .route("/api/tenders/my", get(tenders::my_tenders))
        .route(
            "/api/tenders/:id/status",
            get(tenders::tender_status).put(tenders::set_tender_status),
        )
        .route("/api/tenders/:id/edit", patch(tenders::edit_tender))
        .route(
            "/api/tenders/:id/rollback/:version",
            put(tenders::rollback_tender),
        )
        // Bids; for the list and reviews routes the path id is the tender id
        .route("/api/bids/new", post(bids::create_bid))
        .route("/api/bids/my", get(bids::my_bids))
        .route("/api/bids/:id/list", get(bids::bids_for_tender))
        .route(
            "/api/bids/:id/status",
            get(bids::bid_status).put(bids::set_bid_status),
        )
        .route("/api/bids/:id/edit", patch(bids::edit_bid))
        .route("/api/bids/:id/rollback/:version", put(bids::rollback_bid))
        .route("/api/bids/:id/submit_decision", put(bids::submit_decision))
        .route("/api/bids/:id/reviews", get(reviews::reviews_for_tender))
}
