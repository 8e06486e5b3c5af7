use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::ListParams;
use crate::app::AppState;
use crate::auth::{AccessGate, IdentityResolver};
use crate::domain::{
    Bid, BidAuthorType, BidResponse, BidStatus, CreateBidRequest, TenderStatus, UpdateBidRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::routes::tenders::{SetStatusQuery, UserQuery};
use crate::services::DecisionService;
use crate::store::{revisions, BidStore, TenderStore};

#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    pub decision: String,
    #[serde(default)]
    pub username: String,
}

/// Submit a bid against a published tender
pub async fn create_bid(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBidRequest>,
) -> ApiResult<(StatusCode, Json<BidResponse>)> {
    let identity = IdentityResolver::new(&state.db);

    // The declared author must exist for the declared kind
    let author_exists = match req.author_type {
        BidAuthorType::User => identity.find_user_by_id(req.author_id).await?.is_some(),
        BidAuthorType::Organization => {
            identity.find_organization(req.author_id).await?.is_some()
        }
    };
    if !author_exists {
        return Err(ApiError::NotFound("author not found".to_string()));
    }

    // Bids are only accepted while the tender is published
    match TenderStore::new(&state.db).find(req.tender_id).await? {
        Some(tender) if tender.status == TenderStatus::Published => {}
        _ => return Err(ApiError::NotFound("tender not found".to_string())),
    }

    let bid = BidStore::new(&state.db).insert(&Bid::create(req)).await?;

    tracing::info!(
        bid_id = %bid.id,
        tender_id = %bid.tender_id,
        author_type = ?bid.author_type,
        "Bid created"
    );
    Ok((StatusCode::CREATED, Json(bid.into())))
}

/// List bids submitted by the given user
pub async fn my_bids(
    State(state): State<Arc<AppState>>,
    Query(user): Query<UserQuery>,
    Query(page): Query<ListParams>,
) -> ApiResult<Json<Vec<BidResponse>>> {
    let user = IdentityResolver::new(&state.db)
        .require_user(&user.username)
        .await?;

    let bids = BidStore::new(&state.db)
        .list_by_author_user(user.id, &page)
        .await?;
    Ok(Json(bids.into_iter().map(Into::into).collect()))
}

/// List bids submitted against a tender; the path id is the tender id
pub async fn bids_for_tender(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<Uuid>,
    Query(user): Query<UserQuery>,
    Query(page): Query<ListParams>,
) -> ApiResult<Json<Vec<BidResponse>>> {
    let user = IdentityResolver::new(&state.db)
        .require_user(&user.username)
        .await?;
    let tender = TenderStore::new(&state.db)
        .find(tender_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("tender not found".to_string()))?;
    AccessGate::new(&state.db)
        .require_tender_access(&user, &tender)
        .await?;

    let bids = BidStore::new(&state.db)
        .list_by_tender(tender_id, &page)
        .await?;
    Ok(Json(bids.into_iter().map(Into::into).collect()))
}

/// Current status of a bid; published bids are publicly visible
pub async fn bid_status(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
    Query(user): Query<UserQuery>,
) -> ApiResult<Json<BidStatus>> {
    let bid = BidStore::new(&state.db)
        .find(bid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;
    if bid.status == BidStatus::Published {
        return Ok(Json(bid.status));
    }

    let user = IdentityResolver::new(&state.db)
        .require_user(&user.username)
        .await?;
    AccessGate::new(&state.db)
        .require_bid_access(&user, &bid)
        .await?;

    Ok(Json(bid.status))
}

/// Overwrite a bid's status; no history is recorded
pub async fn set_bid_status(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
    Query(query): Query<SetStatusQuery>,
) -> ApiResult<Json<BidResponse>> {
    let status = BidStatus::from_param(&query.status)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid bid status '{}'", query.status)))?;

    let user = IdentityResolver::new(&state.db)
        .require_user(&query.username)
        .await?;
    let store = BidStore::new(&state.db);
    let bid = store
        .find(bid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;
    AccessGate::new(&state.db)
        .require_bid_access(&user, &bid)
        .await?;

    let updated = store
        .set_status(bid_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;

    tracing::info!(
        bid_id = %updated.id,
        status = ?updated.status,
        username = %user.username,
        "Bid status updated"
    );
    Ok(Json(updated.into()))
}

/// Apply a partial edit, recording the pre-edit state in history
pub async fn edit_bid(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
    Query(user): Query<UserQuery>,
    Json(patch): Json<UpdateBidRequest>,
) -> ApiResult<Json<BidResponse>> {
    let user = IdentityResolver::new(&state.db)
        .require_user(&user.username)
        .await?;
    let bid = BidStore::new(&state.db)
        .find(bid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;
    AccessGate::new(&state.db)
        .require_bid_access(&user, &bid)
        .await?;

    let updated = revisions::edit(&state.db, bid, patch).await?;

    tracing::info!(
        bid_id = %updated.id,
        version = updated.version,
        username = %user.username,
        "Bid edited"
    );
    Ok(Json(updated.into()))
}

/// Restore a bid to an earlier version, truncating newer history
pub async fn rollback_bid(
    State(state): State<Arc<AppState>>,
    Path((bid_id, version)): Path<(Uuid, i32)>,
    Query(user): Query<UserQuery>,
) -> ApiResult<Json<BidResponse>> {
    let user = IdentityResolver::new(&state.db)
        .require_user(&user.username)
        .await?;
    let bid = BidStore::new(&state.db)
        .find(bid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;
    AccessGate::new(&state.db)
        .require_bid_access(&user, &bid)
        .await?;

    let restored = revisions::rollback(&state.db, bid, version).await?;

    tracing::info!(
        bid_id = %restored.id,
        version = restored.version,
        username = %user.username,
        "Bid rolled back"
    );
    Ok(Json(restored.into()))
}

/// Approve or reject a bid on behalf of the tender's organization
pub async fn submit_decision(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
    Query(query): Query<DecisionQuery>,
) -> ApiResult<Json<BidResponse>> {
    let bid = DecisionService::new(&state.db)
        .submit(bid_id, &query.decision, &query.username)
        .await?;
    Ok(Json(bid.into()))
}
