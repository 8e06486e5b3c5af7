use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::ReviewResponse;
use crate::error::ApiResult;
use crate::store::ReviewStore;

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub author_username: Option<String>,
    pub organization_id: Option<Uuid>,
}

/// Reviews left on a tender's bids; the path id is the tender id
pub async fn reviews_for_tender(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<Uuid>,
    Query(query): Query<ReviewsQuery>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let reviews = ReviewStore::new(&state.db)
        .list_for_tender(
            tender_id,
            query.author_username.as_deref(),
            query.organization_id,
        )
        .await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}
