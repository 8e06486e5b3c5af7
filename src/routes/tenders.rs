use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query as MultiQuery;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::ListParams;
use crate::app::AppState;
use crate::auth::{AccessGate, IdentityResolver};
use crate::domain::{
    CreateTenderRequest, ServiceType, Tender, TenderResponse, TenderStatus, UpdateTenderRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::store::{revisions, TenderStore};

/// Identifies the acting user; blank when the parameter is missing
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusQuery {
    pub status: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTendersQuery {
    #[serde(default)]
    pub service_type: Vec<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List tenders, optionally filtered by service type
pub async fn list_tenders(
    State(state): State<Arc<AppState>>,
    MultiQuery(query): MultiQuery<ListTendersQuery>,
) -> ApiResult<Json<Vec<TenderResponse>>> {
    let mut filters = Vec::with_capacity(query.service_type.len());
    for raw in &query.service_type {
        let service_type = ServiceType::from_param(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid service type '{raw}'")))?;
        filters.push(service_type);
    }

    let page = ListParams {
        limit: query.limit,
        offset: query.offset,
    };
    let tenders = TenderStore::new(&state.db).list(&filters, &page).await?;
    Ok(Json(tenders.into_iter().map(Into::into).collect()))
}

/// Create a new tender on behalf of an organization
pub async fn create_tender(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTenderRequest>,
) -> ApiResult<(StatusCode, Json<TenderResponse>)> {
    let identity = IdentityResolver::new(&state.db);
    let user = identity.require_user(&req.creator_username).await?;
    let organization = identity.require_organization(req.organization_id).await?;
    if identity
        .responsible_link(user.id, organization.id)
        .await?
        .is_none()
    {
        return Err(ApiError::Forbidden(
            "user does not belong to the specified organization".to_string(),
        ));
    }

    let tender = TenderStore::new(&state.db)
        .insert(&Tender::create(req))
        .await?;

    tracing::info!(
        tender_id = %tender.id,
        username = %user.username,
        service_type = ?tender.service_type,
        "Tender created"
    );
    Ok((StatusCode::CREATED, Json(tender.into())))
}

/// List tenders created by the given user
pub async fn my_tenders(
    State(state): State<Arc<AppState>>,
    Query(user): Query<UserQuery>,
    Query(page): Query<ListParams>,
) -> ApiResult<Json<Vec<TenderResponse>>> {
    if user.username.is_empty() {
        return Err(ApiError::Unauthorized("user not found".to_string()));
    }

    let tenders = TenderStore::new(&state.db)
        .list_by_creator(&user.username, &page)
        .await?;
    Ok(Json(tenders.into_iter().map(Into::into).collect()))
}

/// Current status of a tender, visible to its organization's responsible users
pub async fn tender_status(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<Uuid>,
    Query(user): Query<UserQuery>,
) -> ApiResult<Json<TenderStatus>> {
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

    Ok(Json(tender.status))
}

/// Overwrite a tender's status; no history is recorded
pub async fn set_tender_status(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<Uuid>,
    Query(query): Query<SetStatusQuery>,
) -> ApiResult<Json<TenderResponse>> {
    let status = TenderStatus::from_param(&query.status)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid tender status '{}'", query.status)))?;

    let user = IdentityResolver::new(&state.db)
        .require_user(&query.username)
        .await?;
    let store = TenderStore::new(&state.db);
    let tender = store
        .find(tender_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("tender not found".to_string()))?;
    AccessGate::new(&state.db)
        .require_tender_access(&user, &tender)
        .await?;

    let updated = store
        .set_status(tender_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("tender not found".to_string()))?;

    tracing::info!(
        tender_id = %updated.id,
        status = ?updated.status,
        username = %user.username,
        "Tender status updated"
    );
    Ok(Json(updated.into()))
}

/// Apply a partial edit, recording the pre-edit state in history
pub async fn edit_tender(
    State(state): State<Arc<AppState>>,
    Path(tender_id): Path<Uuid>,
    Query(user): Query<UserQuery>,
    Json(patch): Json<UpdateTenderRequest>,
) -> ApiResult<Json<TenderResponse>> {
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

    let updated = revisions::edit(&state.db, tender, patch).await?;

    tracing::info!(
        tender_id = %updated.id,
        version = updated.version,
        username = %user.username,
        "Tender edited"
    );
    Ok(Json(updated.into()))
}

/// Restore a tender to an earlier version, truncating newer history
pub async fn rollback_tender(
    State(state): State<Arc<AppState>>,
    Path((tender_id, version)): Path<(Uuid, i32)>,
    Query(user): Query<UserQuery>,
) -> ApiResult<Json<TenderResponse>> {
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

    let restored = revisions::rollback(&state.db, tender, version).await?;

    tracing::info!(
        tender_id = %restored.id,
        version = restored.version,
        username = %user.username,
        "Tender rolled back"
    );
    Ok(Json(restored.into()))
}
