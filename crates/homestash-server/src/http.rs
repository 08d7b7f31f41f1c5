//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Query, State},
    Json,
};
use serde::Serialize;

use homestash_core::{
    items, locations, now_timestamp, query_items, Child, ChildInput, ChildKind, DesiredChild,
    Item, ItemInput, ItemQueryParams, Location, LocationRecord, LocationUpdate, NewLocation, Tag,
};

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath<T> = Result<Path<T>, PathRejection>;

/// Success envelope: `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Reply to every DELETE
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub changes: usize,
}

impl DeletedResponse {
    fn json(changes: usize) -> Json<Self> {
        Json(Self {
            message: "deleted",
            changes,
        })
    }
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_timestamp(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

// ============================================================================
// Locations
// ============================================================================

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<DataResponse<Vec<Location>>> {
    let rows = state
        .store
        .list_locations()
        .map_err(ApiError::bad_request)?;
    Ok(DataResponse::json(rows))
}

pub async fn create_location(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewLocation>,
) -> ApiResult<DataResponse<LocationRecord<String>>> {
    let Json(input) = body?;
    let record = locations::create_location(state.store.as_ref(), &input)
        .map_err(ApiError::rejected_or_internal)?;
    Ok(DataResponse::json(record))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    path: IdPath<i64>,
    body: JsonBody<LocationUpdate>,
) -> ApiResult<DataResponse<LocationRecord<DesiredChild>>> {
    let Path(id) = path?;
    let Json(input) = body?;
    let record = locations::update_location(state.store.as_ref(), id, &input)
        .map_err(ApiError::internal)?;
    Ok(DataResponse::json(record))
}

pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    path: IdPath<i64>,
) -> ApiResult<DeletedResponse> {
    let Path(id) = path?;
    let changes = state
        .store
        .delete_location(id)
        .map_err(ApiError::bad_request)?;
    tracing::info!(location_id = id, changes, "deleted location");
    Ok(DeletedResponse::json(changes))
}

// ============================================================================
// Bins and shelves
// ============================================================================

pub async fn list_children(
    State(state): State<Arc<AppState>>,
    kind: ChildKind,
) -> ApiResult<DataResponse<Vec<Child>>> {
    let children = state
        .store
        .list_children(kind)
        .map_err(ApiError::bad_request)?;
    Ok(DataResponse::json(children))
}

pub async fn create_child(
    State(state): State<Arc<AppState>>,
    kind: ChildKind,
    body: JsonBody<ChildInput>,
) -> ApiResult<DataResponse<Child>> {
    let Json(input) = body?;
    let child = locations::create_child(state.store.as_ref(), kind, &input)
        .map_err(ApiError::bad_request)?;
    tracing::info!(id = child.id, "created {}", kind.noun());
    Ok(DataResponse::json(child))
}

pub async fn update_child(
    State(state): State<Arc<AppState>>,
    kind: ChildKind,
    path: IdPath<i64>,
    body: JsonBody<ChildInput>,
) -> ApiResult<DataResponse<Child>> {
    let Path(id) = path?;
    let Json(input) = body?;
    let child = locations::update_child(state.store.as_ref(), kind, id, &input)
        .map_err(ApiError::bad_request)?;
    Ok(DataResponse::json(child))
}

pub async fn delete_child(
    State(state): State<Arc<AppState>>,
    kind: ChildKind,
    path: IdPath<i64>,
) -> ApiResult<DeletedResponse> {
    let Path(id) = path?;
    let changes = state
        .store
        .delete_child(kind, id)
        .map_err(ApiError::bad_request)?;
    Ok(DeletedResponse::json(changes))
}

// ============================================================================
// Tags
// ============================================================================

pub async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<DataResponse<Vec<Tag>>> {
    let tags = state.store.list_tags().map_err(ApiError::internal)?;
    Ok(DataResponse::json(tags))
}

// ============================================================================
// Items
// ============================================================================

/// Paging metadata of an item listing
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub data: Vec<Item>,
    pub meta: PageMeta,
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ItemQueryParams>,
) -> ApiResult<ItemListResponse> {
    let query = params.resolve(state.config.default_page_size, state.config.max_page_size);
    let page = query_items(state.store.as_ref(), &query).map_err(ApiError::internal)?;

    Ok(Json(ItemListResponse {
        data: page.items,
        meta: PageMeta {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        },
    }))
}

/// Reply to an item write; `data` echoes the request body
#[derive(Debug, Serialize)]
pub struct ItemWriteResponse {
    pub message: &'static str,
    pub data: ItemInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    body: JsonBody<ItemInput>,
) -> ApiResult<ItemWriteResponse> {
    let Json(mut input) = body?;
    let id = items::create_item(state.store.as_ref(), &input).map_err(ApiError::bad_request)?;
    input.id = Some(id.clone());

    Ok(Json(ItemWriteResponse {
        message: "success",
        data: input,
        id: Some(id),
    }))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    path: IdPath<String>,
    body: JsonBody<ItemInput>,
) -> ApiResult<ItemWriteResponse> {
    let Path(id) = path?;
    let Json(input) = body?;
    items::update_item(state.store.as_ref(), &id, &input).map_err(ApiError::bad_request)?;

    Ok(Json(ItemWriteResponse {
        message: "success",
        data: input,
        id: None,
    }))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    path: IdPath<String>,
) -> ApiResult<DeletedResponse> {
    let Path(id) = path?;
    let changes = state
        .store
        .delete_item(&id)
        .map_err(ApiError::bad_request)?;
    tracing::info!(item_id = %id, changes, "deleted item");
    Ok(DeletedResponse::json(changes))
}
