//! Request board endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::request::{CreateRequest, ItemRequest, ItemRequestDetails},
};

use super::{validate_payload, SharerId};

/// Post a request for an item not yet in the catalog
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequest),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Json(request): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<ItemRequest>)> {
    validate_payload(&request)?;

    let created = state
        .services
        .requests
        .add_request(requester_id, &request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's own requests with fulfilling items
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "Caller's requests, newest first", body = Vec<ItemRequestDetails>),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn list_my_requests(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_mine(user_id).await?;
    Ok(Json(requests))
}

/// List requests posted by other users
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    responses(
        (status = 200, description = "Other users' requests, newest first", body = Vec<ItemRequest>),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn list_other_requests(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
) -> AppResult<Json<Vec<ItemRequest>>> {
    let requests = state.services.requests.list_others(user_id).await?;
    Ok(Json(requests))
}

/// Get a request with its fulfilling items
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = ItemRequestDetails),
        (status = 404, description = "Request or caller not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Path(request_id): Path<i64>,
) -> AppResult<Json<ItemRequestDetails>> {
    let request = state
        .services
        .requests
        .get_by_id(user_id, request_id)
        .await?;
    Ok(Json(request))
}
