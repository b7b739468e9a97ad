//! Item catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        comment::{Comment, CreateComment},
        item::{CreateItem, Item, ItemDetails, ItemWithBookings, UpdateItem},
    },
};

use super::{validate_payload, SharerId};

#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring to match against item name or description
    pub text: String,
}

/// List a new item for borrowing
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 404, description = "Owner or originating request not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Json(request): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    validate_payload(&request)?;

    let item = state.services.items.add_item(owner_id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially update an item (owner only)
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(item_id): Path<i64>,
    Json(request): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    validate_payload(&request)?;

    let item = state
        .services
        .items
        .update_item(owner_id, item_id, request)
        .await?;
    Ok(Json(item))
}

/// Get an item with its comments
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_by_id(item_id).await?;
    Ok(Json(item))
}

/// List the caller's items with booking recency hints
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "Caller's items", body = Vec<ItemWithBookings>),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
) -> AppResult<Json<Vec<ItemWithBookings>>> {
    let items = state.services.items.list_for_owner(owner_id).await?;
    Ok(Json(items))
}

/// Search available items by text
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.services.items.search(&query.text).await?;
    Ok(Json(items))
}

/// Comment on an item after a completed booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Caller has no completed booking on the item"),
        (status = 404, description = "Item or caller not found")
    )
)]
pub async fn add_comment(
    State(state): State<crate::AppState>,
    SharerId(author_id): SharerId,
    Path(item_id): Path<i64>,
    Json(request): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    validate_payload(&request)?;

    let comment = state
        .services
        .items
        .add_comment(item_id, author_id, &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
