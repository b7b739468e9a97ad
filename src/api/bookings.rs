//! Booking ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, CreateBooking},
};

use super::SharerId;

#[derive(Deserialize, IntoParams)]
pub struct ApproveQuery {
    pub approved: bool,
}

#[derive(Deserialize, IntoParams)]
pub struct StateQuery {
    /// Status filter; defaults to ALL
    pub state: Option<BookingState>,
}

/// Boundary validation for the booking window
fn validate_dates(request: &CreateBooking) -> Result<(), AppError> {
    if request.start >= request.end {
        return Err(AppError::Validation(
            "Booking start must be strictly before its end".to_string(),
        ));
    }
    if request.start < Utc::now() {
        return Err(AppError::Validation(
            "Booking start must not be in the past".to_string(),
        ));
    }
    Ok(())
}

/// Book an item for a time window
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingDetails),
        (status = 400, description = "Invalid dates or item not available"),
        (status = 404, description = "Item or caller not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    validate_dates(&request)?;

    let booking = state
        .services
        .bookings
        .create_booking(booker_id, request.item_id, request.start, request.end)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve or reject a booking (item owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ApproveQuery
    ),
    responses(
        (status = 200, description = "Booking transitioned", body = BookingDetails),
        (status = 403, description = "Caller is not the item owner"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already processed")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(booking_id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .approve_or_reject(owner_id, booking_id, query.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking (booker or item owner only)
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = BookingDetails),
        (status = 403, description = "Caller is neither booker nor owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Path(booking_id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .get_booking(requester_id, booking_id)
        .await?;
    Ok(Json(booking))
}

/// List the caller's bookings as a renter
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(StateQuery),
    responses(
        (status = 200, description = "Caller's bookings, most recent start first", body = Vec<BookingDetails>),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn list_renter_bookings(
    State(state): State<crate::AppState>,
    SharerId(renter_id): SharerId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = state
        .services
        .bookings
        .list_for_renter(renter_id, query.state.unwrap_or_default())
        .await?;
    Ok(Json(bookings))
}

/// List bookings on the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(StateQuery),
    responses(
        (status = 200, description = "Bookings on caller's items, most recent start first", body = Vec<BookingDetails>),
        (status = 404, description = "Caller not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = state
        .services
        .bookings
        .list_for_owner(owner_id, query.state.unwrap_or_default())
        .await?;
    Ok(Json(bookings))
}
