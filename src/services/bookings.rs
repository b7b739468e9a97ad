//! Booking ledger service

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book an item for a time window; the booking starts WAITING
    ///
    /// Date-window validation (start < end, start not in the past) is the
    /// API layer's responsibility. The availability check happens in the
    /// repository, under the same transaction as the insert.
    pub async fn create_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<BookingDetails> {
        self.repository.users.get_by_id(booker_id).await?;
        self.repository
            .bookings
            .create(booker_id, item_id, start, end)
            .await
    }

    /// Approve or reject a booking; owner only, exactly once
    pub async fn approve_or_reject(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        self.repository
            .bookings
            .approve_or_reject(owner_id, booking_id, approved)
            .await
    }

    /// Read a booking; visible to the booker and the item owner only
    pub async fn get_booking(&self, requester_id: i64, booking_id: i64) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_details_by_id(booking_id).await?;

        if booking.booker.id != requester_id {
            let item = self.repository.items.get_by_id(booking.item.id).await?;
            if item.owner_id != requester_id {
                return Err(AppError::Unauthorized(format!(
                    "User with id {} has no access to booking {}",
                    requester_id, booking_id
                )));
            }
        }

        Ok(booking)
    }

    /// Bookings made by a renter, filtered by state, most recent start first
    pub async fn list_for_renter(
        &self,
        renter_id: i64,
        state: BookingState,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(renter_id).await?;
        self.repository
            .bookings
            .list_for_booker(renter_id, state.status())
            .await
    }

    /// Bookings on a user's items, filtered by state, most recent start first
    pub async fn list_for_owner(
        &self,
        owner_id: i64,
        state: BookingState,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(owner_id).await?;
        self.repository
            .bookings
            .list_for_owner(owner_id, state.status())
            .await
    }
}
