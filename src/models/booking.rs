//! Booking model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::item::ItemShort;
use super::user::UserShort;

/// Booking lifecycle status
///
/// A booking starts WAITING and is moved exactly once to APPROVED or REJECTED
/// by the item owner. CANCELLED is reserved; no operation transitions into it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Status filter for booking listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    Waiting,
    Approved,
    Rejected,
    Cancelled,
    All,
}

impl BookingState {
    /// The concrete status this filter selects, or None for ALL
    pub fn status(self) -> Option<BookingStatus> {
        match self {
            BookingState::Waiting => Some(BookingStatus::Waiting),
            BookingState::Approved => Some(BookingStatus::Approved),
            BookingState::Rejected => Some(BookingStatus::Rejected),
            BookingState::Cancelled => Some(BookingStatus::Cancelled),
            BookingState::All => None,
        }
    }
}

impl Default for BookingState {
    fn default() -> Self {
        BookingState::All
    }
}

/// Booking model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Booking with item and booker references for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: ItemShort,
    pub booker: UserShort,
}

/// Create booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub item_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_filter_maps_to_status() {
        assert_eq!(BookingState::Waiting.status(), Some(BookingStatus::Waiting));
        assert_eq!(
            BookingState::Rejected.status(),
            Some(BookingStatus::Rejected)
        );
        assert_eq!(BookingState::All.status(), None);
    }

    #[test]
    fn state_parses_from_uppercase_query_values() {
        let state: BookingState = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(state, BookingState::Approved);
        assert!(serde_json::from_str::<BookingState>("\"approved\"").is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Waiting).unwrap(),
            "\"WAITING\""
        );
        assert_eq!(BookingStatus::Cancelled.to_string(), "CANCELLED");
    }
}
