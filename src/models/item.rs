//! Item model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::comment::Comment;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    /// Request this item was listed to fulfil, if any
    pub request_id: Option<i64>,
}

/// Short item reference embedded in booking responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemShort {
    pub id: i64,
    pub name: String,
}

/// Item with comments, returned by the point lookup
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub comments: Vec<Comment>,
}

impl ItemDetails {
    pub fn from_item(item: Item, comments: Vec<Comment>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            comments,
        }
    }
}

/// Item annotated with booking recency hints for the owner's listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemWithBookings {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    /// Start of the most recent booking already begun
    pub last_booking: Option<DateTime<Utc>>,
    /// Start of the nearest future booking
    pub next_booking: Option<DateTime<Utc>>,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub available: bool,
    /// Optional reference to the request this listing fulfils
    pub request_id: Option<i64>,
}

/// Partial item update; only supplied fields overwrite
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub available: Option<bool>,
}
