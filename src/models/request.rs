//! Item request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::item::Item;

/// Request for an item not yet in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: DateTime<Utc>,
}

/// Request with the items listed to fulfil it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemRequestDetails {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl ItemRequestDetails {
    pub fn from_request(request: ItemRequest, items: Vec<Item>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            requester_id: request.requester_id,
            created: request.created,
            items,
        }
    }
}

/// Create request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1))]
    pub description: String,
}
