//! Comment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment left on an item by a past renter
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

/// Create comment payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1))]
    pub text: String,
}
