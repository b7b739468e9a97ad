//! Item requests repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::ItemRequest,
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requester_id, created FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Create a new request
    pub async fn create(
        &self,
        requester_id: i64,
        description: &str,
        created: DateTime<Utc>,
    ) -> AppResult<ItemRequest> {
        let request = sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO requests (description, requester_id, created)
            VALUES ($1, $2, $3)
            RETURNING id, description, requester_id, created
            "#,
        )
        .bind(description)
        .bind(requester_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Requests authored by a user, newest first
    pub async fn list_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requester_id, created
            FROM requests WHERE requester_id = $1 ORDER BY created DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests authored by anyone else, newest first
    pub async fn list_by_other_requesters(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requester_id, created
            FROM requests WHERE requester_id != $1 ORDER BY created DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
