//! Items repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, description, available, owner_id, request_id FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Create a new item
    pub async fn create(&self, owner_id: i64, item: &CreateItem) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, available, owner_id, request_id
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(owner_id)
        .bind(item.request_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Overwrite an item's mutable fields
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        description: &str,
        available: bool,
    ) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET name = $1, description = $2, available = $3
            WHERE id = $4
            RETURNING id, name, description, available, owner_id, request_id
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// List items owned by a user
    pub async fn list_for_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, available, owner_id, request_id
            FROM items WHERE owner_id = $1 ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Case-insensitive substring search on name or description, available items only
    pub async fn search_available(&self, text: &str) -> AppResult<Vec<Item>> {
        let pattern = format!("%{}%", text);
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, available, owner_id, request_id
            FROM items
            WHERE (name ILIKE $1 OR description ILIKE $1) AND available = TRUE
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Items listed against any of the given requests
    pub async fn list_for_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, available, owner_id, request_id
            FROM items WHERE request_id = ANY($1) ORDER BY id
            "#,
        )
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
