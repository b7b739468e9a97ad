//! Comments repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::comment::Comment,
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a comment and return it with the author's name attached
    pub async fn create(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<Comment> {
        let comment_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (text, item_id, author_id, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(text)
        .bind(item_id)
        .bind(author_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(comment_id).await
    }

    /// Get comment by ID with the author's name attached
    pub async fn get_by_id(&self, id: i64) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    /// Comments on an item, oldest first
    pub async fn list_for_item(&self, item_id: i64) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = $1
            ORDER BY c.created
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
