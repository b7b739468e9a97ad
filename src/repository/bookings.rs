//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingStatus},
        item::ItemShort,
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           b.item_id, i.name AS item_name,
           b.booker_id, u.name AS booker_name
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow) -> BookingDetails {
    BookingDetails {
        id: row.get("id"),
        start: row.get("start_date"),
        end: row.get("end_date"),
        status: row.get("status"),
        item: ItemShort {
            id: row.get("item_id"),
            name: row.get("item_name"),
        },
        booker: UserShort {
            id: row.get("booker_id"),
            name: row.get("booker_name"),
        },
    }
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking with item and booker references
    pub async fn get_details_by_id(&self, id: i64) -> AppResult<BookingDetails> {
        let row = sqlx::query(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// Create a new booking in WAITING status
    ///
    /// The item row is locked while its availability is checked, so an owner
    /// flipping `available` concurrently cannot interleave between the check
    /// and the insert.
    pub async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<BookingDetails> {
        let mut tx = self.pool.begin().await?;

        let available: bool =
            sqlx::query_scalar("SELECT available FROM items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if !available {
            return Err(AppError::ConditionsNotMet(format!(
                "Item with id {} is not available for booking",
                item_id
            )));
        }

        let booking_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, 'WAITING')
            RETURNING id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(item_id)
        .bind(booker_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_details_by_id(booking_id).await
    }

    /// Approve or reject a WAITING booking, exactly once
    ///
    /// The booking row is locked for the duration of the transaction, so of
    /// two concurrent calls one observes the transitioned status and fails
    /// with Conflict.
    pub async fn approve_or_reject(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT b.status, i.owner_id AS item_owner_id
            FROM bookings b
            JOIN items i ON b.item_id = i.id
            WHERE b.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", booking_id)))?;

        let item_owner_id: i64 = row.get("item_owner_id");
        if item_owner_id != owner_id {
            return Err(AppError::Unauthorized(format!(
                "User with id {} is not the owner of the booked item",
                owner_id
            )));
        }

        let status: BookingStatus = row.get("status");
        if status != BookingStatus::Waiting {
            return Err(AppError::Conflict(format!(
                "Booking with id {} has already been processed",
                booking_id
            )));
        }

        let new_status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = 'WAITING'")
            .bind(new_status)
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_details_by_id(booking_id).await
    }

    /// Bookings made by a renter, most recent start first
    pub async fn list_for_booker(
        &self,
        booker_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<BookingDetails>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE b.booker_id = $1 AND b.status = $2 ORDER BY b.start_date DESC",
                    DETAILS_SELECT
                ))
                .bind(booker_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{} WHERE b.booker_id = $1 ORDER BY b.start_date DESC",
                    DETAILS_SELECT
                ))
                .bind(booker_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Bookings on items owned by a user, most recent start first
    pub async fn list_for_owner(
        &self,
        owner_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<BookingDetails>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE i.owner_id = $1 AND b.status = $2 ORDER BY b.start_date DESC",
                    DETAILS_SELECT
                ))
                .bind(owner_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{} WHERE i.owner_id = $1 ORDER BY b.start_date DESC",
                    DETAILS_SELECT
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Per item, the booking with the greatest start still before `now`
    ///
    /// Ties on start are broken by highest booking id.
    pub async fn last_bookings(
        &self,
        item_ids: &[i64],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT DISTINCT ON (item_id)
                   id, start_date, end_date, item_id, booker_id, status
            FROM bookings
            WHERE item_id = ANY($1) AND start_date < $2
            ORDER BY item_id, start_date DESC, id DESC
            "#,
        )
        .bind(item_ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Per item, the booking with the smallest start after `now`
    ///
    /// Ties on start are broken by highest booking id.
    pub async fn next_bookings(
        &self,
        item_ids: &[i64],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT DISTINCT ON (item_id)
                   id, start_date, end_date, item_id, booker_id, status
            FROM bookings
            WHERE item_id = ANY($1) AND start_date > $2
            ORDER BY item_id, start_date ASC, id DESC
            "#,
        )
        .bind(item_ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Most recently ended booking by a user on an item, if it ended before `now`
    pub async fn find_completed(
        &self,
        item_id: i64,
        booker_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, start_date, end_date, item_id, booker_id, status
            FROM bookings
            WHERE item_id = $1 AND booker_id = $2 AND end_date < $3
            ORDER BY end_date DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(booker_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}
