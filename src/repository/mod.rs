//! Repository layer for database operations

pub mod bookings;
pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct fanning one pool out to per-aggregate repositories
#[derive(Clone)]
pub struct Repository {
    pub users: users::UsersRepository,
    pub items: items::ItemsRepository,
    pub bookings: bookings::BookingsRepository,
    pub requests: requests::RequestsRepository,
    pub comments: comments::CommentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            items: items::ItemsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool),
        }
    }
}
