//! User directory service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        self.repository.users.find_all().await
    }

    /// Create a new user
    ///
    /// A blank or absent name defaults to the email address.
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        let name = match user.name {
            Some(ref name) if !name.trim().is_empty() => name.clone(),
            _ => {
                tracing::info!("No name supplied, defaulting to email {}", user.email);
                user.email.clone()
            }
        };

        self.repository.users.create(&name, &user.email).await
    }

    /// Partially update a user; only supplied non-blank fields overwrite
    pub async fn partial_update(&self, id: i64, updates: UpdateUser) -> AppResult<User> {
        let existing = self.repository.users.get_by_id(id).await?;

        let email = match updates.email {
            Some(ref email) if !email.trim().is_empty() => {
                if self.repository.users.email_exists(email, Some(id)).await? {
                    return Err(AppError::Conflict(format!(
                        "User with email {} already exists",
                        email
                    )));
                }
                email.clone()
            }
            _ => existing.email,
        };

        let name = match updates.name {
            Some(ref name) if !name.trim().is_empty() => name.clone(),
            _ => existing.name,
        };

        self.repository.users.update(id, &name, &email).await
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
