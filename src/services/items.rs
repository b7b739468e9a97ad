//! Item catalog service

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::Comment,
        item::{CreateItem, Item, ItemDetails, ItemWithBookings, UpdateItem},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a new item for borrowing
    pub async fn add_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        self.repository.users.get_by_id(owner_id).await?;

        if let Some(request_id) = item.request_id {
            // The originating request must exist before the item can fulfil it
            self.repository.requests.get_by_id(request_id).await?;
        }

        self.repository.items.create(owner_id, &item).await
    }

    /// Partially update an item; owner only, non-null fields overwrite
    pub async fn update_item(
        &self,
        owner_id: i64,
        item_id: i64,
        updates: UpdateItem,
    ) -> AppResult<Item> {
        let existing = self.repository.items.get_by_id(item_id).await?;
        if existing.owner_id != owner_id {
            return Err(AppError::Unauthorized(format!(
                "User with id {} is not the owner of item {}",
                owner_id, item_id
            )));
        }

        let name = updates.name.unwrap_or(existing.name);
        let description = updates.description.unwrap_or(existing.description);
        let available = updates.available.unwrap_or(existing.available);

        self.repository
            .items
            .update(item_id, &name, &description, available)
            .await
    }

    /// Point lookup with comments attached
    pub async fn get_by_id(&self, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        let comments = self.repository.comments.list_for_item(item_id).await?;
        Ok(ItemDetails::from_item(item, comments))
    }

    /// Owner's items, each annotated with its last and next booking start
    pub async fn list_for_owner(&self, owner_id: i64) -> AppResult<Vec<ItemWithBookings>> {
        self.repository.users.get_by_id(owner_id).await?;
        let items = self.repository.items.list_for_owner(owner_id).await?;

        let item_ids: Vec<i64> = items.iter().map(|item| item.id).collect();
        let now = Utc::now();

        let last_by_item: HashMap<i64, DateTime<Utc>> = self
            .repository
            .bookings
            .last_bookings(&item_ids, now)
            .await?
            .into_iter()
            .map(|booking| (booking.item_id, booking.start_date))
            .collect();
        let next_by_item: HashMap<i64, DateTime<Utc>> = self
            .repository
            .bookings
            .next_bookings(&item_ids, now)
            .await?
            .into_iter()
            .map(|booking| (booking.item_id, booking.start_date))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| ItemWithBookings {
                last_booking: last_by_item.get(&item.id).copied(),
                next_booking: next_by_item.get(&item.id).copied(),
                id: item.id,
                name: item.name,
                description: item.description,
                available: item.available,
                owner_id: item.owner_id,
                request_id: item.request_id,
            })
            .collect())
    }

    /// Search available items by name or description substring
    ///
    /// Blank text yields an empty result set, not a match-all.
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search_available(text).await
    }

    /// Leave a comment on an item after a completed booking
    pub async fn add_comment(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
    ) -> AppResult<Comment> {
        self.repository.items.get_by_id(item_id).await?;
        self.repository.users.get_by_id(author_id).await?;

        let now = Utc::now();
        let completed = self
            .repository
            .bookings
            .find_completed(item_id, author_id, now)
            .await?;
        if completed.is_none() {
            return Err(AppError::ConditionsNotMet(format!(
                "User with id {} has no completed booking on item {}",
                author_id, item_id
            )));
        }

        self.repository
            .comments
            .create(item_id, author_id, text, now)
            .await
    }
}
