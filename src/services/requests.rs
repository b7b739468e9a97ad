//! Request board service

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        item::Item,
        request::{ItemRequest, ItemRequestDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Post a request for an item not yet in the catalog
    pub async fn add_request(
        &self,
        requester_id: i64,
        description: &str,
    ) -> AppResult<ItemRequest> {
        self.repository.users.get_by_id(requester_id).await?;
        self.repository
            .requests
            .create(requester_id, description, Utc::now())
            .await
    }

    /// The caller's own requests with fulfilling items, newest first
    pub async fn list_mine(&self, user_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        let requests = self.repository.requests.list_by_requester(user_id).await?;
        self.with_items(requests).await
    }

    /// Requests posted by other users, newest first
    pub async fn list_others(&self, user_id: i64) -> AppResult<Vec<ItemRequest>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .requests
            .list_by_other_requesters(user_id)
            .await
    }

    /// Point lookup with fulfilling items attached
    pub async fn get_by_id(&self, user_id: i64, request_id: i64) -> AppResult<ItemRequestDetails> {
        self.repository.users.get_by_id(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;
        let items = self.repository.items.list_for_requests(&[request_id]).await?;
        Ok(ItemRequestDetails::from_request(request, items))
    }

    /// Attach fulfilling items to a batch of requests with a single query
    async fn with_items(
        &self,
        requests: Vec<ItemRequest>,
    ) -> AppResult<Vec<ItemRequestDetails>> {
        let request_ids: Vec<i64> = requests.iter().map(|request| request.id).collect();
        let mut items_by_request: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in self.repository.items.list_for_requests(&request_ids).await? {
            if let Some(request_id) = item.request_id {
                items_by_request.entry(request_id).or_default().push(item);
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = items_by_request.remove(&request.id).unwrap_or_default();
                ItemRequestDetails::from_request(request, items)
            })
            .collect())
    }
}
