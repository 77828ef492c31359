//! Identity Account Repository

use serde_json::json;
use shared::models::UserAccount;
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, StoreResult};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Users),
        }
    }

    /// Fails with a duplicate error if the username is taken
    pub async fn insert(&self, account: &UserAccount) -> StoreResult<()> {
        self.base.insert(account).await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<UserAccount>> {
        self.base.get(id).await
    }

    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let mut found: Vec<UserAccount> = self
            .base
            .find(Query::new(Filter::eq("username", username)).limit(1))
            .await?;
        Ok(found.pop())
    }

    pub async fn set_approved(&self, id: &str, is_approved: bool) -> StoreResult<UserAccount> {
        self.base
            .update(id, Filter::All, json!({ "is_approved": is_approved }))
            .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.base.delete(id).await
    }
}
