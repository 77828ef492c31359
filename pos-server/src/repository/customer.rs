//! Customer Repository

use shared::models::{Customer, CustomerCreate};
use shared::util::{new_id, now_millis};
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Query, SortOrder, StoreResult};

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Customers),
        }
    }

    pub async fn create(&self, data: CustomerCreate) -> StoreResult<Customer> {
        let customer = Customer {
            id: new_id(),
            name: data.name,
            phone: data.phone,
            address: data.address,
            email: data.email,
            created_at: now_millis(),
        };
        self.base.insert(&customer).await?;
        Ok(customer)
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Customer>> {
        self.base.get(id).await
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Customer>> {
        self.base
            .find(Query::all().sort_by("created_at", SortOrder::Desc))
            .await
    }
}
