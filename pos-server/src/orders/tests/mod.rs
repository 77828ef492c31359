use super::*;
use crate::repository::{
    CourierRepository, CustomerRepository, DiningTableRepository, OrderRepository,
};
use crate::store::{
    Collection, Document, DocumentStore, Filter, Query, RedbStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{
    Courier, CustomerCreate, DiningTable, DiningTableCreate, Order, OrderCreate, OrderItemInput,
    OrderStatus, OrderType,
};
use shared::util::{new_id, now_millis};
use std::str::FromStr;
use std::sync::Arc;

struct Fixture {
    engine: OrderEngine,
    orders: OrderRepository,
    tables: DiningTableRepository,
    couriers: CourierRepository,
    customers: CustomerRepository,
}

fn fixture() -> Fixture {
    fixture_with(Arc::new(RedbStore::open_in_memory().unwrap()))
}

fn fixture_with(store: Arc<dyn DocumentStore>) -> Fixture {
    Fixture {
        engine: OrderEngine::new(store.clone()),
        orders: OrderRepository::new(store.clone()),
        tables: DiningTableRepository::new(store.clone()),
        couriers: CourierRepository::new(store.clone()),
        customers: CustomerRepository::new(store),
    }
}

impl Fixture {
    async fn add_table(&self, number: u32) -> DiningTable {
        self.tables
            .create(DiningTableCreate {
                number,
                capacity: 4,
            })
            .await
            .unwrap()
    }

    async fn add_courier(&self, first_name: &str) -> Courier {
        let courier = Courier {
            id: new_id(),
            first_name: first_name.to_string(),
            last_name: "Rider".to_string(),
            phone_number: "555-0100".to_string(),
            vehicle_type: Some("scooter".to_string()),
            vehicle_plate: None,
            is_available: true,
            is_approved: true,
            user_id: None,
            created_at: now_millis(),
        };
        self.couriers.insert(&courier).await.unwrap();
        courier
    }

    async fn table(&self, id: &str) -> DiningTable {
        self.tables.find_by_id(id).await.unwrap().unwrap()
    }

    async fn courier(&self, id: &str) -> Courier {
        self.couriers.find_by_id(id).await.unwrap().unwrap()
    }

    async fn order(&self, id: &str) -> Order {
        self.orders.find_by_id(id).await.unwrap().unwrap()
    }

    async fn order_count(&self) -> u64 {
        self.orders.count(Filter::All).await.unwrap()
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, quantity: i64, price: &str) -> OrderItemInput {
    OrderItemInput {
        product_id: format!("prod-{}", name.to_lowercase()),
        product_name: name.to_string(),
        quantity,
        price: dec(price),
    }
}

fn order_input(order_type: OrderType, items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        items,
        order_type,
        table_id: None,
        courier_id: None,
        customer_id: None,
        customer_name: None,
        customer_phone: None,
        customer_address: None,
        notes: None,
    }
}

fn dine_in(table_id: &str, items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        table_id: Some(table_id.to_string()),
        ..order_input(OrderType::DineIn, items)
    }
}

fn delivery(items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        customer_name: Some("Dana".to_string()),
        customer_phone: Some("555-0199".to_string()),
        customer_address: Some("1 Harbour Road".to_string()),
        ..order_input(OrderType::Delivery, items)
    }
}

/// Order row written straight to the store, bypassing the engine
fn raw_order(order_number: &str) -> Order {
    let now = now_millis();
    Order {
        id: new_id(),
        order_number: order_number.to_string(),
        items: vec![],
        total_amount: Decimal::ZERO,
        status: OrderStatus::Pending,
        order_type: OrderType::Takeaway,
        table_id: None,
        table_name: None,
        courier_id: None,
        courier_name: None,
        customer_id: None,
        customer_name: None,
        customer_phone: None,
        customer_address: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Clone, Copy)]
enum OrderInsertFault {
    /// Every order insert reports a taken order number
    Duplicate,
    /// Every order insert fails with a backend error
    Backend,
}

/// Store wrapper that fails order inserts
struct FaultyStore {
    inner: RedbStore,
    fault: OrderInsertFault,
}

impl FaultyStore {
    fn new(fault: OrderInsertFault) -> Arc<dyn DocumentStore> {
        Arc::new(Self {
            inner: RedbStore::open_in_memory().unwrap(),
            fault,
        })
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn find(&self, collection: Collection, query: Query) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, query).await
    }

    async fn count(&self, collection: Collection, filter: Filter) -> StoreResult<u64> {
        self.inner.count(collection, filter).await
    }

    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()> {
        if collection != Collection::Orders {
            return self.inner.insert(collection, document).await;
        }
        match self.fault {
            OrderInsertFault::Duplicate => Err(StoreError::Duplicate {
                collection: collection.name(),
                field: "order_number",
                value: document
                    .get("order_number")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            }),
            OrderInsertFault::Backend => Err(StoreError::Task("disk unplugged".to_string())),
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        precondition: Filter,
        patch: Document,
    ) -> StoreResult<Document> {
        self.inner.update(collection, id, precondition, patch).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        self.inner.delete(collection, id).await
    }

    async fn delete_many(&self, collection: Collection, ids: Vec<String>) -> StoreResult<u64> {
        self.inner.delete_many(collection, ids).await
    }
}

mod test_status;
