//! redb-backed document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | one per [`Collection`] | `id` | JSON document | Documents |
//! | `unique_index` | `(collection.field, value)` | `id` | Unique constraints |
//!
//! redb serializes write transactions, so the read-check-write inside
//! [`RedbStore::update`] is atomic with respect to every other writer.
//!
//! Writes that miss the operation timeout are aborted rather than
//! committed late: a [`StoreError::Timeout`] from a write always means
//! nothing was persisted.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Collection, Document, DocumentStore, Filter, Query, StoreError, StoreResult};

/// Key = (index name, value), value = owning document id
const UNIQUE_INDEX_TABLE: TableDefinition<(&str, &str), &str> = TableDefinition::new("unique_index");

/// Default bound on a single store operation
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

fn table_def(collection: Collection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(collection.name())
}

/// Document store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    op_timeout: Duration,
}

impl RedbStore {
    /// Open or create the database file at `path`
    pub fn open(path: impl AsRef<Path>, op_timeout: Duration) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db, op_timeout)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, DEFAULT_OP_TIMEOUT)
    }

    fn init(db: Database, op_timeout: Duration) -> StoreResult<Self> {
        let txn = db.begin_write()?;
        {
            for collection in Collection::ALL {
                let _ = txn.open_table(table_def(collection))?;
            }
            let _ = txn.open_table(UNIQUE_INDEX_TABLE)?;
        }
        txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            op_timeout,
        })
    }

    /// Run a blocking redb operation on the blocking pool, bounded by the
    /// operation timeout
    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> StoreResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        let task = tokio::task::spawn_blocking(move || op(&db));
        match tokio::time::timeout(self.op_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(StoreError::Task(e.to_string())),
            Err(_) => {
                tracing::warn!(timeout = ?self.op_timeout, "Store operation timed out");
                Err(StoreError::Timeout(self.op_timeout))
            }
        }
    }

    /// Run `op` inside one write transaction on the blocking pool.
    ///
    /// The transaction commits only if `op` finishes before the deadline;
    /// waiting on another writer counts against it.
    async fn write<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&WriteTransaction) -> StoreResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        let timeout = self.op_timeout;
        let deadline = Instant::now() + timeout;
        let task = tokio::task::spawn_blocking(move || {
            let txn = db.begin_write()?;
            let value = op(&txn)?;
            if Instant::now() >= deadline {
                txn.abort()?;
                return Err(StoreError::Timeout(timeout));
            }
            txn.commit()?;
            Ok(value)
        });
        match task.await {
            Ok(Err(StoreError::Timeout(t))) => {
                tracing::warn!(timeout = ?t, "Store write missed its deadline, aborted");
                Err(StoreError::Timeout(t))
            }
            Ok(result) => result,
            Err(e) => Err(StoreError::Task(e.to_string())),
        }
    }
}

fn document_id(collection: Collection, doc: &Document) -> StoreResult<String> {
    doc.get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            StoreError::InvalidDocument(format!("{} document without string id", collection.name()))
        })
}

/// Render a scalar for use as an index key; non-scalars are not indexed
fn index_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn index_name(collection: Collection, field: &str) -> String {
    format!("{}.{}", collection.name(), field)
}

fn read_doc(bytes: &[u8]) -> StoreResult<Document> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Claim `value` for `id` in the unique index, failing if another id owns it
fn claim_unique(
    txn: &WriteTransaction,
    collection: Collection,
    field: &'static str,
    value: &str,
    id: &str,
) -> StoreResult<()> {
    let name = index_name(collection, field);
    let mut index = txn.open_table(UNIQUE_INDEX_TABLE)?;
    let owner = index
        .get((name.as_str(), value))?
        .map(|g| g.value().to_string());
    match owner {
        Some(owner) if owner != id => Err(StoreError::Duplicate {
            collection: collection.name(),
            field,
            value: value.to_string(),
        }),
        _ => {
            index.insert((name.as_str(), value), id)?;
            Ok(())
        }
    }
}

fn release_unique(
    txn: &WriteTransaction,
    collection: Collection,
    field: &str,
    value: &str,
) -> StoreResult<()> {
    let name = index_name(collection, field);
    let mut index = txn.open_table(UNIQUE_INDEX_TABLE)?;
    index.remove((name.as_str(), value))?;
    Ok(())
}

fn remove_in_txn(txn: &WriteTransaction, collection: Collection, id: &str) -> StoreResult<bool> {
    let existing = {
        let table = txn.open_table(table_def(collection))?;
        table.get(id)?.map(|g| g.value().to_vec())
    };
    let Some(bytes) = existing else {
        return Ok(false);
    };
    let doc = read_doc(&bytes)?;
    for field in collection.unique_fields() {
        if let Some(value) = doc.get(*field).and_then(index_value) {
            release_unique(txn, collection, field, &value)?;
        }
    }
    let mut table = txn.open_table(table_def(collection))?;
    table.remove(id)?;
    Ok(true)
}

#[async_trait]
impl DocumentStore for RedbStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let id = id.to_string();
        self.run(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(table_def(collection))?;
            match table.get(id.as_str())? {
                Some(value) => Ok(Some(read_doc(value.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find(&self, collection: Collection, query: Query) -> StoreResult<Vec<Document>> {
        self.run(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(table_def(collection))?;
            let mut docs = Vec::new();
            for entry in table.iter()? {
                let (_key, value) = entry?;
                let doc = read_doc(value.value())?;
                if query.filter.matches(&doc) {
                    docs.push(doc);
                }
            }
            Ok(query.finish(docs))
        })
        .await
    }

    async fn count(&self, collection: Collection, filter: Filter) -> StoreResult<u64> {
        self.run(move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(table_def(collection))?;
            let mut count = 0u64;
            for entry in table.iter()? {
                let (_key, value) = entry?;
                if filter.matches(&read_doc(value.value())?) {
                    count += 1;
                }
            }
            Ok(count)
        })
        .await
    }

    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()> {
        let id = document_id(collection, &document)?;
        let bytes = serde_json::to_vec(&document)?;
        self.write(move |txn| {
            let exists = txn.open_table(table_def(collection))?.get(id.as_str())?.is_some();
            if exists {
                return Err(StoreError::Duplicate {
                    collection: collection.name(),
                    field: "id",
                    value: id,
                });
            }
            for field in collection.unique_fields() {
                if let Some(value) = document.get(*field).and_then(index_value) {
                    claim_unique(txn, collection, field, &value, &id)?;
                }
            }
            let mut table = txn.open_table(table_def(collection))?;
            table.insert(id.as_str(), bytes.as_slice())?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        precondition: Filter,
        patch: Document,
    ) -> StoreResult<Document> {
        let id = id.to_string();
        self.write(move |txn| {
            let current = {
                let table = txn.open_table(table_def(collection))?;
                let bytes = table.get(id.as_str())?.map(|g| g.value().to_vec());
                match bytes {
                    Some(bytes) => read_doc(&bytes)?,
                    None => {
                        return Err(StoreError::NotFound {
                            collection: collection.name(),
                            id,
                        });
                    }
                }
            };
            if !precondition.matches(&current) {
                return Err(StoreError::PreconditionFailed {
                    collection: collection.name(),
                    id,
                });
            }

            let mut next = current.clone();
            for (key, value) in patch {
                if key != "id" {
                    next.insert(key, value);
                }
            }

            for field in collection.unique_fields() {
                let old = current.get(*field).and_then(index_value);
                let new = next.get(*field).and_then(index_value);
                if old != new {
                    if let Some(new) = &new {
                        claim_unique(txn, collection, field, new, &id)?;
                    }
                    if let Some(old) = &old {
                        release_unique(txn, collection, field, old)?;
                    }
                }
            }

            let bytes = serde_json::to_vec(&next)?;
            let mut table = txn.open_table(table_def(collection))?;
            table.insert(id.as_str(), bytes.as_slice())?;
            Ok(next)
        })
        .await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.write(move |txn| remove_in_txn(txn, collection, &id))
            .await
    }

    async fn delete_many(&self, collection: Collection, ids: Vec<String>) -> StoreResult<u64> {
        self.write(move |txn| {
            let mut removed = 0u64;
            for id in &ids {
                if remove_in_txn(txn, collection, id)? {
                    removed += 1;
                }
            }
            Ok(removed)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortOrder;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = RedbStore::open_in_memory().unwrap();
        store
            .insert(Collection::Tables, doc(json!({"id": "t1", "number": 1, "is_occupied": false})))
            .await
            .unwrap();

        let got = store.get(Collection::Tables, "t1").await.unwrap().unwrap();
        assert_eq!(got["number"], json!(1));
        assert!(store.get(Collection::Tables, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicates() {
        let store = RedbStore::open_in_memory().unwrap();
        store
            .insert(Collection::Users, doc(json!({"id": "u1", "username": "maria"})))
            .await
            .unwrap();

        let err = store
            .insert(Collection::Users, doc(json!({"id": "u2", "username": "maria"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "username", .. }));
        assert!(store.get(Collection::Users, "u2").await.unwrap().is_none());

        // Deleting the owner frees the key
        assert!(store.delete(Collection::Users, "u1").await.unwrap());
        store
            .insert(Collection::Users, doc(json!({"id": "u2", "username": "maria"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = RedbStore::open_in_memory().unwrap();
        let d = doc(json!({"id": "c1", "name": "Pizza"}));
        store.insert(Collection::Categories, d.clone()).await.unwrap();
        let err = store.insert(Collection::Categories, d).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "id", .. }));
    }

    #[tokio::test]
    async fn test_update_with_precondition() {
        let store = RedbStore::open_in_memory().unwrap();
        store
            .insert(
                Collection::Couriers,
                doc(json!({"id": "c1", "is_available": true, "is_approved": true})),
            )
            .await
            .unwrap();

        let claim = Filter::eq("is_available", true).and(Filter::eq("is_approved", true));
        let updated = store
            .update(
                Collection::Couriers,
                "c1",
                claim.clone(),
                doc(json!({"is_available": false})),
            )
            .await
            .unwrap();
        assert_eq!(updated["is_available"], json!(false));

        // Second claim fails and changes nothing
        let err = store
            .update(Collection::Couriers, "c1", claim, doc(json!({"is_available": false, "x": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed { .. }));
        let current = store.get(Collection::Couriers, "c1").await.unwrap().unwrap();
        assert!(current.get("x").is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = RedbStore::open_in_memory().unwrap();
        let err = store
            .update(Collection::Orders, "nope", Filter::All, Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_moves_unique_key() {
        let store = RedbStore::open_in_memory().unwrap();
        store
            .insert(Collection::Tables, doc(json!({"id": "t1", "number": 1})))
            .await
            .unwrap();
        store
            .insert(Collection::Tables, doc(json!({"id": "t2", "number": 2})))
            .await
            .unwrap();

        let err = store
            .update(Collection::Tables, "t2", Filter::All, doc(json!({"number": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        store
            .update(Collection::Tables, "t2", Filter::All, doc(json!({"number": 3})))
            .await
            .unwrap();
        // Old key released
        store
            .insert(Collection::Tables, doc(json!({"id": "t4", "number": 2})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_count_and_delete_many() {
        let store = RedbStore::open_in_memory().unwrap();
        for (id, status, created) in [("a", "pending", 3), ("b", "delivered", 1), ("c", "pending", 2)] {
            store
                .insert(
                    Collection::Orders,
                    doc(json!({"id": id, "order_number": format!("N-{}", id), "status": status, "created_at": created})),
                )
                .await
                .unwrap();
        }

        let pending = store
            .find(
                Collection::Orders,
                Query::new(Filter::eq("status", "pending")).sort_by("created_at", SortOrder::Desc),
            )
            .await
            .unwrap();
        let ids: Vec<_> = pending.iter().map(|d| d["id"].as_str().unwrap().to_string()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert_eq!(store.count(Collection::Orders, Filter::All).await.unwrap(), 3);

        let removed = store
            .delete_many(Collection::Orders, vec!["a".into(), "b".into(), "zzz".into()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count(Collection::Orders, Filter::All).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_conditional_updates_single_winner() {
        let store = Arc::new(RedbStore::open_in_memory().unwrap());
        store
            .insert(Collection::Orders, doc(json!({"id": "o1", "order_number": "N-1", "courier_id": null})))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(
                        Collection::Orders,
                        "o1",
                        Filter::is_null("courier_id"),
                        doc(json!({"courier_id": format!("c{}", i)})),
                    )
                    .await
                    .is_ok()
            }));
        }
        let mut wins = 0;
        for h in handles {
            if h.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_write_past_deadline_is_not_persisted() {
        let base = RedbStore::open_in_memory().unwrap();
        let store = RedbStore {
            db: base.db.clone(),
            op_timeout: Duration::from_millis(50),
        };

        // Another writer holds the write lock well past the deadline
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let db = base.db.clone();
        let holder = std::thread::spawn(move || {
            let txn = db.begin_write().unwrap();
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(300));
            drop(txn);
        });
        locked_rx.recv().unwrap();

        let err = store
            .insert(Collection::Orders, doc(json!({"id": "o1", "order_number": "N-1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
        assert!(err.is_retryable());

        holder.join().unwrap();
        assert!(base.get(Collection::Orders, "o1").await.unwrap().is_none());

        // The unique key was not claimed either, so a retry succeeds
        base.insert(Collection::Orders, doc(json!({"id": "o1", "order_number": "N-1"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_file_backed_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.redb");
        {
            let store = RedbStore::open(&path, DEFAULT_OP_TIMEOUT).unwrap();
            store
                .insert(Collection::Customers, doc(json!({"id": "k1", "name": "Ana"})))
                .await
                .unwrap();
        }
        let store = RedbStore::open(&path, DEFAULT_OP_TIMEOUT).unwrap();
        let got = store.get(Collection::Customers, "k1").await.unwrap().unwrap();
        assert_eq!(got["name"], json!("Ana"));
    }
}
