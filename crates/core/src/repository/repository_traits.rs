use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// A document stored in one named container, partitioned by a key.
///
/// Ids are unique within a partition. Serialization goes through serde so any
/// adapter can persist the entity as a JSON document.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Logical container name (`holdings`, `transactions`, ...).
    const CONTAINER: &'static str;

    fn id(&self) -> &str;

    fn partition_key(&self) -> &str;

    /// Refreshes the modification timestamp before an update is written.
    fn touch(&mut self);
}

/// Conjunction of field-equality predicates over an entity's JSON form.
///
/// Used as the storage-agnostic query language: `{"ticker": "AAPL"}`
/// matches documents whose top-level `ticker` field equals `"AAPL"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters {
    fields: Vec<(String, Value)>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// True when every predicate holds on `document`. Empty filters match all.
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// Storage-agnostic persistence contract, implemented once per adapter.
///
/// Reads are synchronous like the rest of the repository traits in this
/// crate; writes are async so adapters can serialize them through a writer.
#[async_trait]
pub trait RepositoryTrait<T: Entity>: Send + Sync {
    /// Fails with `DatabaseError::UniqueViolation` if the id already exists
    /// in the entity's partition.
    async fn create(&self, item: T) -> Result<T>;

    fn get_by_id(&self, id: &str, partition_key: &str) -> Result<Option<T>>;

    /// Touches the entity and replaces the stored copy. Fails with
    /// `DatabaseError::NotFound` when nothing is stored under `id`.
    async fn update(&self, id: &str, partition_key: &str, item: T) -> Result<T>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: &str, partition_key: &str) -> Result<bool>;

    fn get_all(&self, partition_key: Option<&str>) -> Result<Vec<T>>;

    fn query(&self, filters: &QueryFilters, partition_key: Option<&str>) -> Result<Vec<T>>;

    fn exists(&self, id: &str, partition_key: &str) -> Result<bool> {
        Ok(self.get_by_id(id, partition_key)?.is_some())
    }
}
