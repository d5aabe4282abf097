//! In-process repository adapter, used for tests and `LF_STORAGE=memory`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::repository_traits::{Entity, QueryFilters, RepositoryTrait};
use crate::errors::{DatabaseError, Error};
use crate::Result;

type Key = (String, String);

/// Map-backed store keyed by `(partition_key, id)`.
pub struct InMemoryRepository<T: Entity> {
    items: RwLock<BTreeMap<Key, T>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Key, T>>> {
        self.items
            .read()
            .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<Key, T>>> {
        self.items
            .write()
            .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
    }

    fn key(id: &str, partition_key: &str) -> Key {
        (partition_key.to_string(), id.to_string())
    }
}

#[async_trait]
impl<T: Entity> RepositoryTrait<T> for InMemoryRepository<T> {
    async fn create(&self, item: T) -> Result<T> {
        let key = Self::key(item.id(), item.partition_key());
        let mut items = self.write()?;
        if items.contains_key(&key) {
            return Err(DatabaseError::UniqueViolation(format!(
                "{} '{}' already exists in partition '{}'",
                T::CONTAINER,
                key.1,
                key.0
            ))
            .into());
        }
        items.insert(key, item.clone());
        Ok(item)
    }

    fn get_by_id(&self, id: &str, partition_key: &str) -> Result<Option<T>> {
        Ok(self.read()?.get(&Self::key(id, partition_key)).cloned())
    }

    async fn update(&self, id: &str, partition_key: &str, mut item: T) -> Result<T> {
        if item.id() != id || item.partition_key() != partition_key {
            return Err(Error::Unexpected(format!(
                "{} update target '{}' does not match item '{}'",
                T::CONTAINER,
                id,
                item.id()
            )));
        }
        let key = Self::key(id, partition_key);
        let mut items = self.write()?;
        if !items.contains_key(&key) {
            return Err(DatabaseError::NotFound(format!(
                "{} '{}' not found in partition '{}'",
                T::CONTAINER,
                id,
                partition_key
            ))
            .into());
        }
        item.touch();
        items.insert(key, item.clone());
        Ok(item)
    }

    async fn delete(&self, id: &str, partition_key: &str) -> Result<bool> {
        Ok(self
            .write()?
            .remove(&Self::key(id, partition_key))
            .is_some())
    }

    fn get_all(&self, partition_key: Option<&str>) -> Result<Vec<T>> {
        let items = self.read()?;
        Ok(items
            .iter()
            .filter(|((pk, _), _)| partition_key.map_or(true, |wanted| pk == wanted))
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn query(&self, filters: &QueryFilters, partition_key: Option<&str>) -> Result<Vec<T>> {
        let mut matched = Vec::new();
        for item in self.get_all(partition_key)? {
            let document = serde_json::to_value(&item)?;
            if filters.matches(&document) {
                matched.push(item);
            }
        }
        Ok(matched)
    }
}
