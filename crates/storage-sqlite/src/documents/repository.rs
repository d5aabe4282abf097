use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::documents::dsl as docs;
use ledgerfolio_core::errors::{DatabaseError, Error};
use ledgerfolio_core::repository::{Entity, QueryFilters, RepositoryTrait};
use ledgerfolio_core::Result;

use super::model::DocumentDB;

/// Repository for one entity type stored as JSON documents.
///
/// The record type, and with it the container name, is fixed when the
/// repository is constructed. Reads use the pool; writes go through the
/// single writer actor.
pub struct DocumentRepository<T: Entity> {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> DocumentRepository<T> {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self {
            pool,
            writer,
            _entity: PhantomData,
        }
    }

    fn load(&self, partition: Option<&str>) -> Result<Vec<DocumentDB>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = docs::documents
            .filter(docs::container.eq(T::CONTAINER))
            .into_boxed();
        if let Some(pk) = partition {
            query = query.filter(docs::partition_key.eq(pk.to_string()));
        }

        query
            .select(DocumentDB::as_select())
            .order((docs::partition_key.asc(), docs::id.asc()))
            .load::<DocumentDB>(&mut conn)
            .into_core()
    }
}

#[async_trait]
impl<T: Entity> RepositoryTrait<T> for DocumentRepository<T> {
    async fn create(&self, item: T) -> Result<T> {
        let row = DocumentDB::from_entity(&item, Utc::now())?;
        self.writer
            .exec(move |conn| {
                diesel::insert_into(docs::documents)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;
        debug!("Created {} document {}", T::CONTAINER, item.id());
        Ok(item)
    }

    fn get_by_id(&self, id: &str, partition_key: &str) -> Result<Option<T>> {
        let mut conn = get_connection(&self.pool)?;

        let row = docs::documents
            .filter(docs::container.eq(T::CONTAINER))
            .filter(docs::partition_key.eq(partition_key))
            .filter(docs::id.eq(id))
            .select(DocumentDB::as_select())
            .first::<DocumentDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(DocumentDB::into_entity).transpose()
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
        item.touch();

        let row = DocumentDB::from_entity(&item, Utc::now())?;
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(
                    docs::documents
                        .filter(docs::container.eq(&row.container))
                        .filter(docs::partition_key.eq(&row.partition_key))
                        .filter(docs::id.eq(&row.id)),
                )
                .set((docs::body.eq(&row.body), docs::updated_at.eq(&row.updated_at)))
                .execute(conn)
                .into_core()?;

                if affected == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "{} '{}' not found in partition '{}'",
                        row.container, row.id, row.partition_key
                    ))
                    .into());
                }
                Ok(())
            })
            .await?;
        Ok(item)
    }

    async fn delete(&self, id: &str, partition_key: &str) -> Result<bool> {
        let id = id.to_string();
        let partition_key = partition_key.to_string();
        let affected = self
            .writer
            .exec(move |conn| {
                diesel::delete(
                    docs::documents
                        .filter(docs::container.eq(T::CONTAINER))
                        .filter(docs::partition_key.eq(&partition_key))
                        .filter(docs::id.eq(&id)),
                )
                .execute(conn)
                .into_core()
            })
            .await?;
        Ok(affected > 0)
    }

    fn get_all(&self, partition_key: Option<&str>) -> Result<Vec<T>> {
        self.load(partition_key)?
            .into_iter()
            .map(DocumentDB::into_entity)
            .collect()
    }

    /// Field predicates are evaluated on the decoded JSON bodies.
    fn query(&self, filters: &QueryFilters, partition_key: Option<&str>) -> Result<Vec<T>> {
        let mut matched = Vec::new();
        for row in self.load(partition_key)? {
            if filters.matches(&row.to_value()?) {
                matched.push(row.into_entity()?);
            }
        }
        Ok(matched)
    }
}
