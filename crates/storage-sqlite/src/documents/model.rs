//! Database model for stored documents.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use ledgerfolio_core::repository::Entity;
use ledgerfolio_core::Result;

/// One row of the `documents` table: an entity's JSON body addressed by
/// `(container, partition_key, id)`.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentDB {
    pub container: String,
    pub partition_key: String,
    pub id: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl DocumentDB {
    /// Serializes an entity into a row stamped with `now`.
    pub fn from_entity<T: Entity>(item: &T, now: DateTime<Utc>) -> Result<Self> {
        let stamp = now.to_rfc3339();
        Ok(Self {
            container: T::CONTAINER.to_string(),
            partition_key: item.partition_key().to_string(),
            id: item.id().to_string(),
            body: serde_json::to_string(item)?,
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn into_entity<T: Entity>(self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
