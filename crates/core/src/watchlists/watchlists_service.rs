use log::{debug, info};
use std::sync::Arc;

use super::watchlists_model::Watchlist;
use super::watchlists_traits::WatchlistServiceTrait;
use crate::constants::MAX_NOTES_LENGTH;
use crate::errors::{Error, ValidationError};
use crate::repository::{QueryFilters, RepositoryTrait};
use crate::validation::{validate_notes, validate_watchlist_name};
use crate::Result;

/// Service for managing watchlists.
pub struct WatchlistService {
    repository: Arc<dyn RepositoryTrait<Watchlist>>,
}

impl WatchlistService {
    pub fn new(repository: Arc<dyn RepositoryTrait<Watchlist>>) -> Self {
        Self { repository }
    }

    fn ensure_name_free(&self, name: &str, user_id: &str, except_id: Option<&str>) -> Result<()> {
        if let Some(existing) = self.find_by_name(name, user_id)? {
            if except_id != Some(existing.id.as_str()) {
                return Err(ValidationError::invalid(format!(
                    "Watchlist '{}' already exists",
                    name
                ))
                .into());
            }
        }
        Ok(())
    }

    async fn save(&self, watchlist: Watchlist) -> Result<Watchlist> {
        let id = watchlist.id.clone();
        let user_id = watchlist.user_id.clone();
        self.repository.update(&id, &user_id, watchlist).await
    }
}

#[async_trait::async_trait]
impl WatchlistServiceTrait for WatchlistService {
    async fn create_watchlist(
        &self,
        name: &str,
        tickers: &[String],
        notes: Option<&str>,
        user_id: &str,
    ) -> Result<Watchlist> {
        let watchlist = Watchlist::new(user_id, name, tickers, notes)?;
        self.ensure_name_free(&watchlist.name, user_id, None)?;

        let created = self.repository.create(watchlist).await?;
        info!(
            "Created watchlist '{}' ({}) with {} tickers for user {}",
            created.name,
            created.id,
            created.tickers.len(),
            user_id
        );
        Ok(created)
    }

    /// Lists a user's watchlists ordered by name.
    fn list_watchlists(&self, user_id: &str) -> Result<Vec<Watchlist>> {
        let mut watchlists = self.repository.get_all(Some(user_id))?;
        watchlists.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Listed {} watchlists for user {}", watchlists.len(), user_id);
        Ok(watchlists)
    }

    fn get_watchlist(&self, watchlist_id: &str, user_id: &str) -> Result<Watchlist> {
        self.repository
            .get_by_id(watchlist_id, user_id)?
            .ok_or_else(|| Error::ItemNotFound(format!("Watchlist {} not found", watchlist_id)))
    }

    fn find_by_name(&self, name: &str, user_id: &str) -> Result<Option<Watchlist>> {
        let filters = QueryFilters::new().with("name", name.trim());
        Ok(self
            .repository
            .query(&filters, Some(user_id))?
            .into_iter()
            .next())
    }

    async fn add_ticker(
        &self,
        watchlist_id: &str,
        ticker: &str,
        user_id: &str,
    ) -> Result<Watchlist> {
        let mut watchlist = self.get_watchlist(watchlist_id, user_id)?;
        if !watchlist.add_ticker(ticker)? {
            debug!("{} already on watchlist {}", ticker, watchlist_id);
            return Ok(watchlist);
        }
        self.save(watchlist).await
    }

    async fn remove_ticker(
        &self,
        watchlist_id: &str,
        ticker: &str,
        user_id: &str,
    ) -> Result<Watchlist> {
        let mut watchlist = self.get_watchlist(watchlist_id, user_id)?;
        if !watchlist.remove_ticker(ticker) {
            return Err(Error::ItemNotFound(format!(
                "Ticker {} is not on watchlist {}",
                ticker.trim().to_uppercase(),
                watchlist_id
            )));
        }
        self.save(watchlist).await
    }

    async fn update_watchlist(
        &self,
        watchlist_id: &str,
        name: Option<&str>,
        notes: Option<&str>,
        user_id: &str,
    ) -> Result<Watchlist> {
        if name.is_none() && notes.is_none() {
            return Err(ValidationError::invalid("No fields to update").into());
        }
        let mut watchlist = self.get_watchlist(watchlist_id, user_id)?;

        if let Some(name) = name {
            let name = validate_watchlist_name(name)?;
            self.ensure_name_free(&name, user_id, Some(watchlist_id))?;
            watchlist.name = name;
        }
        if let Some(notes) = notes {
            watchlist.notes = validate_notes(Some(notes), MAX_NOTES_LENGTH)?;
        }

        let updated = self.save(watchlist).await?;
        info!("Updated watchlist {}", watchlist_id);
        Ok(updated)
    }

    async fn delete_watchlist(&self, watchlist_id: &str, user_id: &str) -> Result<()> {
        if !self.repository.delete(watchlist_id, user_id).await? {
            return Err(Error::ItemNotFound(format!(
                "Watchlist {} not found",
                watchlist_id
            )));
        }
        info!("Deleted watchlist {}", watchlist_id);
        Ok(())
    }
}
