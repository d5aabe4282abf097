use async_trait::async_trait;

use super::watchlists_model::Watchlist;
use crate::Result;

/// Single-entity CRUD over a user's watchlists.
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    async fn create_watchlist(
        &self,
        name: &str,
        tickers: &[String],
        notes: Option<&str>,
        user_id: &str,
    ) -> Result<Watchlist>;

    fn list_watchlists(&self, user_id: &str) -> Result<Vec<Watchlist>>;

    fn get_watchlist(&self, watchlist_id: &str, user_id: &str) -> Result<Watchlist>;

    fn find_by_name(&self, name: &str, user_id: &str) -> Result<Option<Watchlist>>;

    async fn add_ticker(&self, watchlist_id: &str, ticker: &str, user_id: &str)
        -> Result<Watchlist>;

    async fn remove_ticker(
        &self,
        watchlist_id: &str,
        ticker: &str,
        user_id: &str,
    ) -> Result<Watchlist>;

    async fn update_watchlist(
        &self,
        watchlist_id: &str,
        name: Option<&str>,
        notes: Option<&str>,
        user_id: &str,
    ) -> Result<Watchlist>;

    async fn delete_watchlist(&self, watchlist_id: &str, user_id: &str) -> Result<()>;
}
