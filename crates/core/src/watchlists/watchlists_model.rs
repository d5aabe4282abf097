//! Watchlist domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{containers, MAX_NOTES_LENGTH};
use crate::repository::Entity;
use crate::validation::{validate_notes, validate_ticker, validate_watchlist_name};
use crate::Result;

/// A user-owned named list of tickers, partitioned by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tickers: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Watchlist {
    /// Builds a new list, normalizing tickers and dropping duplicates while
    /// keeping first-seen order.
    pub fn new(
        user_id: impl Into<String>,
        name: &str,
        tickers: &[String],
        notes: Option<&str>,
    ) -> Result<Self> {
        let now = Utc::now();
        let mut watchlist = Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: validate_watchlist_name(name)?,
            tickers: Vec::with_capacity(tickers.len()),
            notes: validate_notes(notes, MAX_NOTES_LENGTH)?,
            created_at: now,
            updated_at: now,
        };
        for ticker in tickers {
            watchlist.add_ticker(ticker)?;
        }
        watchlist.updated_at = now;
        Ok(watchlist)
    }

    /// Adds a ticker unless already present. Returns whether it was added.
    pub fn add_ticker(&mut self, ticker: &str) -> Result<bool> {
        let normalized = validate_ticker(ticker)?;
        if self.tickers.contains(&normalized) {
            return Ok(false);
        }
        self.tickers.push(normalized);
        self.touch();
        Ok(true)
    }

    /// Removes a ticker. Returns whether it was on the list.
    pub fn remove_ticker(&mut self, ticker: &str) -> bool {
        let normalized = ticker.trim().to_uppercase();
        let before = self.tickers.len();
        self.tickers.retain(|t| *t != normalized);
        let removed = self.tickers.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn contains(&self, ticker: &str) -> bool {
        let normalized = ticker.trim().to_uppercase();
        self.tickers.iter().any(|t| *t == normalized)
    }
}

impl Entity for Watchlist {
    const CONTAINER: &'static str = containers::WATCHLISTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.user_id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
