//! Watchlists module - named ticker lists owned by a user.

mod watchlists_model;
mod watchlists_service;
mod watchlists_traits;


pub use watchlists_model::Watchlist;
pub use watchlists_service::WatchlistService;
pub use watchlists_traits::WatchlistServiceTrait;
