use std::sync::Arc;

use crate::{
    auth::ApiKeyAuth,
    config::{Config, LogFormat, StorageMode},
};
use ledgerfolio_core::{
    holdings::Holding,
    ledger::{LedgerService, LedgerServiceTrait},
    portfolios::Portfolio,
    repository::{Entity, InMemoryRepository, RepositoryTrait},
    tools::PortfolioTools,
    transactions::Transaction,
    watchlists::{Watchlist, WatchlistService, WatchlistServiceTrait},
};
use ledgerfolio_storage_sqlite::{self as storage, DbPool, DocumentRepository, WriteHandle};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub ledger: Arc<dyn LedgerServiceTrait>,
    pub tools: PortfolioTools,
    pub watchlist_service: Arc<dyn WatchlistServiceTrait>,
    pub portfolio_id: String,
    pub user_id: String,
    /// Present when running on SQLite; probed by `/readyz`.
    pub pool: Option<Arc<DbPool>>,
    pub auth: Option<Arc<ApiKeyAuth>>,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

struct Repositories {
    holdings: Arc<dyn RepositoryTrait<Holding>>,
    transactions: Arc<dyn RepositoryTrait<Transaction>>,
    portfolios: Arc<dyn RepositoryTrait<Portfolio>>,
    watchlists: Arc<dyn RepositoryTrait<Watchlist>>,
}

fn sqlite_repository<T: Entity>(
    pool: &Arc<DbPool>,
    writer: &WriteHandle,
) -> Arc<dyn RepositoryTrait<T>> {
    Arc::new(DocumentRepository::<T>::new(pool.clone(), writer.clone()))
}

fn memory_repository<T: Entity>() -> Arc<dyn RepositoryTrait<T>> {
    Arc::new(InMemoryRepository::<T>::new())
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (repos, pool) = match config.storage {
        StorageMode::Sqlite => {
            let db_path = storage::init(&config.db_path)?;
            tracing::info!("Database path in use: {}", db_path);
            let pool = storage::create_pool(&db_path)?;
            storage::run_migrations(&pool)?;
            let writer = storage::spawn_writer(pool.clone())?;

            let repos = Repositories {
                holdings: sqlite_repository(&pool, &writer),
                transactions: sqlite_repository(&pool, &writer),
                portfolios: sqlite_repository(&pool, &writer),
                watchlists: sqlite_repository(&pool, &writer),
            };
            (repos, Some(pool))
        }
        StorageMode::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let repos = Repositories {
                holdings: memory_repository(),
                transactions: memory_repository(),
                portfolios: memory_repository(),
                watchlists: memory_repository(),
            };
            (repos, None)
        }
    };

    let ledger: Arc<dyn LedgerServiceTrait> = Arc::new(LedgerService::new(
        repos.holdings,
        repos.transactions,
        repos.portfolios,
    ));
    let watchlist_service: Arc<dyn WatchlistServiceTrait> =
        Arc::new(WatchlistService::new(repos.watchlists));
    let tools = PortfolioTools::new(ledger.clone(), config.portfolio_id.clone());

    let auth = if config.auth_required() {
        let key = config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("API key is required when authentication is enabled"))?;
        Some(Arc::new(ApiKeyAuth::new(key.clone())))
    } else {
        tracing::warn!(
            "API authentication is disabled (auth_enabled={}, dev_mode={})",
            config.auth_enabled,
            config.dev_mode
        );
        None
    };

    Ok(Arc::new(AppState {
        ledger,
        tools,
        watchlist_service,
        portfolio_id: config.portfolio_id.clone(),
        user_id: config.user_id.clone(),
        pool,
        auth,
    }))
}
