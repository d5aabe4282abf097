use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per portfolio id.
///
/// Mutating ledger operations hold the guard for their whole multi-record
/// sequence, so two writers on the same portfolio never interleave. Locks
/// for different portfolios are independent.
///
/// Entries nobody holds or waits on are pruned on the next `acquire`, so the
/// map stays bounded by the number of portfolios with work in flight.
#[derive(Default)]
pub struct PortfolioLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PortfolioLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of portfolio ids currently tracked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub async fn acquire(&self, portfolio_id: &str) -> OwnedMutexGuard<()> {
        // The map holds one reference; any other is a holder or a waiter.
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        let lock = {
            let entry = self
                .locks
                .entry(portfolio_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        lock.lock_owned().await
    }
}
