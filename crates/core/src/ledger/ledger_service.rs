use chrono::Utc;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::ledger_locks::PortfolioLocks;
use super::ledger_model::{
    BuyOutcome, CashOperation, HistoryFilters, HoldingInput, HoldingsTotals, HoldingsView,
    PositionUpdate, SellOutcome, TransactionHistory, TransactionHistoryQuery,
};
use super::ledger_traits::LedgerServiceTrait;
use crate::constants::{
    DEFAULT_CASH_BALANCE, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, MAX_NOTES_LENGTH,
};
use crate::errors::{Error, ValidationError};
use crate::holdings::{Holding, NewHolding};
use crate::portfolios::Portfolio;
use crate::repository::{QueryFilters, RepositoryTrait};
use crate::transactions::{NewTransaction, Transaction, TransactionType};
use crate::validation::{
    validate_date, validate_notes, validate_position_id, validate_price, validate_quantity,
    validate_ticker, validate_total, validate_transaction_type,
};
use crate::Result;

/// Ledger service over three injected repositories.
///
/// Writes to the same portfolio are serialized through [`PortfolioLocks`].
/// The store has no multi-record transaction, so a failure between the
/// holding, transaction and cash writes leaves the earlier writes in place;
/// such failures are logged with every id involved.
pub struct LedgerService {
    holdings: Arc<dyn RepositoryTrait<Holding>>,
    transactions: Arc<dyn RepositoryTrait<Transaction>>,
    portfolios: Arc<dyn RepositoryTrait<Portfolio>>,
    locks: PortfolioLocks,
    default_cash_balance: Decimal,
}

impl LedgerService {
    pub fn new(
        holdings: Arc<dyn RepositoryTrait<Holding>>,
        transactions: Arc<dyn RepositoryTrait<Transaction>>,
        portfolios: Arc<dyn RepositoryTrait<Portfolio>>,
    ) -> Self {
        Self {
            holdings,
            transactions,
            portfolios,
            locks: PortfolioLocks::new(),
            default_cash_balance: DEFAULT_CASH_BALANCE,
        }
    }

    /// Overrides the starting balance of lazily created portfolios.
    pub fn with_default_cash_balance(mut self, balance: Decimal) -> Self {
        self.default_cash_balance = balance;
        self
    }

    /// Applies a cash delta without taking the portfolio lock. Callers must
    /// already hold it.
    async fn apply_cash_delta(
        &self,
        amount: Decimal,
        operation: CashOperation,
        portfolio_id: &str,
    ) -> Result<Decimal> {
        let mut portfolio = self.get_or_create_portfolio(portfolio_id).await?;
        let new_balance = match operation {
            CashOperation::Add => portfolio.add_cash(amount)?,
            CashOperation::Subtract => portfolio.withdraw_cash(amount)?,
        };
        self.portfolios
            .update(portfolio_id, portfolio_id, portfolio)
            .await?;
        info!(
            "Cash balance of {} updated ({:?} {}): {}",
            portfolio_id, operation, amount, new_balance
        );
        Ok(new_balance)
    }

    fn load_holding(&self, position_id: &str, portfolio_id: &str) -> Result<Holding> {
        self.holdings
            .get_by_id(position_id, portfolio_id)?
            .ok_or_else(|| Error::ItemNotFound(format!("Position {} not found", position_id)))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait::async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn get_or_create_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        if let Some(portfolio) = self.portfolios.get_by_id(portfolio_id, portfolio_id)? {
            return Ok(portfolio);
        }

        let portfolio = Portfolio::new(portfolio_id, self.default_cash_balance);
        match self.portfolios.create(portfolio).await {
            Ok(created) => {
                info!(
                    "Created portfolio {} with cash balance {}",
                    portfolio_id, created.cash_balance
                );
                Ok(created)
            }
            // Lost a creation race; the winner's record is the one to use.
            Err(e) if e.is_duplicate() => {
                debug!("Portfolio {} created concurrently, re-reading", portfolio_id);
                self.portfolios
                    .get_by_id(portfolio_id, portfolio_id)?
                    .ok_or_else(|| {
                        Error::Unexpected(format!(
                            "Portfolio {} reported as duplicate but not found",
                            portfolio_id
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    async fn get_cash_balance(&self, portfolio_id: &str) -> Result<Decimal> {
        Ok(self.get_or_create_portfolio(portfolio_id).await?.cash_balance)
    }

    async fn update_cash_balance(
        &self,
        amount: Decimal,
        operation: CashOperation,
        portfolio_id: &str,
    ) -> Result<Decimal> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::invalid(format!(
                "Amount cannot be negative: {}",
                amount
            ))
            .into());
        }
        let _guard = self.locks.acquire(portfolio_id).await;
        self.apply_cash_delta(amount, operation, portfolio_id).await
    }

    async fn add_holding(&self, input: HoldingInput, portfolio_id: &str) -> Result<BuyOutcome> {
        let ticker = validate_ticker(&input.ticker)?;
        let quantity = validate_quantity(input.quantity, false)?;
        let price = validate_price(input.purchase_price, false)?;
        let purchase_date = validate_date(input.purchase_date.as_deref())?;
        let notes = validate_notes(input.notes.as_deref(), MAX_NOTES_LENGTH)?;

        let _guard = self.locks.acquire(portfolio_id).await;

        let total_cost = validate_total(quantity, price, "Purchase total")?;
        let balance = self.get_or_create_portfolio(portfolio_id).await?.cash_balance;
        if total_cost > balance {
            warn!(
                "Rejected purchase of {} {} in {}: cost {} exceeds balance {}",
                quantity, ticker, portfolio_id, total_cost, balance
            );
            return Err(Error::InsufficientFunds(format!(
                "Insufficient funds: purchase costs {}, but only {} available",
                total_cost, balance
            )));
        }

        let holding = NewHolding {
            portfolio_id: portfolio_id.to_string(),
            ticker: ticker.clone(),
            quantity,
            purchase_price: price,
            purchase_date,
            notes,
        }
        .into_holding()?;
        let holding = self.holdings.create(holding).await?;

        let transaction = NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            transaction_type: TransactionType::Buy,
            ticker: Some(ticker.clone()),
            quantity: Some(quantity),
            price,
            total: -total_cost,
            date: purchase_date,
            notes: Some(format!("Purchase of {} shares at ${}", quantity, price)),
        }
        .into_transaction()?;
        let transaction = self.transactions.create(transaction).await.map_err(|e| {
            error!(
                "Holding {} created in {} but its BUY transaction failed: {}",
                holding.id, portfolio_id, e
            );
            e
        })?;

        let new_cash_balance = self
            .apply_cash_delta(total_cost, CashOperation::Subtract, portfolio_id)
            .await
            .map_err(|e| {
                error!(
                    "Holding {} and transaction {} recorded in {} but cash debit of {} failed: {}",
                    holding.id, transaction.id, portfolio_id, total_cost, e
                );
                e
            })?;

        info!(
            "Bought {} {} at {} in {} (holding {})",
            quantity, ticker, price, portfolio_id, holding.id
        );
        Ok(BuyOutcome {
            holding,
            transaction,
            total_cost,
            new_cash_balance,
        })
    }

    async fn remove_holding(
        &self,
        position_id: &str,
        quantity: Option<Decimal>,
        portfolio_id: &str,
    ) -> Result<SellOutcome> {
        let position_id = validate_position_id(position_id)?;
        let requested = quantity
            .map(|q| validate_quantity(q, false))
            .transpose()?;

        let _guard = self.locks.acquire(portfolio_id).await;

        let mut holding = self.load_holding(&position_id, portfolio_id)?;
        let quantity_sold = requested.unwrap_or(holding.quantity);
        if quantity_sold > holding.quantity {
            return Err(ValidationError::invalid(format!(
                "Cannot sell {} shares: only {} shares held",
                quantity_sold, holding.quantity
            ))
            .into());
        }

        let holding_removed = quantity_sold == holding.quantity;
        let sale_price = holding.purchase_price;
        let proceeds = validate_total(quantity_sold, sale_price, "Sale proceeds")?;

        let remaining_quantity = if holding_removed {
            self.holdings.delete(&position_id, portfolio_id).await?;
            Decimal::ZERO
        } else {
            holding.quantity -= quantity_sold;
            let remaining = holding.quantity;
            self.holdings
                .update(&position_id, portfolio_id, holding.clone())
                .await?;
            remaining
        };

        let transaction = NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            transaction_type: TransactionType::Sell,
            ticker: Some(holding.ticker.clone()),
            quantity: Some(quantity_sold),
            price: sale_price,
            total: proceeds,
            date: Utc::now(),
            notes: Some(format!("Sale of {} shares at ${}", quantity_sold, sale_price)),
        }
        .into_transaction()?;
        let transaction = self.transactions.create(transaction).await.map_err(|e| {
            error!(
                "Position {} in {} reduced by {} but its SELL transaction failed: {}",
                position_id, portfolio_id, quantity_sold, e
            );
            e
        })?;

        let new_cash_balance = self
            .apply_cash_delta(proceeds, CashOperation::Add, portfolio_id)
            .await
            .map_err(|e| {
                error!(
                    "Sale {} of position {} recorded in {} but cash credit of {} failed: {}",
                    transaction.id, position_id, portfolio_id, proceeds, e
                );
                e
            })?;

        info!(
            "Sold {} {} from position {} in {} (removed: {})",
            quantity_sold, holding.ticker, position_id, portfolio_id, holding_removed
        );
        Ok(SellOutcome {
            transaction,
            quantity_sold,
            proceeds,
            new_cash_balance,
            holding_removed,
            remaining_quantity,
        })
    }

    async fn update_position(
        &self,
        position_id: &str,
        update: PositionUpdate,
        portfolio_id: &str,
    ) -> Result<Holding> {
        let position_id = validate_position_id(position_id)?;

        let _guard = self.locks.acquire(portfolio_id).await;

        let mut holding = self.load_holding(&position_id, portfolio_id)?;
        if update.notes.is_none() && update.purchase_price.is_none() {
            return Err(ValidationError::invalid("No fields to update").into());
        }
        if let Some(price) = update.purchase_price {
            holding.purchase_price = validate_price(price, false)?;
            holding.cost_basis()?;
        }
        if let Some(notes) = update.notes.as_deref() {
            holding.notes = validate_notes(Some(notes), MAX_NOTES_LENGTH)?;
        }

        let updated = self
            .holdings
            .update(&position_id, portfolio_id, holding)
            .await?;
        info!("Updated position {} in {}", position_id, portfolio_id);
        Ok(updated)
    }

    async fn get_holdings(
        &self,
        filter_ticker: Option<&str>,
        include_totals: bool,
        portfolio_id: &str,
    ) -> Result<HoldingsView> {
        let ticker = non_blank(filter_ticker).map(validate_ticker).transpose()?;

        let mut holdings = match &ticker {
            Some(t) => self
                .holdings
                .query(&QueryFilters::new().with("ticker", t.as_str()), Some(portfolio_id))?,
            None => self.holdings.get_all(Some(portfolio_id))?,
        };
        holdings.sort_by(|a, b| {
            a.ticker
                .cmp(&b.ticker)
                .then_with(|| a.purchase_date.cmp(&b.purchase_date))
        });

        let totals = if include_totals {
            let cash_balance = self.get_cash_balance(portfolio_id).await?;
            Some(HoldingsTotals::compute(&holdings, cash_balance)?)
        } else {
            None
        };

        debug!("Loaded {} holdings for {}", holdings.len(), portfolio_id);
        Ok(HoldingsView {
            count: holdings.len(),
            holdings,
            totals,
        })
    }

    async fn get_transaction_history(
        &self,
        query: TransactionHistoryQuery,
        portfolio_id: &str,
    ) -> Result<TransactionHistory> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT as i64)
            .clamp(1, MAX_HISTORY_LIMIT as i64) as usize;
        let ticker = non_blank(query.ticker.as_deref())
            .map(validate_ticker)
            .transpose()?;
        let transaction_type = non_blank(query.transaction_type.as_deref())
            .map(validate_transaction_type)
            .transpose()?;
        let start_date = non_blank(query.start_date.as_deref());
        let end_date = non_blank(query.end_date.as_deref());
        let start = start_date.map(|d| validate_date(Some(d))).transpose()?;
        let end = end_date.map(|d| validate_date(Some(d))).transpose()?;

        let mut filters = QueryFilters::new();
        if let Some(t) = &ticker {
            filters = filters.with("ticker", t.as_str());
        }
        if let Some(t) = transaction_type {
            filters = filters.with("type", t.as_str());
        }

        let mut transactions: Vec<Transaction> = self
            .transactions
            .query(&filters, Some(portfolio_id))?
            .into_iter()
            .filter(|tx| start.map_or(true, |s| tx.date >= s))
            .filter(|tx| end.map_or(true, |e| tx.date <= e))
            .collect();
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        transactions.truncate(limit);

        debug!(
            "Loaded {} transactions for {} (limit {})",
            transactions.len(),
            portfolio_id,
            limit
        );
        Ok(TransactionHistory {
            count: transactions.len(),
            transactions,
            filters: HistoryFilters {
                ticker,
                start_date: start_date.map(str::to_string),
                end_date: end_date.map(str::to_string),
                transaction_type: transaction_type.map(|t| t.as_code().to_string()),
                limit,
            },
        })
    }
}
