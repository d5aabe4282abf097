//! Property-based integration tests for the ledger engine.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use ledgerfolio_core::holdings::Holding;
use ledgerfolio_core::ledger::{
    HoldingInput, LedgerService, LedgerServiceTrait, TransactionHistoryQuery,
};
use ledgerfolio_core::portfolios::Portfolio;
use ledgerfolio_core::repository::InMemoryRepository;
use ledgerfolio_core::transactions::Transaction;
use ledgerfolio_core::validation::validate_ticker;
use ledgerfolio_core::Error;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn ledger(balance: Decimal) -> LedgerService {
    LedgerService::new(
        Arc::new(InMemoryRepository::<Holding>::new()),
        Arc::new(InMemoryRepository::<Transaction>::new()),
        Arc::new(InMemoryRepository::<Portfolio>::new()),
    )
    .with_default_cash_balance(balance)
}

fn input(ticker: &str, quantity: u32, price_cents: u32, date: Option<String>) -> HoldingInput {
    HoldingInput {
        ticker: ticker.to_string(),
        quantity: Decimal::from(quantity),
        purchase_price: Decimal::new(price_cents as i64, 2),
        purchase_date: date,
        notes: None,
    }
}

// =============================================================================
// Generators
// =============================================================================

/// Ticker-shaped strings in mixed case with stray whitespace.
fn arb_ticker_like() -> impl Strategy<Value = String> {
    ("[a-zA-Z]{1,10}", proptest::option::of("[a-zA-Z]{1,3}"), " {0,2}").prop_map(
        |(base, suffix, pad)| match suffix {
            Some(s) => format!("{pad}{base}.{s}{pad}"),
            None => format!("{pad}{base}{pad}"),
        },
    )
}

fn arb_date() -> impl Strategy<Value = String> {
    (2015i32..2025, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Normalizing a ticker twice gives the same uppercase result.
    #[test]
    fn prop_ticker_normalization_is_idempotent(raw in arb_ticker_like()) {
        let once = validate_ticker(&raw).unwrap();
        prop_assert_eq!(&once, &once.to_uppercase());
        prop_assert_eq!(validate_ticker(&once).unwrap(), once);
    }

    /// Arbitrary strings either fail or normalize idempotently.
    #[test]
    fn prop_ticker_validation_never_panics(raw in ".{0,20}") {
        if let Ok(once) = validate_ticker(&raw) {
            prop_assert_eq!(validate_ticker(&once).unwrap(), once);
        }
    }

    /// An affordable buy debits exactly quantity x price and records a
    /// matching negative BUY total.
    #[test]
    fn prop_affordable_buy_debits_cost(
        quantity in 1u32..500,
        price_cents in 1u32..100_000,
        balance in 1_000_000i64..10_000_000,
    ) {
        let balance = Decimal::from(balance);
        let outcome = runtime().block_on(async {
            ledger(balance)
                .add_holding(input("AAPL", quantity, price_cents, None), "p")
                .await
        }).unwrap();

        let cost = Decimal::from(quantity) * Decimal::new(price_cents as i64, 2);
        prop_assert_eq!(outcome.total_cost, cost);
        prop_assert_eq!(outcome.transaction.total, -cost);
        prop_assert_eq!(outcome.new_cash_balance, balance - cost);
        prop_assert_eq!(outcome.holding.quantity, Decimal::from(quantity));
    }

    /// A buy costing more than the balance changes nothing.
    #[test]
    fn prop_unaffordable_buy_is_rejected(
        balance_units in 0u32..10_000,
        quantity in 1u32..100,
    ) {
        let balance = Decimal::from(balance_units);
        let service = ledger(balance);
        // One share already costs more than the whole balance.
        let price_cents = (balance_units + 1) * 100;
        let (result, view) = runtime().block_on(async {
            let result = service
                .add_holding(input("MSFT", quantity, price_cents, None), "p")
                .await;
            let view = service.get_holdings(None, true, "p").await;
            (result, view)
        });

        prop_assert!(matches!(result, Err(Error::InsufficientFunds(_))));
        let view = view.unwrap();
        prop_assert_eq!(view.count, 0);
        prop_assert_eq!(view.totals.unwrap().cash_balance, balance);
    }

    /// Buying then selling any part of a position returns the sold cost to
    /// cash and leaves the rest held.
    #[test]
    fn prop_sell_restores_cash_for_sold_part(
        quantity in 1u32..200,
        sell_fraction in 0.0f64..=1.0,
        price_cents in 1u32..50_000,
    ) {
        let balance = Decimal::from(100_000_000i64);
        let sell = ((quantity as f64 * sell_fraction).ceil() as u32).clamp(1, quantity);
        let service = ledger(balance);

        let outcome = runtime().block_on(async {
            let bought = service
                .add_holding(input("NVDA", quantity, price_cents, None), "p")
                .await?;
            service
                .remove_holding(&bought.holding.id, Some(Decimal::from(sell)), "p")
                .await
        }).unwrap();

        let price = Decimal::new(price_cents as i64, 2);
        let remaining = Decimal::from(quantity - sell);
        prop_assert_eq!(outcome.proceeds, Decimal::from(sell) * price);
        prop_assert_eq!(outcome.remaining_quantity, remaining);
        prop_assert_eq!(outcome.holding_removed, sell == quantity);
        prop_assert_eq!(outcome.new_cash_balance, balance - remaining * price);
    }

    /// History never exceeds the clamped limit and is sorted newest first.
    #[test]
    fn prop_history_is_bounded_and_sorted(
        dates in proptest::collection::vec(arb_date(), 1..30),
        limit in -5i64..300,
    ) {
        let service = ledger(Decimal::from(1_000_000i64));
        let history = runtime().block_on(async {
            for date in &dates {
                service
                    .add_holding(input("SPY", 1, 100, Some(date.clone())), "p")
                    .await?;
            }
            service
                .get_transaction_history(
                    TransactionHistoryQuery { limit: Some(limit), ..Default::default() },
                    "p",
                )
                .await
        }).unwrap();

        let cap = limit.clamp(1, 200) as usize;
        prop_assert!(history.count <= cap);
        prop_assert_eq!(history.count, dates.len().min(cap));
        prop_assert!(history
            .transactions
            .windows(2)
            .all(|pair| pair[0].date >= pair[1].date));
    }
}
