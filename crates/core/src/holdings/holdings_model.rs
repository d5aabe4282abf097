//! Holding domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{containers, MAX_NOTES_LENGTH};
use crate::repository::Entity;
use crate::errors::ValidationError;
use crate::validation::{
    validate_notes, validate_price, validate_quantity, validate_ticker, validate_total,
};
use crate::Result;

/// One open position in a portfolio.
///
/// `quantity` is always a positive whole number while the record exists; a
/// position sold down to zero is deleted instead of stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holding {
    /// Amount paid for the position: quantity x purchase price.
    pub fn cost_basis(&self) -> Result<Decimal> {
        Ok(validate_total(self.quantity, self.purchase_price, "Cost basis")?)
    }

    /// Market value at `current_price`.
    pub fn calculate_value(&self, current_price: Decimal) -> Result<Decimal> {
        Ok(validate_total(self.quantity, current_price, "Position value")?)
    }

    pub fn calculate_gain_loss(&self, current_price: Decimal) -> Result<Decimal> {
        let value = self.calculate_value(current_price)?;
        value
            .checked_sub(self.cost_basis()?)
            .ok_or_else(|| ValidationError::invalid("Gain/loss is too large").into())
    }

    /// Gain or loss relative to cost basis, in percent. Zero when the
    /// position cost nothing.
    pub fn calculate_gain_loss_percent(&self, current_price: Decimal) -> Result<Decimal> {
        let cost = self.cost_basis()?;
        if cost.is_zero() {
            return Ok(Decimal::ZERO);
        }
        self.calculate_gain_loss(current_price)?
            .checked_div(cost)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| ValidationError::invalid("Gain/loss percent is too large").into())
    }
}

/// Input model for opening a new position.
#[derive(Debug, Clone)]
pub struct NewHolding {
    pub portfolio_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewHolding {
    /// Normalizes and checks every field, returning the stored record with a
    /// fresh id.
    pub fn into_holding(self) -> Result<Holding> {
        let ticker = validate_ticker(&self.ticker)?;
        let quantity = validate_quantity(self.quantity, false)?;
        let purchase_price = validate_price(self.purchase_price, false)?;
        let notes = validate_notes(self.notes.as_deref(), MAX_NOTES_LENGTH)?;
        let now = Utc::now();

        Ok(Holding {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: self.portfolio_id,
            ticker,
            quantity,
            purchase_price,
            purchase_date: self.purchase_date,
            notes,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Entity for Holding {
    const CONTAINER: &'static str = containers::HOLDINGS;

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.portfolio_id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
