use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable currency amount. Arithmetic returns a new instance and
/// refuses to mix currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("Cannot divide by zero")]
    DivideByZero,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self, MoneyError> {
        if amount < Decimal::ZERO {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Self {
            amount,
            currency: currency.into(),
        })
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Money::new(self.amount + other.amount, self.currency.clone())
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        // Result must stay non-negative, same as construction.
        Money::new(self.amount - other.amount, self.currency.clone())
    }

    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        Money::new(self.amount * factor, self.currency.clone())
    }

    pub fn divide(&self, divisor: Decimal) -> Result<Money, MoneyError> {
        if divisor == Decimal::ZERO {
            return Err(MoneyError::DivideByZero);
        }
        Money::new(self.amount / divisor, self.currency.clone())
    }

    pub fn is_greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.check_currency(other)?;
        Ok(self.amount > other.amount)
    }

    pub fn is_less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.check_currency(other)?;
        Ok(self.amount < other.amount)
    }

    pub fn equals(&self, other: &Money) -> Result<bool, MoneyError> {
        self.check_currency(other)?;
        Ok(self.amount == other.amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == Decimal::ZERO
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    fn check_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
