//! Token amounts: exact decimal ↔ base-unit conversion.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Why a user-supplied amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("amount has more than {0} decimal places")]
    TooPrecise(u8),

    #[error("amount is too large")]
    Overflow,

    #[error("not a decimal number: {0}")]
    Parse(String),
}

/// A token quantity held as integer base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAmount {
    base_units: U256,
    decimals: u8,
}

impl TokenAmount {
    /// Wrap a raw base-unit quantity (as returned by the token contract).
    pub fn from_base_units(base_units: U256, decimals: u8) -> Self {
        Self { base_units, decimals }
    }

    /// Scale a user-facing decimal to base units.
    ///
    /// Exact: fails instead of rounding when `amount` carries more
    /// fractional digits than the token supports.
    pub fn from_decimal(amount: Decimal, decimals: u8) -> Result<Self, AmountError> {
        if amount <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        let amount = amount.normalize();
        let scale = amount.scale();
        if scale > u32::from(decimals) {
            return Err(AmountError::TooPrecise(decimals));
        }

        // Positive, so the mantissa fits in u128.
        let mantissa = U256::from(amount.mantissa().unsigned_abs());
        let factor = U256::from(10u8).pow(U256::from(u32::from(decimals) - scale));
        let base_units = mantissa.checked_mul(factor).ok_or(AmountError::Overflow)?;

        Ok(Self { base_units, decimals })
    }

    /// Parse a decimal string such as `"200"` or `"12.5"`.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        let amount = Decimal::from_str_exact(input.trim())
            .map_err(|e| AmountError::Parse(e.to_string()))?;
        Self::from_decimal(amount, decimals)
    }

    pub fn base_units(&self) -> U256 {
        self.base_units
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

/// Renders exactly `decimals` fractional digits, e.g. `200.000000`.
impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.base_units);
        }

        let scale = U256::from(10u8).pow(U256::from(self.decimals));
        let whole = self.base_units / scale;
        let fraction = (self.base_units % scale).to_string();
        write!(
            f,
            "{}.{:0>width$}",
            whole,
            fraction,
            width = usize::from(self.decimals)
        )
    }
}
