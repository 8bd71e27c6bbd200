//! Gas price and gas limit estimation with static fallbacks.
//!
//! Fee estimation never fails a withdrawal: a read or estimate error degrades
//! to the configured default, logged as a warning.

use alloy::rpc::types::TransactionRequest;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::blockchain::chain::ChainClient;
use crate::config::schema::FeeConfig;
use crate::observability::metrics;

const WEI_PER_GWEI: u64 = 1_000_000_000;

/// 5 gwei, used when the configured default is not a valid wei amount.
const FALLBACK_GAS_PRICE_WEI: u128 = 5_000_000_000;

/// A fee parameter and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeQuote<T> {
    /// Derived from live network data plus the configured margin.
    Live(T),
    /// Live data was unavailable; this is the configured default.
    Fallback(T),
}

impl<T: Copy> FeeQuote<T> {
    pub fn value(&self) -> T {
        match self {
            Self::Live(v) | Self::Fallback(v) => *v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Convert a gwei quantity to wei, truncating sub-wei fractions.
///
/// `None` for negative or out-of-range input.
pub fn gwei_to_wei(gwei: Decimal) -> Option<u128> {
    if gwei.is_sign_negative() {
        return None;
    }
    gwei.checked_mul(Decimal::from(WEI_PER_GWEI))?
        .trunc()
        .to_u128()
}

/// Derives gas price and gas limit for a pending transaction.
#[derive(Debug, Clone)]
pub struct FeeEstimator {
    default_gas_limit: u64,
    default_gas_price_wei: u128,
    gas_price_premium_percent: u32,
    gas_limit_margin_percent: u32,
}

impl FeeEstimator {
    /// Build from fee configuration.
    ///
    /// A default gas price that does not convert to wei (negative or out of
    /// range) is replaced with 5 gwei and logged.
    pub fn new(config: &FeeConfig) -> Self {
        let default_gas_price_wei = gwei_to_wei(config.default_gas_price_gwei).unwrap_or_else(|| {
            tracing::warn!(
                configured_gwei = %config.default_gas_price_gwei,
                fallback_wei = FALLBACK_GAS_PRICE_WEI,
                "Invalid default gas price, using 5 gwei"
            );
            FALLBACK_GAS_PRICE_WEI
        });

        Self {
            default_gas_limit: config.default_gas_limit,
            default_gas_price_wei,
            gas_price_premium_percent: config.gas_price_premium_percent,
            gas_limit_margin_percent: config.gas_limit_margin_percent,
        }
    }

    /// Live gas price plus premium, or the configured default.
    pub async fn gas_price(&self, chain: &dyn ChainClient) -> FeeQuote<u128> {
        match chain.gas_price().await {
            Ok(price) => FeeQuote::Live(
                price.saturating_mul(100 + u128::from(self.gas_price_premium_percent)) / 100,
            ),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    default_wei = self.default_gas_price_wei,
                    "Failed to get current gas price. Using default."
                );
                metrics::record_fee_fallback("gas_price");
                FeeQuote::Fallback(self.default_gas_price_wei)
            }
        }
    }

    /// Gas estimate for the exact call plus margin, or the configured default.
    pub async fn gas_limit(&self, chain: &dyn ChainClient, call: TransactionRequest) -> FeeQuote<u64> {
        match chain.estimate_gas(call).await {
            Ok(estimate) => {
                let padded = u128::from(estimate) * (100 + u128::from(self.gas_limit_margin_percent)) / 100;
                FeeQuote::Live(u64::try_from(padded).unwrap_or(u64::MAX))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    default = self.default_gas_limit,
                    "Failed to estimate gas. Using default."
                );
                metrics::record_fee_fallback("gas_limit");
                FeeQuote::Fallback(self.default_gas_limit)
            }
        }
    }
}
