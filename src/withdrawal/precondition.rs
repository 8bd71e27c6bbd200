//! Precondition checks run before any transaction is built.

use alloy::primitives::Address;
use rust_decimal::Decimal;

use crate::blockchain::address::parse_address;
use crate::blockchain::chain::ChainClient;
use crate::withdrawal::amount::TokenAmount;
use crate::withdrawal::outcome::WithdrawalError;

/// A request that passed every precondition at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// Checksum-validated source (owner) address.
    pub source: Address,
    pub amount: TokenAmount,
}

/// Validates the request and confirms allowance and balance cover it.
#[derive(Debug, Clone)]
pub struct PreconditionChecker {
    spender: Address,
    decimals: u8,
    symbol: String,
}

impl PreconditionChecker {
    pub fn new(spender: Address, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            spender,
            decimals,
            symbol: symbol.into(),
        }
    }

    /// Check order: address, amount, allowance, balance.
    ///
    /// Allowance and balance are read live on every call and are only valid
    /// at read time.
    pub async fn check(
        &self,
        chain: &dyn ChainClient,
        source: &str,
        amount: Decimal,
    ) -> Result<VerifiedRequest, WithdrawalError> {
        let source = parse_address(source)
            .map_err(|_| WithdrawalError::InvalidAddress(source.to_string()))?;
        let amount = TokenAmount::from_decimal(amount, self.decimals)?;

        let allowance = chain
            .token_allowance(source, self.spender)
            .await
            .map_err(|e| {
                tracing::error!(owner = %source, spender = %self.spender, error = %e, "Allowance query failed");
                WithdrawalError::AllowanceQuery(e)
            })?;
        if allowance < amount.base_units() {
            return Err(WithdrawalError::InsufficientAllowance {
                available: TokenAmount::from_base_units(allowance, self.decimals),
                symbol: self.symbol.clone(),
            });
        }

        let balance = chain.token_balance(source).await.map_err(|e| {
            tracing::error!(owner = %source, error = %e, "Balance query failed");
            WithdrawalError::BalanceQuery(e)
        })?;
        if balance < amount.base_units() {
            return Err(WithdrawalError::InsufficientBalance {
                available: TokenAmount::from_base_units(balance, self.decimals),
                symbol: self.symbol.clone(),
            });
        }

        tracing::debug!(owner = %source, amount = %amount, "Preconditions satisfied");
        Ok(VerifiedRequest { source, amount })
    }
}
