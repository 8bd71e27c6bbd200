//! Withdrawal results: the typed outcome and its user-facing messages.

use alloy::primitives::TxHash;
use std::fmt;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::withdrawal::amount::{AmountError, TokenAmount};

/// Every way a withdrawal attempt can end without a successful receipt.
///
/// `Display` is the message returned to the caller; for precondition
/// failures it carries the live available quantity.
#[derive(Debug, Error)]
pub enum WithdrawalError {
    #[error("Invalid wallet address")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Failed to check allowance")]
    AllowanceQuery(#[source] BlockchainError),

    #[error("Insufficient allowance. Available: {available} {symbol}")]
    InsufficientAllowance { available: TokenAmount, symbol: String },

    #[error("Failed to check wallet balance")]
    BalanceQuery(#[source] BlockchainError),

    #[error("Insufficient balance. Available: {available} {symbol}")]
    InsufficientBalance { available: TokenAmount, symbol: String },

    #[error("Transaction error: {0}")]
    BuildFailed(#[source] BlockchainError),

    #[error("Broadcast rejected: {0}")]
    BroadcastRejected(#[source] BlockchainError),

    #[error("Transaction confirmation timeout after {timeout_secs}s; it may still confirm, recheck {link}")]
    ConfirmationTimeout {
        tx_hash: TxHash,
        link: String,
        timeout_secs: u64,
    },

    #[error("Transaction failed or was reverted")]
    Reverted { tx_hash: TxHash },
}

impl WithdrawalError {
    /// Stable failure category, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) | Self::InvalidAmount(_) => "invalid_input",
            Self::InsufficientAllowance { .. } | Self::InsufficientBalance { .. } => {
                "precondition_failed"
            }
            Self::AllowanceQuery(_) | Self::BalanceQuery(_) => "query_failed",
            Self::BuildFailed(_) => "build_failed",
            Self::BroadcastRejected(_) => "broadcast_rejected",
            Self::ConfirmationTimeout { .. } => "confirmation_timeout",
            Self::Reverted { .. } => "reverted",
        }
    }

    /// Hash of the broadcast transaction, if the attempt got that far.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::ConfirmationTimeout { tx_hash, .. } | Self::Reverted { tx_hash } => Some(*tx_hash),
            _ => None,
        }
    }
}

/// A confirmed, successful withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    pub amount: TokenAmount,
    pub symbol: String,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Block explorer page for `tx_hash`.
    pub link: String,
}

impl fmt::Display for WithdrawalReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "✅ Successfully withdrawn {} {}\n🔗 Transaction: {}",
            self.amount, self.symbol, self.link
        )
    }
}

/// Result of one withdrawal attempt.
pub type WithdrawalOutcome = Result<WithdrawalReceipt, WithdrawalError>;

/// Flatten an outcome into the `(success, message)` pair.
pub fn into_message(outcome: &WithdrawalOutcome) -> (bool, String) {
    match outcome {
        Ok(receipt) => (true, receipt.to_string()),
        Err(e) => (false, e.to_string()),
    }
}

/// Explorer URL for a transaction hash.
pub fn explorer_link(explorer_url: &str, tx_hash: &TxHash) -> String {
    format!("{}/tx/{:#x}", explorer_url.trim_end_matches('/'), tx_hash)
}
