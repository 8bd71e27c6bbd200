//! The narrow chain capability set the withdrawal core depends on.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ReceiptStatus};

/// Read/broadcast access to one chain and one token contract.
///
/// Implemented over JSON-RPC by [`BlockchainClient`](crate::blockchain::BlockchainClient).
/// Signing is not part of this trait; it stays local to the [`Wallet`](crate::blockchain::Wallet).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Token balance of `owner`, in base units.
    async fn token_balance(&self, owner: Address) -> BlockchainResult<U256>;

    /// Token allowance granted by `owner` to `spender`, in base units.
    async fn token_allowance(&self, owner: Address, spender: Address) -> BlockchainResult<U256>;

    /// Current network gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Gas estimate for the exact call described by `tx`.
    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64>;

    /// Pending transaction count for `address`.
    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Submit EIP-2718 encoded signed bytes. Called at most once per transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;

    /// `Ok(None)` while the transaction is not yet mined.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptStatus>>;
}
