//! Single-shot broadcast of signed transactions.

use alloy::primitives::TxHash;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::SignedTransaction;
use crate::observability::metrics;

/// Submit `signed` to the network once. Rejections are not retried.
///
/// Consumes the transaction; only the returned hash outlives the call.
pub async fn broadcast(chain: &dyn ChainClient, signed: SignedTransaction) -> BlockchainResult<TxHash> {
    metrics::record_broadcast();

    let local_hash = signed.hash;
    let tx_hash = chain.send_raw_transaction(signed.raw).await.map_err(|e| {
        tracing::error!(tx_hash = %local_hash, error = %e, "Broadcast failed");
        e
    })?;

    if tx_hash != local_hash {
        tracing::warn!(
            local = %local_hash,
            remote = %tx_hash,
            "Node reported a different transaction hash"
        );
    }

    tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
    Ok(tx_hash)
}
