//! Confirmation monitoring.
//!
//! `Pending → {Confirmed, TimedOut}`. A missing receipt is the normal pending
//! state; a timeout means "unknown", not failure.

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::ConfirmationStatus;
use crate::config::schema::ConfirmationConfig;

/// Floor for the poll interval; `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls for a receipt at a fixed interval until found or timed out.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPoller {
    timeout: Duration,
    poll_interval: Duration,
}

impl ConfirmationPoller {
    /// Intervals below 100ms are raised to 100ms.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn from_config(config: &ConfirmationConfig) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.poll_interval_secs),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for a transaction's receipt.
    ///
    /// Lookup errors are logged and polling continues; the transaction is
    /// already on the network, so only the deadline ends observation.
    pub async fn await_receipt(&self, chain: &dyn ChainClient, tx_hash: TxHash) -> ConfirmationStatus {
        let result = timeout(self.timeout, async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match chain.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, will retry");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    success = receipt.success,
                    block_number = ?receipt.block_number,
                    "Transaction confirmed"
                );
                ConfirmationStatus::Confirmed(receipt)
            }
            Err(_) => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    timeout_secs = self.timeout.as_secs(),
                    "Transaction confirmation timeout"
                );
                ConfirmationStatus::TimedOut
            }
        }
    }
}

impl Default for ConfirmationPoller {
    fn default() -> Self {
        Self::from_config(&ConfirmationConfig::default())
    }
}
