//! Withdrawal orchestration.
//!
//! # Flow
//! ```text
//! withdraw(source, amount)
//!     → precondition.rs (address, amount, allowance, balance)
//!     → [nonce lock] transaction.rs (nonce, gas, build, sign)
//!     → [nonce lock] broadcast.rs (single send)
//!     → confirmation.rs (receipt or timeout)
//!     → WithdrawalOutcome
//! ```
//!
//! # Design Decisions
//! - This is the only place lower-layer errors become `WithdrawalError`
//! - Nonce read through broadcast is serialized per agent; confirmation
//!   polling runs outside the lock
//! - A broadcast timeout is not a rejection: the locally computed hash is
//!   polled like any other broadcast

use alloy::primitives::Address;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::blockchain::address::parse_address;
use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::AgentConfig;
use crate::observability::metrics;
use crate::withdrawal::amount::TokenAmount;
use crate::withdrawal::broadcast::broadcast;
use crate::withdrawal::confirmation::ConfirmationPoller;
use crate::withdrawal::fees::FeeEstimator;
use crate::withdrawal::outcome::{
    explorer_link, into_message, WithdrawalError, WithdrawalOutcome, WithdrawalReceipt,
};
use crate::withdrawal::precondition::PreconditionChecker;
use crate::withdrawal::transaction::TxBuilder;

/// Custodial withdrawal agent: pulls approved tokens into its own address.
pub struct Withdrawer {
    chain: Arc<dyn ChainClient>,
    checker: PreconditionChecker,
    builder: TxBuilder,
    poller: ConfirmationPoller,
    symbol: String,
    decimals: u8,
    explorer_url: String,
    /// Held from nonce read through broadcast.
    nonce_lock: Mutex<()>,
}

impl Withdrawer {
    /// Wire the withdrawal pipeline from validated configuration.
    ///
    /// Fails if the token address is invalid or `agent.address` is set and
    /// does not match the wallet.
    pub fn new(chain: Arc<dyn ChainClient>, wallet: Wallet, config: &AgentConfig) -> BlockchainResult<Self> {
        let token = parse_address(&config.token.address)?;
        let agent = wallet.address();

        if let Some(expected) = &config.agent.address {
            let expected = parse_address(expected)?;
            if expected != agent {
                return Err(BlockchainError::Wallet(format!(
                    "Private key controls {agent}, but agent.address is {expected}"
                )));
            }
        }

        Ok(Self {
            chain,
            checker: PreconditionChecker::new(agent, config.token.decimals, &config.token.symbol),
            builder: TxBuilder::new(wallet, token, FeeEstimator::new(&config.fees)),
            poller: ConfirmationPoller::from_config(&config.confirmation),
            symbol: config.token.symbol.clone(),
            decimals: config.token.decimals,
            explorer_url: config.confirmation.explorer_url.clone(),
            nonce_lock: Mutex::new(()),
        })
    }

    /// Agent address (spender and recipient).
    pub fn agent_address(&self) -> Address {
        self.builder.address()
    }

    /// Run one withdrawal and flatten the result to `(success, message)`.
    pub async fn withdraw(&self, source: &str, amount: Decimal) -> (bool, String) {
        into_message(&self.execute(source, amount).await)
    }

    /// Run one withdrawal attempt to completion or timeout.
    pub async fn execute(&self, source: &str, amount: Decimal) -> WithdrawalOutcome {
        let started = Instant::now();
        let outcome = self.run(source, amount).await;

        match &outcome {
            Ok(receipt) => {
                tracing::info!(
                    source,
                    amount = %receipt.amount,
                    tx_hash = %receipt.tx_hash,
                    "Withdrawal completed"
                );
                metrics::record_withdrawal("success", started.elapsed());
            }
            Err(e) => {
                tracing::warn!(
                    source,
                    %amount,
                    kind = e.kind(),
                    tx_hash = ?e.tx_hash(),
                    error = %e,
                    "Withdrawal failed"
                );
                metrics::record_withdrawal(e.kind(), started.elapsed());
            }
        }

        outcome
    }

    async fn run(&self, source: &str, amount: Decimal) -> WithdrawalOutcome {
        let chain = self.chain.as_ref();
        let request = self.checker.check(chain, source, amount).await?;

        let tx_hash = {
            let _guard = self.nonce_lock.lock().await;

            let pending = self
                .builder
                .prepare(chain, request.source, request.amount.base_units())
                .await
                .map_err(WithdrawalError::BuildFailed)?;
            let nonce = pending.nonce;
            let signed = self
                .builder
                .sign(pending)
                .await
                .map_err(WithdrawalError::BuildFailed)?;

            tracing::info!(
                source = %request.source,
                amount = %request.amount,
                nonce,
                tx_hash = %signed.hash,
                "Broadcasting transferFrom"
            );
            let local_hash = signed.hash;
            match broadcast(chain, signed).await {
                Ok(tx_hash) => tx_hash,
                // Outcome unknown: the node may already hold the transaction.
                Err(BlockchainError::Timeout(secs)) => {
                    tracing::warn!(
                        tx_hash = %local_hash,
                        timeout_secs = secs,
                        "Broadcast timed out, polling for the signed transaction"
                    );
                    local_hash
                }
                Err(e) => return Err(WithdrawalError::BroadcastRejected(e)),
            }
        };

        let link = explorer_link(&self.explorer_url, &tx_hash);
        match self.poller.await_receipt(chain, tx_hash).await {
            ConfirmationStatus::Confirmed(receipt) if receipt.success => Ok(WithdrawalReceipt {
                amount: request.amount,
                symbol: self.symbol.clone(),
                tx_hash,
                block_number: receipt.block_number,
                link,
            }),
            ConfirmationStatus::Confirmed(_) => Err(WithdrawalError::Reverted { tx_hash }),
            ConfirmationStatus::TimedOut => Err(WithdrawalError::ConfirmationTimeout {
                tx_hash,
                link,
                timeout_secs: self.poller.timeout().as_secs(),
            }),
        }
    }

    /// Live token balance of `address`.
    pub async fn token_balance(&self, address: &str) -> Result<TokenAmount, WithdrawalError> {
        let owner = parse_address(address)
            .map_err(|_| WithdrawalError::InvalidAddress(address.to_string()))?;
        let balance = self
            .chain
            .token_balance(owner)
            .await
            .map_err(WithdrawalError::BalanceQuery)?;
        Ok(TokenAmount::from_base_units(balance, self.decimals))
    }

    /// Live allowance granted by `owner` to this agent.
    pub async fn allowance(&self, owner: &str) -> Result<TokenAmount, WithdrawalError> {
        let owner_address = parse_address(owner)
            .map_err(|_| WithdrawalError::InvalidAddress(owner.to_string()))?;
        let allowance = self
            .chain
            .token_allowance(owner_address, self.agent_address())
            .await
            .map_err(WithdrawalError::AllowanceQuery)?;
        Ok(TokenAmount::from_base_units(allowance, self.decimals))
    }

    /// Token ticker used in messages.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl std::fmt::Debug for Withdrawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Withdrawer")
            .field("agent", &self.agent_address())
            .field("symbol", &self.symbol)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}
