//! Transaction building and signing.
//!
//! # Responsibilities
//! - Encode `transferFrom(source, agent, amount)` against the token contract
//! - Fetch a fresh nonce and derive fee parameters for the exact call
//! - Sign locally with the agent wallet

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::token::transfer_from_calldata;
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::{SignedTransaction, Wallet};
use crate::withdrawal::fees::FeeEstimator;

/// A fully-parameterized, unsigned `transferFrom`.
///
/// Consumed by [`TxBuilder::sign`]; the nonce makes it single-use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Agent address: sender, spender, and recipient.
    pub agent: Address,
    /// Token owner the funds are pulled from.
    pub source: Address,
    pub token: Address,
    pub amount: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl PendingTransaction {
    pub fn calldata(&self) -> Bytes {
        transfer_from_calldata(self.source, self.agent, self.amount)
    }

    /// Legacy (gas price) request for signing.
    pub fn to_request(&self) -> TransactionRequest {
        transfer_from_request(self.agent, self.token, self.source, self.amount)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
    }
}

/// Unparameterized call used for gas estimation.
pub fn transfer_from_request(
    agent: Address,
    token: Address,
    source: Address,
    amount: U256,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(agent)
        .with_to(token)
        .with_input(transfer_from_calldata(source, agent, amount))
}

/// Transaction builder for agent withdrawals.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    wallet: Wallet,
    token: Address,
    fees: FeeEstimator,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(wallet: Wallet, token: Address, fees: FeeEstimator) -> Self {
        Self { wallet, token, fees }
    }

    /// Assemble a pending transaction from explicit parameters.
    pub fn build(
        &self,
        source: Address,
        amount: U256,
        nonce: u64,
        gas_limit: u64,
        gas_price: u128,
    ) -> PendingTransaction {
        PendingTransaction {
            agent: self.wallet.address(),
            source,
            token: self.token,
            amount,
            nonce,
            gas_limit,
            gas_price,
        }
    }

    /// Read the nonce and fee parameters from the chain, then build.
    ///
    /// The nonce is fetched here, immediately before building, and is never
    /// cached between attempts. Only the nonce read can fail; fee lookups
    /// fall back to defaults.
    pub async fn prepare(
        &self,
        chain: &dyn ChainClient,
        source: Address,
        amount: U256,
    ) -> BlockchainResult<PendingTransaction> {
        let agent = self.wallet.address();
        let nonce = chain.transaction_count(agent).await?;

        let call = transfer_from_request(agent, self.token, source, amount);
        let gas_limit = self.fees.gas_limit(chain, call).await;
        let gas_price = self.fees.gas_price(chain).await;

        tracing::debug!(
            nonce,
            gas_limit = gas_limit.value(),
            gas_limit_fallback = gas_limit.is_fallback(),
            gas_price = gas_price.value(),
            gas_price_fallback = gas_price.is_fallback(),
            "Transaction parameters resolved"
        );

        Ok(self.build(source, amount, nonce, gas_limit.value(), gas_price.value()))
    }

    /// Sign a pending transaction with the agent key.
    pub async fn sign(&self, pending: PendingTransaction) -> BlockchainResult<SignedTransaction> {
        self.wallet.sign_transaction(pending.to_request()).await
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::chain::MockChainClient;
    use crate::blockchain::types::BlockchainError;
    use crate::config::schema::FeeConfig;
    use alloy::consensus::{Transaction, TxEnvelope};
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::TxKind;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn builder() -> TxBuilder {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 56).unwrap();
        TxBuilder::new(wallet, Address::repeat_byte(0x55), FeeEstimator::new(&FeeConfig::default()))
    }

    #[tokio::test]
    async fn test_prepare_uses_fresh_nonce_and_exact_call() {
        let builder = builder();
        let agent = builder.address();
        let source = Address::repeat_byte(0x11);
        let amount = U256::from(200_000_000u64);

        let mut chain = MockChainClient::new();
        chain
            .expect_transaction_count()
            .withf(move |a| *a == agent)
            .times(1)
            .returning(|_| Ok(42));
        chain
            .expect_estimate_gas()
            .withf(move |tx| {
                tx.input.input().cloned() == Some(transfer_from_calldata(source, agent, amount))
                    && tx.to == Some(TxKind::Call(Address::repeat_byte(0x55)))
                    && tx.from == Some(agent)
            })
            .returning(|_| Ok(50_000));
        chain.expect_gas_price().returning(|| Ok(1_000_000_000));

        let pending = builder.prepare(&chain, source, amount).await.unwrap();
        assert_eq!(pending.nonce, 42);
        assert_eq!(pending.gas_limit, 60_000);
        assert_eq!(pending.gas_price, 1_200_000_000);
        assert_eq!(pending.agent, agent);
        assert_eq!(pending.source, source);
    }

    #[tokio::test]
    async fn test_prepare_fails_without_nonce() {
        let mut chain = MockChainClient::new();
        chain
            .expect_transaction_count()
            .returning(|_| Err(BlockchainError::Rpc("down".into())));
        chain.expect_estimate_gas().never();

        let result = builder()
            .prepare(&chain, Address::repeat_byte(0x11), U256::from(1u8))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_signed_transaction_encodes_transfer_from() {
        let builder = builder();
        let source = Address::repeat_byte(0x11);
        let pending = builder.build(source, U256::from(5u8), 3, 80_000, 2_000_000_000);
        let calldata = pending.calldata();

        let signed = builder.sign(pending).await.unwrap();
        let envelope = TxEnvelope::decode_2718(&mut signed.raw.as_ref()).unwrap();

        assert_eq!(envelope.nonce(), 3);
        assert_eq!(envelope.gas_limit(), 80_000);
        assert_eq!(envelope.gas_price(), Some(2_000_000_000));
        assert_eq!(envelope.to(), Some(Address::repeat_byte(0x55)));
        assert_eq!(envelope.input(), &calldata);
        assert_eq!(envelope.chain_id(), Some(56));
    }
}
