//! Shared utilities for integration testing: an in-memory ERC20 chain.

#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use usdt_withdrawal_agent::blockchain::types::{BlockchainError, BlockchainResult, ReceiptStatus};
use usdt_withdrawal_agent::blockchain::ChainClient;

pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const AGENT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const SOURCE: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// A transaction the fake node accepted.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub hash: TxHash,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub from: Address,
    pub owner: Address,
    pub to: Address,
    pub amount: U256,
    pub polls_until_mined: u32,
    pub success: bool,
}

#[derive(Debug, Default)]
struct State {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, u64>,
    accepted: Vec<Accepted>,
    broadcast_attempts: u32,
    allowance_reads: u32,
    balance_reads: u32,
}

/// In-memory token ledger behind the `ChainClient` interface.
///
/// Every call yields once so concurrent callers interleave.
#[derive(Debug, Default)]
pub struct FakeChain {
    state: Mutex<State>,
    /// Signer of every broadcast transaction.
    pub agent: Address,
    pub live_gas_price: Option<u128>,
    pub gas_estimate: Option<u64>,
    pub reject_broadcast: Option<String>,
    /// Accept the transaction but answer the send with a timeout.
    pub time_out_broadcast: bool,
    pub polls_until_mined: u32,
    pub never_mine: bool,
    pub revert: bool,
}

impl FakeChain {
    pub fn new(agent: Address) -> Self {
        Self {
            agent,
            live_gas_price: Some(1_000_000_000),
            gas_estimate: Some(50_000),
            polls_until_mined: 2,
            ..Default::default()
        }
    }

    pub fn set_balance(&self, owner: Address, amount: U256) {
        self.state.lock().unwrap().balances.insert(owner, amount);
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((owner, spender), amount);
    }

    pub fn balance(&self, owner: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&owner)
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn accepted(&self) -> Vec<Accepted> {
        self.state.lock().unwrap().accepted.clone()
    }

    pub fn broadcast_attempts(&self) -> u32 {
        self.state.lock().unwrap().broadcast_attempts
    }

    pub fn token_reads(&self) -> u32 {
        let state = self.state.lock().unwrap();
        state.allowance_reads + state.balance_reads
    }

    /// Apply a mined `transferFrom` to the ledger.
    fn execute(state: &mut State, tx: &Accepted) -> bool {
        let spender = tx.from;
        let allowance = state
            .allowances
            .get(&(tx.owner, spender))
            .copied()
            .unwrap_or_default();
        let balance = state.balances.get(&tx.owner).copied().unwrap_or_default();
        if allowance < tx.amount || balance < tx.amount {
            return false;
        }

        state
            .allowances
            .insert((tx.owner, spender), allowance - tx.amount);
        state.balances.insert(tx.owner, balance - tx.amount);
        *state.balances.entry(tx.to).or_default() += tx.amount;
        true
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn token_balance(&self, owner: Address) -> BlockchainResult<U256> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.balance_reads += 1;
        Ok(state.balances.get(&owner).copied().unwrap_or_default())
    }

    async fn token_allowance(&self, owner: Address, spender: Address) -> BlockchainResult<U256> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.allowance_reads += 1;
        Ok(state
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        tokio::task::yield_now().await;
        self.live_gas_price
            .ok_or_else(|| BlockchainError::Rpc("gas price unavailable".into()))
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> BlockchainResult<u64> {
        tokio::task::yield_now().await;
        self.gas_estimate
            .ok_or_else(|| BlockchainError::Rpc("execution reverted".into()))
    }

    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        tokio::task::yield_now().await;
        Ok(self
            .state
            .lock()
            .unwrap()
            .nonces
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.broadcast_attempts += 1;

        if let Some(reason) = &self.reject_broadcast {
            return Err(BlockchainError::Rejected(reason.clone()));
        }

        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| BlockchainError::Rejected(format!("malformed transaction: {e}")))?;
        let sender = self.agent;

        let expected_nonce = state.nonces.get(&sender).copied().unwrap_or_default();
        if envelope.nonce() != expected_nonce {
            return Err(BlockchainError::Rejected(format!(
                "nonce mismatch: expected {expected_nonce}, got {}",
                envelope.nonce()
            )));
        }

        let input = envelope.input();
        if input.len() != 100 || input[..4] != [0x23, 0xb8, 0x72, 0xdd] {
            return Err(BlockchainError::Rejected("not a transferFrom".into()));
        }

        let accepted = Accepted {
            hash: *envelope.tx_hash(),
            nonce: envelope.nonce(),
            gas_limit: envelope.gas_limit(),
            gas_price: envelope.gas_price(),
            from: sender,
            owner: Address::from_slice(&input[16..36]),
            to: Address::from_slice(&input[48..68]),
            amount: U256::from_be_slice(&input[68..100]),
            polls_until_mined: self.polls_until_mined,
            success: false,
        };

        state.nonces.insert(sender, expected_nonce + 1);
        state.accepted.push(accepted.clone());
        if self.time_out_broadcast {
            return Err(BlockchainError::Timeout(10));
        }
        Ok(accepted.hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptStatus>> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.accepted.iter().position(|tx| tx.hash == tx_hash) else {
            return Ok(None);
        };

        if self.never_mine {
            return Ok(None);
        }
        if state.accepted[index].polls_until_mined > 0 {
            state.accepted[index].polls_until_mined -= 1;
            return Ok(None);
        }

        let tx = state.accepted[index].clone();
        let success = !self.revert && Self::execute(&mut state, &tx);
        state.accepted[index].success = success;

        Ok(Some(ReceiptStatus {
            tx_hash,
            success,
            block_number: Some(1_000 + index as u64),
        }))
    }
}
