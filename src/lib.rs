//! Custodial USDT withdrawal agent.
//!
//! Pulls ERC20 tokens from wallets that approved this agent as spender,
//! via `transferFrom` signed with the agent key.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod withdrawal;

pub use blockchain::{BlockchainClient, ChainClient, Wallet};
pub use config::schema::AgentConfig;
pub use withdrawal::{WithdrawalError, WithdrawalOutcome, Withdrawer};
