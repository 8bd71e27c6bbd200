//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading, local signing)
//! Config (RPC URL, token address)
//!     → client.rs (RPC connection with timeouts, implements chain.rs)
//!     → token.rs (ERC20 calldata encoding/decoding)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod address;
pub mod chain;
pub mod client;
pub mod token;
pub mod types;
pub mod wallet;

pub use chain::ChainClient;
pub use client::BlockchainClient;
pub use types::{BlockchainError, BlockchainResult, ChainId, ConfirmationStatus, ReceiptStatus};
pub use wallet::{SignedTransaction, Wallet};
