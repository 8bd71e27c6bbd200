//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Root configuration for the withdrawal agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// RPC connectivity and chain identity.
    pub chain: ChainConfig,

    /// The ERC20 token being withdrawn.
    pub token: TokenConfig,

    /// Agent identity (spender and recipient).
    pub agent: AgentIdentityConfig,

    /// Fee defaults and safety margins.
    pub fees: FeeConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// Chain ID used for EIP-155 signing (56 for BSC mainnet).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://bsc-dataseed.binance.org".to_string(),
            failover_urls: Vec::new(),
            chain_id: 56,
            rpc_timeout_secs: 10,
        }
    }
}

/// Token contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Token contract address.
    pub address: String,

    /// Ticker used in user-facing messages.
    pub symbol: String,

    /// Fixed decimal precision of the token.
    pub decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            // BSC-USD (USDT on BNB Smart Chain)
            address: "0x55d398326f99059fF775485246999027B3197955".to_string(),
            symbol: "USDT".to_string(),
            decimals: 18,
        }
    }
}

/// Agent identity configuration.
///
/// The signing key itself never lives in the config file; it is read from
/// [`PRIVATE_KEY_ENV_VAR`](crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentIdentityConfig {
    /// Expected spender/recipient address. When set, it must match the
    /// address derived from the private key.
    pub address: Option<String>,
}

/// Fee estimation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas limit used when estimation fails.
    pub default_gas_limit: u64,

    /// Gas price in gwei used when the live price cannot be read.
    pub default_gas_price_gwei: Decimal,

    /// Premium added to the live gas price, in percent.
    pub gas_price_premium_percent: u32,

    /// Margin added to the gas estimate, in percent.
    pub gas_limit_margin_percent: u32,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            default_gas_limit: 100_000,
            default_gas_price_gwei: Decimal::new(5, 0),
            gas_price_premium_percent: 20,
            gas_limit_margin_percent: 20,
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Maximum time to wait for a receipt, in seconds.
    pub timeout_secs: u64,

    /// Delay between receipt lookups, in seconds.
    pub poll_interval_secs: u64,

    /// Block explorer base URL for transaction links.
    pub explorer_url: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            poll_interval_secs: 2,
            explorer_url: "https://bscscan.com".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON instead of the human-readable format.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
