//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoints and the token address
//! - Validate value ranges (timeouts > 0, decimals within U256 range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::blockchain::address::parse_address;
use crate::config::schema::AgentConfig;
use crate::withdrawal::fees::gwei_to_wei;

/// Largest precision whose scale factor still fits comfortably in U256.
pub const MAX_TOKEN_DECIMALS: u8 = 36;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid URL for {field}: {reason}")]
    InvalidUrl { field: String, reason: String },

    #[error("invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("token.decimals {0} exceeds maximum of {MAX_TOKEN_DECIMALS}")]
    DecimalsOutOfRange(u8),

    #[error("fees.default_gas_price_gwei is not a valid non-negative gwei amount")]
    InvalidGasPrice,

    #[error("confirmation.poll_interval_secs ({interval}) must be shorter than confirmation.timeout_secs ({timeout})")]
    PollIntervalTooLong { interval: u64, timeout: u64 },
}

/// Check an [`AgentConfig`] for semantic errors.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "chain.rpc_url", &config.chain.rpc_url);
    for (i, url) in config.chain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("chain.failover_urls[{i}]"), url);
    }
    check_url(
        &mut errors,
        "confirmation.explorer_url",
        &config.confirmation.explorer_url,
    );

    if parse_address(&config.token.address).is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "token.address",
            value: config.token.address.clone(),
        });
    }
    if let Some(agent) = &config.agent.address {
        if parse_address(agent).is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "agent.address",
                value: agent.clone(),
            });
        }
    }

    if config.token.decimals > MAX_TOKEN_DECIMALS {
        errors.push(ValidationError::DecimalsOutOfRange(config.token.decimals));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "chain.rpc_timeout_secs" });
    }
    if config.fees.default_gas_limit == 0 {
        errors.push(ValidationError::Zero { field: "fees.default_gas_limit" });
    }
    if gwei_to_wei(config.fees.default_gas_price_gwei).is_none() {
        errors.push(ValidationError::InvalidGasPrice);
    }

    let confirmation = &config.confirmation;
    if confirmation.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "confirmation.timeout_secs" });
    }
    if confirmation.poll_interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "confirmation.poll_interval_secs" });
    } else if confirmation.poll_interval_secs >= confirmation.timeout_secs {
        errors.push(ValidationError::PollIntervalTooLong {
            interval: confirmation.poll_interval_secs,
            timeout: confirmation.timeout_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::InvalidUrl {
            field: field.to_string(),
            reason: e.to_string(),
        });
    }
}
