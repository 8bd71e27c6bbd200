//! Address validation and checksum normalization.

use alloy::primitives::Address;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Parse a user-supplied address.
///
/// Accepts 40 hex digits with or without a `0x` prefix. Single-case input is
/// taken as-is; mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> BlockchainResult<Address> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BlockchainError::InvalidAddress(input.to_string()));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    let prefixed = format!("0x{hex}");

    if has_lower && has_upper {
        Address::parse_checksummed(&prefixed, None)
            .map_err(|_| BlockchainError::InvalidAddress(input.to_string()))
    } else {
        prefixed
            .parse()
            .map_err(|_| BlockchainError::InvalidAddress(input.to_string()))
    }
}

/// EIP-55 checksummed rendering.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}
