//! ERC20 interface bindings and call encoding.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Subset of ERC20 used by the agent.
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}

/// Calldata for `balanceOf(account)`.
pub fn balance_of_calldata(account: Address) -> Bytes {
    IERC20::balanceOfCall { account }.abi_encode().into()
}

/// Calldata for `allowance(owner, spender)`.
pub fn allowance_calldata(owner: Address, spender: Address) -> Bytes {
    IERC20::allowanceCall { owner, spender }.abi_encode().into()
}

/// Calldata for `transferFrom(from, to, amount)`.
pub fn transfer_from_calldata(from: Address, to: Address, amount: U256) -> Bytes {
    IERC20::transferFromCall { from, to, amount }.abi_encode().into()
}

/// Decode the single `uint256` returned by `balanceOf` / `allowance`.
pub fn decode_uint256(data: &[u8]) -> BlockchainResult<U256> {
    IERC20::balanceOfCall::abi_decode_returns(data)
        .map_err(|e| BlockchainError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_transfer_from_selector_and_layout() {
        let from = address!("0x1111111111111111111111111111111111111111");
        let to = address!("0x2222222222222222222222222222222222222222");
        let data = transfer_from_calldata(from, to, U256::from(200_000_000u64));

        // transferFrom(address,address,uint256)
        assert_eq!(&data[..4], &[0x23, 0xb8, 0x72, 0xdd]);
        assert_eq!(data.len(), 4 + 32 * 3);
        assert_eq!(&data[16..36], from.as_slice());
        assert_eq!(&data[48..68], to.as_slice());
        assert_eq!(U256::from_be_slice(&data[68..100]), U256::from(200_000_000u64));
    }

    #[test]
    fn test_read_call_selectors() {
        let owner = Address::ZERO;
        assert_eq!(&balance_of_calldata(owner)[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(&allowance_calldata(owner, owner)[..4], &[0xdd, 0x62, 0xed, 0x3e]);
    }

    #[test]
    fn test_decode_uint256() {
        let word = U256::from(1234u64).to_be_bytes::<32>();
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(1234u64));
        assert!(matches!(decode_uint256(&[0u8; 3]), Err(BlockchainError::Decode(_))));
    }
}
