//! Centralized Ethereum Event Signature Constants
//!
//! Compile-time event signature constants for the logs a trading route
//! produces or observes. These are the keccak256 hashes of the canonical
//! Solidity event definitions, used as `topic0` for log filtering.

use ethers_core::types::H256;

// =============================================================================
// Trading Route Event Signatures
// =============================================================================

/// Trading route Trade event signature
/// `Trade(address indexed _src, uint256 _srcAmount, address indexed _dest, uint256 _destAmount)`
/// keccak256("Trade(address,uint256,address,uint256)")
pub const TRADING_ROUTE_TRADE: H256 = H256([
    0x3c, 0x9f, 0x9e, 0x05, 0xa5, 0x65, 0x07, 0x85, 0x67, 0x7a, 0xdb, 0x0f, 0x72, 0xe5, 0x64, 0x5f,
    0xb1, 0x87, 0x50, 0xd0, 0x80, 0x69, 0xc5, 0xf0, 0xc3, 0xb4, 0xea, 0x72, 0x96, 0x2c, 0x2f, 0xdb,
]);

// =============================================================================
// ERC-20 Event Signatures
// =============================================================================

/// ERC-20 Transfer event signature
/// `Transfer(address indexed from, address indexed to, uint256 value)`
/// keccak256("Transfer(address,address,uint256)")
pub const ERC20_TRANSFER: H256 = H256([
    0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68, 0xfc, 0x37, 0x8d, 0xaa,
    0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16, 0x28, 0xf5, 0x5a, 0x4d, 0xf5, 0x23, 0xb3, 0xef,
]);

/// ERC-20 Approval event signature
/// `Approval(address indexed owner, address indexed spender, uint256 value)`
/// keccak256("Approval(address,address,uint256)")
pub const ERC20_APPROVAL: H256 = H256([
    0x8c, 0x5b, 0xe1, 0xe5, 0xeb, 0xec, 0x7d, 0x5b, 0xd1, 0x4f, 0x71, 0x42, 0x7d, 0x1e, 0x84, 0xf3,
    0xdd, 0x03, 0x14, 0xc0, 0xf7, 0xb2, 0x29, 0x1e, 0x5b, 0x20, 0x0a, 0xc8, 0xc7, 0xc3, 0xb9, 0x25,
]);

/// All signatures a route log subscriber filters on
pub const fn get_all_signatures() -> [H256; 3] {
    [TRADING_ROUTE_TRADE, ERC20_TRANSFER, ERC20_APPROVAL]
}

/// Convert H256 to hex string with 0x prefix
pub fn to_hex_string(hash: H256) -> String {
    format!("0x{:x}", hash)
}
