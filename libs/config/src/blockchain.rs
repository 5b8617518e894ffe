//! Ethereum mainnet constants
//!
//! Addresses are stored as raw bytes so they can be used in `const` context.

/// DEX router contracts
pub mod routers {
    use ethers_core::types::{Address, H160};

    /// Uniswap V2 Router02
    pub const UNISWAP_V2_ROUTER: Address = H160([
        0x7a, 0x25, 0x0d, 0x56, 0x30, 0xb4, 0xcf, 0x53, 0x97, 0x39, 0xdf, 0x2c, 0x5d, 0xac, 0xb4,
        0xc6, 0x59, 0xf2, 0x48, 0x8d,
    ]);
}

/// Token addresses
pub mod tokens {
    use ethers_core::types::{Address, H160};

    /// Sentinel address meaning "native ether" rather than a token contract
    pub const ETHER: Address = H160([0xee; 20]);

    /// Wrapped Ether
    pub const WETH: Address = H160([
        0xc0, 0x2a, 0xaa, 0x39, 0xb2, 0x23, 0xfe, 0x8d, 0x0a, 0x0e, 0x5c, 0x4f, 0x27, 0xea, 0xd9,
        0x08, 0x3c, 0x75, 0x6c, 0xc2,
    ]);

    pub const DAI: Address = H160([
        0x6b, 0x17, 0x54, 0x74, 0xe8, 0x90, 0x94, 0xc4, 0x4d, 0xa9, 0x8b, 0x95, 0x4e, 0xed, 0xea,
        0xc4, 0x95, 0x27, 0x1d, 0x0f,
    ]);

    pub const MKR: Address = H160([
        0x9f, 0x8f, 0x72, 0xaa, 0x93, 0x04, 0xc8, 0xb5, 0x93, 0xd5, 0x55, 0xf1, 0x2e, 0xf6, 0x58,
        0x9c, 0xc3, 0xa5, 0x79, 0xa2,
    ]);
}

/// Router call parameters
pub mod swap {
    use ethers_core::types::U256;

    /// Smallest acceptable output: any nonzero amount
    pub const DEFAULT_AMOUNT_OUT_MIN: U256 = U256([1, 0, 0, 0]);

    /// Deadline that never expires
    pub const DEFAULT_DEADLINE: U256 = U256::MAX;
}
