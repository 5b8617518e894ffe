//! ABI definitions and event decoding for the trading route
//!
//! This module provides:
//! - Canonical ABI definitions for the Uniswap V2 router and ERC-20 tokens
//! - Typed calldata encoders and return-data decoders
//! - Encoding and decoding of the route's `Trade` log

pub mod erc20;
pub mod events;
pub mod trading_route;
pub mod uniswap_v2;

use ethers_core::abi::{Param, ParamType};

// Re-export main components
pub use events::{encode_trade_log, DecodingError, TradeEventDecoder};

/// Unnamed-type helper shared by the function definitions
pub(crate) fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

/// `address[]` parameter type
pub(crate) fn address_array() -> ParamType {
    ParamType::Array(Box::new(ParamType::Address))
}

/// `uint256[]` parameter type
pub(crate) fn uint_array() -> ParamType {
    ParamType::Array(Box::new(ParamType::Uint(256)))
}
