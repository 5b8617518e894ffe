//! Shared DEX ABI library
//!
//! Canonical ABI definitions for everything a trading route talks to: the
//! Uniswap V2 router, ERC-20 tokens, and the route's own `Trade` event.
//!
//! # Architecture
//!
//! ```text
//! dex_utils/
//! ├── abi/
//! │   ├── uniswap_v2.rs     # Router02 quote and swap functions
//! │   ├── erc20.rs          # Token balance, allowance and transfer functions
//! │   ├── trading_route.rs  # Trade event definition
//! │   └── events.rs         # Trade log encoding and decoding
//! └── event_signatures.rs   # Precomputed topic hashes
//! ```
//!
//! # Design Principles
//! - Single canonical source for ABIs
//! - Typed encode/decode helpers so callers never touch raw tokens
//! - Semantic validation on decode

pub mod abi;
pub mod event_signatures;

// Re-export commonly used types
pub use abi::{
    encode_trade_log,
    events::{DecodingError, TradeEventDecoder},
    erc20, trading_route, uniswap_v2,
};

// Re-export centralized event signature constants
pub use event_signatures::{
    get_all_signatures, to_hex_string, ERC20_APPROVAL, ERC20_TRANSFER, TRADING_ROUTE_TRADE,
};
