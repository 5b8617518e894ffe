//! # Torq Trading Route Types
//!
//! Shared value types for routing swaps through an external AMM router.
//!
//! ## Design Philosophy
//!
//! - **Addresses as assets**: Every asset is a 20-byte address; one reserved
//!   sentinel address stands for the chain's native currency
//! - **Exact amounts**: All amounts are `U256` in the token's smallest unit,
//!   never floating point
//! - **Immutable requests**: A [`TradeRequest`] is a complete, self-describing
//!   unit of work with no hidden state
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{AssetKind, SwapPath, TradeRequest};
//! use ethers_core::types::{Address, U256};
//!
//! let sentinel: Address = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".parse().unwrap();
//! let weth: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
//! let dai: Address = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse().unwrap();
//!
//! // 1 ETH -> DAI, attaching exactly the declared amount
//! let request = TradeRequest::native(sentinel, dai, U256::exp10(18));
//! assert_eq!(request.attached_value, request.amount);
//!
//! let path = SwapPath::resolve(
//!     AssetKind::classify(request.src_asset, sentinel),
//!     AssetKind::classify(request.dest_asset, sentinel),
//!     weth,
//! );
//! assert_eq!(path.hops(), &[weth, dai]);
//! ```

pub mod asset;
pub mod trade;

pub use asset::{AssetKind, SwapPath};
pub use trade::{TradeEvent, TradeOptions, TradeRequest};

/// Re-exported primitives so downstream crates agree on one definition
pub use ethers_core::types::{Address, U256};
