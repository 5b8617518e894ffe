//! # Route Adapter - Uniswap V2 Trading Route
//!
//! ## Purpose
//!
//! Trading-route adapter that forwards token swaps to an external Uniswap V2
//! router. It accepts a source asset, a destination asset and an amount,
//! validates the request, lets the router price and execute the swap, and
//! emits a normalized [`TradeEvent`] describing what happened.
//!
//! Pricing, pool accounting and path routing stay inside the router. The
//! adapter only decides which router entry point to call and moves funds in
//! and out of its own account around that call.
//!
//! ## Integration Points
//!
//! - **Router and tokens**: reached only through the [`SwapProvider`] traits
//! - **Configuration**: [`RouteConfig`] from `route-config` (mainnet defaults,
//!   TOML files, `ROUTE_` environment overrides)
//! - **ABIs**: calldata and `Trade` log encoding from `dex`
//! - **Observers**: [`UniswapV2TradingRoute::subscribe`] broadcasts every
//!   emitted [`TradeEvent`]
//!
//! ## Providers
//!
//! | Provider | Backing | Snapshots | Use |
//! |----------|---------|-----------|-----|
//! | [`SimulatedChain`] | In-memory ledger, fixed pair rates | ✅ | Tests, dry runs |
//! | [`UniswapV2Provider`] | ethers middleware (live node) | ❌ per-tx atomicity | Production |
//!
//! ## Examples
//!
//! ```rust
//! use route_adapter::{RouteConfig, SimulatedChain, UniswapV2TradingRoute};
//! use route_config::blockchain::tokens::{DAI, ETHER, WETH};
//! use std::sync::Arc;
//! use types::{Address, TradeRequest, U256};
//!
//! # tokio_test::block_on(async {
//! let chain = Arc::new(SimulatedChain::mainnet());
//! chain.set_rate(WETH, DAI, U256::from(2_000u64), U256::one()).unwrap();
//!
//! let caller = Address::repeat_byte(0xca);
//! chain.set_native_balance(caller, U256::exp10(18));
//!
//! let route = UniswapV2TradingRoute::new(
//!     RouteConfig::mainnet(),
//!     Address::repeat_byte(0x70),
//!     Arc::clone(&chain),
//! );
//!
//! let quoted = route.quote(ETHER, DAI, U256::exp10(18)).await.unwrap();
//! let received = route
//!     .trade(caller, TradeRequest::native(ETHER, DAI, U256::exp10(18)))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(quoted, received);
//! assert_eq!(chain.token_balance(DAI, caller), received);
//! # });
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod provider;
pub mod route;

pub use error::{ProviderError, ProviderResult, Result, RouteError};
pub use provider::{
    Operation, RouterProtocol, SimulatedChain, SnapshotId, SwapCall, SwapProvider, TokenProtocol,
    UniswapV2Provider,
};
pub use route::UniswapV2TradingRoute;

// Re-export configuration and domain types for convenience
pub use route_config::RouteConfig;
pub use types::{AssetKind, SwapPath, TradeEvent, TradeOptions, TradeRequest};
