//! # Torq Route Configuration
//!
//! Centralized configuration and constants for trading route adapters.
//!
//! ## Features
//!
//! - **Blockchain Constants**: Uniswap V2 router, native-currency sentinel, WETH and
//!   well-known token addresses on Ethereum mainnet
//! - **Route Configuration**: Immutable [`RouteConfig`] with the router endpoint,
//!   slippage floor and deadline horizon
//! - **Settings Loading**: TOML files with environment-specific overlays and
//!   `ROUTE_` environment variable overrides
//!
//! ## Usage
//!
//! ```rust
//! use route_config::{blockchain, RouteConfig};
//!
//! let config = RouteConfig::default();
//! assert_eq!(config.router, blockchain::routers::UNISWAP_V2_ROUTER);
//! assert_eq!(config.wrapped_native, blockchain::tokens::WETH);
//! ```

pub mod blockchain;
pub mod route_config;

// Re-export commonly used types
pub use route_config::{
    load_settings, parse_amount, GlobalConfig, NetworkConfig, RouteConfig, RouteSection,
    RouteSettings,
};
