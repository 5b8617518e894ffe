//! Swap provider capability
//!
//! The route never talks to token contracts or the router directly. Every
//! external effect goes through the traits in this module:
//!
//! - [`TokenProtocol`]: balances, allowances, approve and transfers
//! - [`RouterProtocol`]: `getAmountsOut` and the three exact-input swaps
//! - [`SwapProvider`]: both of the above plus ledger snapshots
//!
//! Two implementations ship with the crate. [`SimulatedChain`] is a
//! deterministic in-memory ledger for tests and dry runs;
//! [`UniswapV2Provider`] delegates to a live node through an ethers
//! middleware.

pub mod simulated;
pub mod uniswap_v2;

pub use simulated::SimulatedChain;
pub use uniswap_v2::UniswapV2Provider;

use crate::error::ProviderResult;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::Mutex;

/// Identifier returned by [`SwapProvider::snapshot`]
pub type SnapshotId = u64;

/// Provider operations, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Quote,
    Swap,
    TransferFrom,
    Approve,
    NativeTransfer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Quote => "quote",
            Operation::Swap => "swap",
            Operation::TransferFrom => "transferFrom",
            Operation::Approve => "approve",
            Operation::NativeTransfer => "native transfer",
        };
        f.write_str(name)
    }
}

/// Arguments of a router exact-input swap
///
/// `sender` is the account submitting the swap. For
/// `swapExactETHForTokens` the input travels as call value and `amount_in`
/// is that value; for the token variants the router pulls `amount_in` of
/// `path[0]` from `sender` against its allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCall {
    pub sender: Address,
    pub amount_in: U256,
    pub amount_out_min: U256,
    pub path: Vec<Address>,
    pub to: Address,
    pub deadline: U256,
}

/// Token-layer operations (ERC-20 plus native value transfers)
#[async_trait]
pub trait TokenProtocol: Send + Sync {
    async fn balance_of(&self, token: Address, holder: Address) -> ProviderResult<U256>;

    async fn native_balance_of(&self, holder: Address) -> ProviderResult<U256>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address)
        -> ProviderResult<U256>;

    /// `owner` approves `spender` for exactly `amount` (overwrites)
    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> ProviderResult<()>;

    /// `spender` moves `amount` of `token` from `from` to `to`
    async fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ProviderResult<()>;

    /// Move native currency between two accounts
    async fn transfer_native(&self, from: Address, to: Address, amount: U256)
        -> ProviderResult<()>;
}

/// Router-layer operations, Uniswap V2 Router02 semantics
///
/// Every call returns one amount per path hop: the input first, the final
/// output last.
#[async_trait]
pub trait RouterProtocol: Send + Sync {
    fn router_address(&self) -> Address;

    async fn get_amounts_out(&self, amount_in: U256, path: &[Address])
        -> ProviderResult<Vec<U256>>;

    async fn swap_exact_eth_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>>;

    async fn swap_exact_tokens_for_eth(&self, call: SwapCall) -> ProviderResult<Vec<U256>>;

    async fn swap_exact_tokens_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>>;
}

/// Everything a trading route needs from the outside world
#[async_trait]
pub trait SwapProvider: TokenProtocol + RouterProtocol {
    /// Serializes trades against this provider
    ///
    /// Snapshots cover the whole ledger, so every route sharing the provider
    /// must hold this lock from `snapshot` until `release` or `revert_to`.
    fn trade_lock(&self) -> &Mutex<()>;

    /// Capture ledger state; `None` when the provider cannot snapshot
    async fn snapshot(&self) -> Option<SnapshotId> {
        None
    }

    /// Restore a snapshot taken by [`SwapProvider::snapshot`]
    async fn revert_to(&self, _id: SnapshotId) -> ProviderResult<()> {
        Ok(())
    }

    /// Forget a snapshot once the operation it guarded has succeeded
    async fn release(&self, _id: SnapshotId) -> ProviderResult<()> {
        Ok(())
    }
}
