//! Asset classification and router path resolution

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

/// An asset address classified against the native-currency sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// The chain's native currency (ETH on mainnet)
    Native,
    /// An ERC-20 token contract
    Token(Address),
}

impl AssetKind {
    /// Classify `asset`: the sentinel is native, anything else is a token
    pub fn classify(asset: Address, native_sentinel: Address) -> Self {
        if asset == native_sentinel {
            AssetKind::Native
        } else {
            AssetKind::Token(asset)
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetKind::Native)
    }

    /// Address the router understands for this asset.
    ///
    /// The router only speaks ERC-20, so native currency maps onto the
    /// wrapped-native token.
    pub fn router_address(&self, wrapped_native: Address) -> Address {
        match self {
            AssetKind::Native => wrapped_native,
            AssetKind::Token(address) => *address,
        }
    }
}

/// Token path handed to the router's quote and swap entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPath {
    hops: Vec<Address>,
}

impl SwapPath {
    /// Direct two-hop path between `src` and `dest`, substituting the
    /// wrapped-native token wherever native currency appears
    pub fn resolve(src: AssetKind, dest: AssetKind, wrapped_native: Address) -> Self {
        Self {
            hops: vec![
                src.router_address(wrapped_native),
                dest.router_address(wrapped_native),
            ],
        }
    }

    pub fn hops(&self) -> &[Address] {
        &self.hops
    }

    pub fn into_hops(self) -> Vec<Address> {
        self.hops
    }
}
