//! Trade requests, per-call options and the normalized trade event

use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// A single swap request as submitted by a caller
///
/// `attached_value` models the native currency sent along with the call.
/// It must equal `amount` when the source is native currency and be zero
/// otherwise; the route adapter enforces this before touching any ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub src_asset: Address,
    pub dest_asset: Address,
    pub amount: U256,
    pub attached_value: U256,
}

impl TradeRequest {
    /// Native-currency source: attaches exactly `amount`
    pub fn native(native_sentinel: Address, dest_asset: Address, amount: U256) -> Self {
        Self {
            src_asset: native_sentinel,
            dest_asset,
            amount,
            attached_value: amount,
        }
    }

    /// Token source: attaches nothing
    pub fn token(src_asset: Address, dest_asset: Address, amount: U256) -> Self {
        Self {
            src_asset,
            dest_asset,
            amount,
            attached_value: U256::zero(),
        }
    }

    /// Override the attached native value
    pub fn with_attached_value(mut self, attached_value: U256) -> Self {
        self.attached_value = attached_value;
        self
    }
}

/// Per-call overrides for the router's slippage floor and deadline
///
/// `None` falls back to the route's configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOptions {
    pub amount_out_min: Option<U256>,
    pub deadline: Option<U256>,
}

impl TradeOptions {
    pub fn with_amount_out_min(mut self, amount_out_min: U256) -> Self {
        self.amount_out_min = Some(amount_out_min);
        self
    }

    pub fn with_deadline(mut self, deadline: U256) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Normalized record of a completed trade
///
/// Amounts are the ones reported by the router, not the requested ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeEvent {
    pub src_asset: Address,
    pub src_amount: U256,
    pub dest_asset: Address,
    pub dest_amount: U256,
}
