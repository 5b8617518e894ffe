//! Error types for the trading route module

use crate::provider::Operation;
use ethers::types::{Address, U256};
use thiserror::Error;

/// Result type alias for route operations
pub type Result<T> = std::result::Result<T, RouteError>;

/// Result type alias for swap provider calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Main error type for route operations
///
/// Caller-input errors are detected by the route itself before any external
/// call. Everything raised by the token or router layer arrives unchanged in
/// [`RouteError::Provider`].
#[derive(Debug, Error)]
pub enum RouteError {
    /// Source and destination are the same asset
    #[error("destination token can not be source token")]
    DestinationEqualsSource {
        /// The asset named on both sides
        asset: Address,
    },

    /// Attached native value disagrees with the declared amount
    #[error("source amount mismatch")]
    AmountMismatch {
        /// Amount declared in the request
        declared: U256,
        /// Native value attached to the request
        attached: U256,
    },

    /// Router answered with something other than one amount per hop
    #[error("Malformed router response: {0}")]
    MalformedRouterResponse(String),

    /// Token or router layer failure, surfaced verbatim
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RouteError {
    /// Check if this error was raised locally from the request alone
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            RouteError::DestinationEqualsSource { .. } | RouteError::AmountMismatch { .. }
        )
    }

    /// The underlying provider error, if the failure was delegated
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            RouteError::Provider(error) => Some(error),
            _ => None,
        }
    }
}

/// Errors raised by the token and router layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Token balance too small for a transfer
    #[error("ERC20: transfer amount exceeds balance (token {token:?}, holder {holder:?}, balance {available}, required {required})")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        available: U256,
        required: U256,
    },

    /// Spender not approved for enough of the owner's tokens
    #[error("ERC20: transfer amount exceeds allowance (token {token:?}, owner {owner:?}, spender {spender:?}, allowance {available}, required {required})")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        available: U256,
        required: U256,
    },

    /// Native balance too small for a value transfer
    #[error("insufficient native balance for {holder:?}: balance {available}, required {required}")]
    InsufficientNativeBalance {
        holder: Address,
        available: U256,
        required: U256,
    },

    /// Path too short or not anchored on the wrapped-native token where required
    #[error("UniswapV2Router: INVALID_PATH")]
    InvalidPath,

    /// Zero input amount
    #[error("UniswapV2Library: INSUFFICIENT_INPUT_AMOUNT")]
    InsufficientInputAmount,

    /// No pool between two consecutive hops
    #[error("UniswapV2Library: no liquidity between {from:?} and {to:?}")]
    NoLiquidityPath { from: Address, to: Address },

    /// Output below the caller's floor
    #[error("UniswapV2Router: INSUFFICIENT_OUTPUT_AMOUNT (output {amount_out}, minimum {amount_out_min})")]
    InsufficientOutputAmount { amount_out: U256, amount_out_min: U256 },

    /// Deadline already passed
    #[error("UniswapV2Router: EXPIRED (deadline {deadline}, block timestamp {timestamp})")]
    Expired { deadline: U256, timestamp: U256 },

    /// Provider has no authority to act for this account
    #[error("Provider cannot act on behalf of {account:?}")]
    Unauthorized { account: Address },

    /// Transaction or call reverted on chain
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Node unreachable or RPC failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Calldata or return data could not be encoded/decoded
    #[error("ABI error: {0}")]
    Abi(String),

    /// Failure injected into the simulated chain
    #[error("Injected failure in {operation}: {message}")]
    Injected { operation: Operation, message: String },

    /// Snapshot id unknown or already reverted
    #[error("Unknown snapshot {0}")]
    UnknownSnapshot(u64),

    /// Exchange rate with a zero denominator
    #[error("Invalid rate for pair {from:?} -> {to:?}: zero denominator")]
    InvalidRate { from: Address, to: Address },

    /// Arithmetic overflow in ledger accounting
    #[error("Ledger overflow: {0}")]
    Overflow(String),
}

impl From<dex::DecodingError> for ProviderError {
    fn from(error: dex::DecodingError) -> Self {
        ProviderError::Abi(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_keep_contract_messages() {
        let same = RouteError::DestinationEqualsSource {
            asset: Address::repeat_byte(0x01),
        };
        assert_eq!(same.to_string(), "destination token can not be source token");
        assert!(same.is_caller_error());

        let mismatch = RouteError::AmountMismatch {
            declared: U256::from(2u64),
            attached: U256::one(),
        };
        assert_eq!(mismatch.to_string(), "source amount mismatch");
        assert!(mismatch.is_caller_error());
        assert!(mismatch.provider_error().is_none());
    }

    #[test]
    fn test_provider_errors_pass_through_verbatim() {
        let inner = ProviderError::InsufficientInputAmount;
        let error = RouteError::from(inner.clone());

        assert!(!error.is_caller_error());
        assert_eq!(error.to_string(), inner.to_string());
        assert_eq!(error.provider_error(), Some(&inner));
    }

    #[test]
    fn test_decoding_errors_become_abi_errors() {
        let error = ProviderError::from(dex::DecodingError::MissingField("amounts".to_string()));
        assert!(matches!(error, ProviderError::Abi(ref msg) if msg.contains("amounts")));
    }
}
