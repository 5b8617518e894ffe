//! ERC-20 token ABIs
//!
//! The subset of the token standard a trading route needs: balance and
//! allowance reads, approve and transferFrom.

use super::events::DecodingError;
use super::param;
use ethers_core::abi::{Event, EventParam, Function, ParamType, StateMutability, Token};
use ethers_core::types::{Address, U256};
use once_cell::sync::Lazy;

/// function balanceOf(address owner) view returns (uint256)
pub static BALANCE_OF: Lazy<Function> = Lazy::new(|| {
    function(
        "balanceOf",
        vec![param("owner", ParamType::Address)],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    )
});

/// function allowance(address owner, address spender) view returns (uint256)
pub static ALLOWANCE: Lazy<Function> = Lazy::new(|| {
    function(
        "allowance",
        vec![
            param("owner", ParamType::Address),
            param("spender", ParamType::Address),
        ],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    )
});

/// function approve(address spender, uint256 value) returns (bool)
pub static APPROVE: Lazy<Function> = Lazy::new(|| {
    function(
        "approve",
        vec![
            param("spender", ParamType::Address),
            param("value", ParamType::Uint(256)),
        ],
        vec![param("", ParamType::Bool)],
        StateMutability::NonPayable,
    )
});

/// function transferFrom(address from, address to, uint256 value) returns (bool)
pub static TRANSFER_FROM: Lazy<Function> = Lazy::new(|| {
    function(
        "transferFrom",
        vec![
            param("from", ParamType::Address),
            param("to", ParamType::Address),
            param("value", ParamType::Uint(256)),
        ],
        vec![param("", ParamType::Bool)],
        StateMutability::NonPayable,
    )
});

#[allow(deprecated)]
fn function(
    name: &str,
    inputs: Vec<ethers_core::abi::Param>,
    outputs: Vec<ethers_core::abi::Param>,
    state_mutability: StateMutability,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability,
    }
}

/// ERC-20 Transfer event ABI definition
/// event Transfer(address indexed from, address indexed to, uint256 value)
pub fn transfer_event() -> Event {
    Event {
        name: "Transfer".to_string(),
        inputs: vec![
            EventParam {
                name: "from".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "to".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "value".to_string(),
                kind: ParamType::Uint(256),
                indexed: false,
            },
        ],
        anonymous: false,
    }
}

/// ERC-20 Approval event ABI definition
/// event Approval(address indexed owner, address indexed spender, uint256 value)
pub fn approval_event() -> Event {
    Event {
        name: "Approval".to_string(),
        inputs: vec![
            EventParam {
                name: "owner".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "spender".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "value".to_string(),
                kind: ParamType::Uint(256),
                indexed: false,
            },
        ],
        anonymous: false,
    }
}

fn encode(function: &Function, tokens: &[Token]) -> Result<Vec<u8>, DecodingError> {
    function
        .encode_input(tokens)
        .map_err(|e| DecodingError::AbiParsingError(format!("{}: {}", function.name, e)))
}

pub fn encode_balance_of(owner: Address) -> Result<Vec<u8>, DecodingError> {
    encode(&BALANCE_OF, &[Token::Address(owner)])
}

pub fn encode_allowance(owner: Address, spender: Address) -> Result<Vec<u8>, DecodingError> {
    encode(&ALLOWANCE, &[Token::Address(owner), Token::Address(spender)])
}

pub fn encode_approve(spender: Address, value: U256) -> Result<Vec<u8>, DecodingError> {
    encode(&APPROVE, &[Token::Address(spender), Token::Uint(value)])
}

pub fn encode_transfer_from(
    from: Address,
    to: Address,
    value: U256,
) -> Result<Vec<u8>, DecodingError> {
    encode(
        &TRANSFER_FROM,
        &[Token::Address(from), Token::Address(to), Token::Uint(value)],
    )
}

/// Decode a single `uint256` return value (balanceOf, allowance)
pub fn decode_uint(function: &Function, output: &[u8]) -> Result<U256, DecodingError> {
    function
        .decode_output(output)
        .map_err(|e| DecodingError::AbiParsingError(format!("{}: {}", function.name, e)))?
        .into_iter()
        .next()
        .and_then(|token| token.into_uint())
        .ok_or(DecodingError::MissingField(function.name.clone()))
}

/// Decode the `bool` status of approve/transfer/transferFrom
///
/// Non-compliant tokens (USDT and friends) return no data at all; an empty
/// return counts as success.
pub fn decode_success(function: &Function, output: &[u8]) -> Result<bool, DecodingError> {
    if output.is_empty() {
        return Ok(true);
    }
    function
        .decode_output(output)
        .map_err(|e| DecodingError::AbiParsingError(format!("{}: {}", function.name, e)))?
        .into_iter()
        .next()
        .and_then(|token| token.into_bool())
        .ok_or(DecodingError::MissingField(function.name.clone()))
}
