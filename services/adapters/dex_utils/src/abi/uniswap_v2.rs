//! Uniswap V2 Router02 ABIs
//!
//! This module contains the canonical ABI definitions for the Router02
//! entry points a trading route uses: the read-only quote and the three
//! exact-input swaps. Compatible forks (Sushiswap, Quickswap V2) share them.

use super::events::DecodingError;
use super::{address_array, param, uint_array};
use ethers_core::abi::{Function, ParamType, StateMutability, Token};
use ethers_core::types::{Address, U256};
use once_cell::sync::Lazy;

/// function getAmountsOut(uint amountIn, address[] path) view returns (uint[] amounts)
pub static GET_AMOUNTS_OUT: Lazy<Function> = Lazy::new(get_amounts_out_function);

/// function swapExactETHForTokens(uint amountOutMin, address[] path, address to, uint deadline) payable returns (uint[] amounts)
pub static SWAP_EXACT_ETH_FOR_TOKENS: Lazy<Function> =
    Lazy::new(swap_exact_eth_for_tokens_function);

/// function swapExactTokensForETH(uint amountIn, uint amountOutMin, address[] path, address to, uint deadline) returns (uint[] amounts)
pub static SWAP_EXACT_TOKENS_FOR_ETH: Lazy<Function> =
    Lazy::new(|| swap_exact_tokens_function("swapExactTokensForETH"));

/// function swapExactTokensForTokens(uint amountIn, uint amountOutMin, address[] path, address to, uint deadline) returns (uint[] amounts)
pub static SWAP_EXACT_TOKENS_FOR_TOKENS: Lazy<Function> =
    Lazy::new(|| swap_exact_tokens_function("swapExactTokensForTokens"));

#[allow(deprecated)]
fn get_amounts_out_function() -> Function {
    Function {
        name: "getAmountsOut".to_string(),
        inputs: vec![
            param("amountIn", ParamType::Uint(256)),
            param("path", address_array()),
        ],
        outputs: vec![param("amounts", uint_array())],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

#[allow(deprecated)]
fn swap_exact_eth_for_tokens_function() -> Function {
    Function {
        name: "swapExactETHForTokens".to_string(),
        inputs: vec![
            param("amountOutMin", ParamType::Uint(256)),
            param("path", address_array()),
            param("to", ParamType::Address),
            param("deadline", ParamType::Uint(256)),
        ],
        outputs: vec![param("amounts", uint_array())],
        constant: None,
        state_mutability: StateMutability::Payable,
    }
}

#[allow(deprecated)]
fn swap_exact_tokens_function(name: &str) -> Function {
    Function {
        name: name.to_string(),
        inputs: vec![
            param("amountIn", ParamType::Uint(256)),
            param("amountOutMin", ParamType::Uint(256)),
            param("path", address_array()),
            param("to", ParamType::Address),
            param("deadline", ParamType::Uint(256)),
        ],
        outputs: vec![param("amounts", uint_array())],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

fn path_token(path: &[Address]) -> Token {
    Token::Array(path.iter().copied().map(Token::Address).collect())
}

fn encode(function: &Function, tokens: &[Token]) -> Result<Vec<u8>, DecodingError> {
    function
        .encode_input(tokens)
        .map_err(|e| DecodingError::AbiParsingError(format!("{}: {}", function.name, e)))
}

/// Calldata for `getAmountsOut(amount_in, path)`
pub fn encode_get_amounts_out(amount_in: U256, path: &[Address]) -> Result<Vec<u8>, DecodingError> {
    encode(&GET_AMOUNTS_OUT, &[Token::Uint(amount_in), path_token(path)])
}

/// Calldata for `swapExactETHForTokens`; the input travels as call value
pub fn encode_swap_exact_eth_for_tokens(
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>, DecodingError> {
    encode(
        &SWAP_EXACT_ETH_FOR_TOKENS,
        &[
            Token::Uint(amount_out_min),
            path_token(path),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

/// Calldata for `swapExactTokensForETH`
pub fn encode_swap_exact_tokens_for_eth(
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>, DecodingError> {
    encode_exact_tokens(&SWAP_EXACT_TOKENS_FOR_ETH, amount_in, amount_out_min, path, to, deadline)
}

/// Calldata for `swapExactTokensForTokens`
pub fn encode_swap_exact_tokens_for_tokens(
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>, DecodingError> {
    encode_exact_tokens(&SWAP_EXACT_TOKENS_FOR_TOKENS, amount_in, amount_out_min, path, to, deadline)
}

fn encode_exact_tokens(
    function: &Function,
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>, DecodingError> {
    encode(
        function,
        &[
            Token::Uint(amount_in),
            Token::Uint(amount_out_min),
            path_token(path),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

/// Decode the `uint[] amounts` returned by every router function above
///
/// The router guarantees one entry per path hop; an empty array is treated
/// as malformed output.
pub fn decode_amounts(function: &Function, output: &[u8]) -> Result<Vec<U256>, DecodingError> {
    let tokens = function
        .decode_output(output)
        .map_err(|e| DecodingError::AbiParsingError(format!("{}: {}", function.name, e)))?;

    let amounts = tokens
        .into_iter()
        .next()
        .and_then(|token| token.into_array())
        .ok_or(DecodingError::MissingField("amounts".to_string()))?;

    let amounts = amounts
        .into_iter()
        .map(|token| token.into_uint())
        .collect::<Option<Vec<U256>>>()
        .ok_or(DecodingError::MissingField("amounts[]".to_string()))?;

    if amounts.is_empty() {
        return Err(DecodingError::MissingField("amounts".to_string()));
    }
    Ok(amounts)
}
