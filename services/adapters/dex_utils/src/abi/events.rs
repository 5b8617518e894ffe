//! Trade event encoding and decoding
//!
//! Provides semantic validation and type-safe decoding of `Trade` logs
//! using ethabi, preventing manual byte parsing errors.

use super::trading_route;
use ethers_core::abi::{encode, RawLog, Token};
use ethers_core::types::H256;
use types::TradeEvent;

/// Error types for ABI encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    #[error("Unknown event signature: {0}")]
    UnknownEventSignature(String),

    #[error("ABI parsing failed: {0}")]
    AbiParsingError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Encode a trade event as the log an on-chain route would emit
///
/// Topics are `[signature, src, dest]`; data carries the two amounts.
pub fn encode_trade_log(event: &TradeEvent) -> RawLog {
    RawLog {
        topics: vec![
            trading_route::trade_event().signature(),
            H256::from(event.src_asset),
            H256::from(event.dest_asset),
        ],
        data: encode(&[Token::Uint(event.src_amount), Token::Uint(event.dest_amount)]),
    }
}

/// ABI decoder for Trade events
pub struct TradeEventDecoder;

impl TradeEventDecoder {
    /// Decode a raw `Trade` log back into a [`TradeEvent`]
    pub fn decode(raw_log: RawLog) -> Result<TradeEvent, DecodingError> {
        let event = trading_route::trade_event();

        match raw_log.topics.first() {
            Some(topic) if *topic == event.signature() => {}
            Some(topic) => {
                return Err(DecodingError::UnknownEventSignature(format!("{:?}", topic)))
            }
            None => return Err(DecodingError::MissingField("topic0".to_string())),
        }

        let decoded = event
            .parse_log(raw_log)
            .map_err(|e| DecodingError::AbiParsingError(e.to_string()))?;

        let src_asset = decoded
            .params
            .first()
            .and_then(|p| p.value.clone().into_address())
            .ok_or(DecodingError::MissingField("_src".to_string()))?;

        let src_amount = decoded
            .params
            .get(1)
            .and_then(|p| p.value.clone().into_uint())
            .ok_or(DecodingError::MissingField("_srcAmount".to_string()))?;

        let dest_asset = decoded
            .params
            .get(2)
            .and_then(|p| p.value.clone().into_address())
            .ok_or(DecodingError::MissingField("_dest".to_string()))?;

        let dest_amount = decoded
            .params
            .get(3)
            .and_then(|p| p.value.clone().into_uint())
            .ok_or(DecodingError::MissingField("_destAmount".to_string()))?;

        Ok(TradeEvent {
            src_asset,
            src_amount,
            dest_asset,
            dest_amount,
        })
    }
}
