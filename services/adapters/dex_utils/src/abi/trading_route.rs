//! Trading route ABIs
//!
//! The route's own event, as an on-chain route contract would emit it.

use ethers_core::abi::{Event, EventParam, ParamType};

/// Trading route Trade event ABI definition
/// event Trade(address indexed _src, uint256 _srcAmount, address indexed _dest, uint256 _destAmount)
pub fn trade_event() -> Event {
    Event {
        name: "Trade".to_string(),
        inputs: vec![
            EventParam {
                name: "_src".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "_srcAmount".to_string(),
                kind: ParamType::Uint(256),
                indexed: false,
            },
            EventParam {
                name: "_dest".to_string(),
                kind: ParamType::Address,
                indexed: true,
            },
            EventParam {
                name: "_destAmount".to_string(),
                kind: ParamType::Uint(256),
                indexed: false,
            },
        ],
        anonymous: false,
    }
}
