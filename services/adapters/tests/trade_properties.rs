//! Trading Route Property Tests
//!
//! Invariants that must hold for any amount and any fixed pair rate:
//! quotes are idempotent, trades realize exactly the quote, inputs move
//! exactly the declared amount, and rejected trades never touch the ledger.

use proptest::prelude::*;
use route_adapter::{
    ProviderError, RouteConfig, RouteError, SimulatedChain, UniswapV2TradingRoute,
};
use route_config::blockchain::tokens::{DAI, ETHER, MKR, WETH};
use std::sync::Arc;
use types::{Address, TradeRequest, U256};

fn caller() -> Address {
    Address::repeat_byte(0xca)
}

fn route_address() -> Address {
    Address::repeat_byte(0x70)
}

fn setup(numerator: u64, denominator: u64) -> (Arc<SimulatedChain>, UniswapV2TradingRoute<SimulatedChain>) {
    let chain = Arc::new(SimulatedChain::mainnet());
    for (from, to) in [(WETH, DAI), (MKR, DAI), (MKR, WETH)] {
        chain.set_rate(from, to, U256::from(numerator), U256::from(denominator)).unwrap();
    }
    let route = UniswapV2TradingRoute::new(RouteConfig::mainnet(), route_address(), Arc::clone(&chain));
    (chain, route)
}

fn rate() -> impl Strategy<Value = (u64, u64)> {
    (1u64..=1_000_000, 1u64..=1_000)
}

proptest! {
    #[test]
    fn quote_is_idempotent(amount in 1u64..=u64::MAX, (num, den) in rate()) {
        let (_, route) = setup(num, den);
        tokio_test::block_on(async {
            let first = route.quote(ETHER, DAI, U256::from(amount)).await;
            let second = route.quote(ETHER, DAI, U256::from(amount)).await;
            prop_assert_eq!(first.ok(), second.ok());
            Ok(())
        })?;
    }

    #[test]
    fn native_trade_realizes_quote(amount in 1u64..=u64::MAX / 2, (num, den) in rate()) {
        let (chain, route) = setup(num, den);
        let amount = U256::from(amount);
        chain.set_native_balance(caller(), amount * 2);

        tokio_test::block_on(async {
            let quoted = route.quote(ETHER, DAI, amount).await;
            let traded = route.trade(caller(), TradeRequest::native(ETHER, DAI, amount)).await;

            match (quoted, traded) {
                (Ok(quoted), Ok(received)) => {
                    prop_assert_eq!(quoted, received);
                    prop_assert_eq!(chain.token_balance(DAI, caller()), received);
                    prop_assert_eq!(chain.native_balance(caller()), amount);
                }
                // Floor of 1 rejects dust outputs; nothing moves
                (Ok(quoted), Err(_)) => {
                    prop_assert!(quoted.is_zero());
                    prop_assert_eq!(chain.native_balance(caller()), amount * 2);
                }
                (Err(e), _) => prop_assert!(false, "quote failed: {}", e),
            }
            Ok(())
        })?;
    }

    #[test]
    fn token_trade_moves_exact_input(
        balance in 1u64..=u64::MAX,
        spend_ratio in 1u64..=100,
        (num, den) in rate(),
        to_native in any::<bool>(),
    ) {
        let (chain, route) = setup(num, den);
        let balance = U256::from(balance);
        let amount = (balance * spend_ratio / 100).max(U256::one());
        chain.set_token_balance(MKR, caller(), balance);
        chain.set_allowance(MKR, caller(), route_address(), U256::MAX);
        let dest = if to_native { ETHER } else { DAI };

        tokio_test::block_on(async {
            let quoted = route.quote(MKR, dest, amount).await.unwrap();
            let result = route.trade(caller(), TradeRequest::token(MKR, dest, amount)).await;

            if quoted.is_zero() {
                prop_assert!(result.is_err());
                prop_assert_eq!(chain.token_balance(MKR, caller()), balance);
            } else {
                prop_assert_eq!(result.unwrap(), quoted);
                prop_assert_eq!(chain.token_balance(MKR, caller()), balance - amount);
                let credited = if to_native {
                    chain.native_balance(caller())
                } else {
                    chain.token_balance(DAI, caller())
                };
                prop_assert_eq!(credited, quoted);
            }
            prop_assert!(chain.token_balance(MKR, route_address()).is_zero());
            prop_assert!(chain.native_balance(route_address()).is_zero());
            Ok(())
        })?;
    }

    #[test]
    fn mismatched_attachment_never_touches_ledger(
        amount in 1u64..=u64::MAX,
        attached in 0u64..=u64::MAX,
    ) {
        prop_assume!(amount != attached);
        let (chain, route) = setup(1, 1);
        chain.set_native_balance(caller(), U256::from(u64::MAX));

        let request = TradeRequest::native(ETHER, DAI, U256::from(amount))
            .with_attached_value(U256::from(attached));
        let result = tokio_test::block_on(route.trade(caller(), request));

        prop_assert!(matches!(result, Err(RouteError::AmountMismatch { .. })), "expected AmountMismatch");
        prop_assert_eq!(chain.native_balance(caller()), U256::from(u64::MAX));
        prop_assert!(chain.token_balance(DAI, caller()).is_zero());
    }

    #[test]
    fn empty_balance_trade_never_touches_ledger(
        amount in 1u64..=u64::MAX,
        to_native in any::<bool>(),
    ) {
        let (chain, route) = setup(1, 1);
        chain.set_allowance(MKR, caller(), route_address(), U256::MAX);
        let dest = if to_native { ETHER } else { DAI };

        let result = tokio_test::block_on(
            route.trade(caller(), TradeRequest::token(MKR, dest, U256::from(amount))),
        );

        prop_assert!(matches!(
            result,
            Err(RouteError::Provider(ProviderError::InsufficientBalance { .. }))
        ), "expected InsufficientBalance");
        prop_assert!(chain.token_balance(MKR, caller()).is_zero());
        prop_assert_eq!(chain.token_allowance(MKR, caller(), route_address()), U256::MAX);
        prop_assert!(chain.token_balance(DAI, caller()).is_zero());
        prop_assert!(chain.native_balance(caller()).is_zero());
        prop_assert!(chain.token_balance(MKR, route_address()).is_zero());
        prop_assert_eq!(chain.snapshot_depth(), 0);
    }

    #[test]
    fn same_asset_always_rejected(byte in any::<u8>(), amount in any::<u64>()) {
        let (_, route) = setup(1, 1);
        let asset = Address::repeat_byte(byte);
        let request = TradeRequest::token(asset, asset, U256::from(amount));

        let result = tokio_test::block_on(route.trade(caller(), request));
        prop_assert!(matches!(result, Err(RouteError::DestinationEqualsSource { .. })), "unexpected result for same-asset trade");
    }
}
