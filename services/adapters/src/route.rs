//! Uniswap V2 trading route
//!
//! Accepts `(src, dest, amount)` trades, validates them, and forwards them
//! to the Uniswap V2 router through a [`SwapProvider`]. Native currency is
//! identified by a sentinel address and travels through the router as its
//! wrapped token.
//!
//! ## Trade flow
//!
//! ```text
//! native -> token   caller --value--> route --swapExactETHForTokens--> caller
//! token  -> native  caller --transferFrom--> route --approve/swapExactTokensForETH--> route --value--> caller
//! token  -> token   caller --transferFrom--> route --approve/swapExactTokensForTokens--> caller
//! ```
//!
//! Caller-input errors are raised before any provider call. Everything after
//! the first state change is guarded by a provider snapshot that is reverted
//! if any later step fails. Each successful trade emits exactly one
//! [`TradeEvent`] carrying the router's reported amounts.

use crate::error::{RouteError, Result};
use crate::provider::{SwapCall, SwapProvider};
use ethers::types::{Address, U256};
use route_config::RouteConfig;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use types::{AssetKind, SwapPath, TradeEvent, TradeOptions, TradeRequest};

/// Capacity of the trade event channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Trading route adapter over a Uniswap V2 router
pub struct UniswapV2TradingRoute<P> {
    config: RouteConfig,
    address: Address,
    provider: Arc<P>,
    events: broadcast::Sender<TradeEvent>,
}

impl<P: SwapProvider> UniswapV2TradingRoute<P> {
    /// Create a route acting as `address` on the chain behind `provider`
    pub fn new(config: RouteConfig, address: Address, provider: Arc<P>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        if provider.router_address() != config.router {
            warn!(
                "Provider router {:?} differs from configured router {:?}",
                provider.router_address(),
                config.router
            );
        }
        Self {
            config,
            address,
            provider,
            events,
        }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// The route's own account
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn router(&self) -> Address {
        self.config.router
    }

    pub fn native_sentinel(&self) -> Address {
        self.config.native_sentinel
    }

    pub fn wrapped_native(&self) -> Address {
        self.config.wrapped_native
    }

    pub fn amount_out_min(&self) -> U256 {
        self.config.amount_out_min
    }

    pub fn deadline(&self) -> U256 {
        self.config.deadline
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Receive every [`TradeEvent`] emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<TradeEvent> {
        self.events.subscribe()
    }

    fn classify(&self, asset: Address) -> AssetKind {
        AssetKind::classify(asset, self.config.native_sentinel)
    }

    fn path(&self, src: AssetKind, dest: AssetKind) -> Vec<Address> {
        SwapPath::resolve(src, dest, self.config.wrapped_native).into_hops()
    }

    /// Expected output of trading `amount` of `src` into `dest`
    ///
    /// Read-only; router failures (no pool, zero input) propagate unchanged.
    pub async fn quote(&self, src: Address, dest: Address, amount: U256) -> Result<U256> {
        if src == dest {
            return Err(RouteError::DestinationEqualsSource { asset: src });
        }

        let path = self.path(self.classify(src), self.classify(dest));
        let amounts = self.provider.get_amounts_out(amount, &path).await?;
        let amount_out = last_amount(&amounts, path.len())?;

        debug!(
            "🔍 Quote {} of {:?} -> {} of {:?}",
            amount, src, amount_out, dest
        );
        Ok(amount_out)
    }

    /// Same as [`UniswapV2TradingRoute::quote`]
    pub async fn get_destination_return_amount(
        &self,
        src: Address,
        dest: Address,
        amount: U256,
    ) -> Result<U256> {
        self.quote(src, dest, amount).await
    }

    /// Execute `request` for `caller` with the configured floor and deadline
    pub async fn trade(&self, caller: Address, request: TradeRequest) -> Result<U256> {
        self.trade_with_options(caller, request, TradeOptions::default())
            .await
    }

    /// Execute `request` for `caller`, overriding floor and deadline
    ///
    /// Returns the amount of `dest` credited to the caller.
    pub async fn trade_with_options(
        &self,
        caller: Address,
        request: TradeRequest,
        options: TradeOptions,
    ) -> Result<U256> {
        let src = self.classify(request.src_asset);
        let dest = self.classify(request.dest_asset);
        self.validate(&request, src)?;

        // Held until the snapshot is released or reverted
        let _guard = self.provider.trade_lock().lock().await;

        let snapshot = self.provider.snapshot().await;
        let result = self.execute(caller, &request, src, dest, options).await;

        let amounts = match result {
            Ok(amounts) => {
                if let Some(id) = snapshot {
                    if let Err(e) = self.provider.release(id).await {
                        warn!("Failed to release snapshot {} after trade: {}", id, e);
                    }
                }
                amounts
            }
            Err(error) => {
                warn!(
                    "❌ Trade {:?} -> {:?} for {:?} failed: {}",
                    request.src_asset, request.dest_asset, caller, error
                );
                if let Some(id) = snapshot {
                    if let Err(e) = self.provider.revert_to(id).await {
                        warn!("Failed to revert snapshot {}: {}", id, e);
                    }
                }
                return Err(error);
            }
        };

        // Length checked in execute
        let event = TradeEvent {
            src_asset: request.src_asset,
            src_amount: amounts[0],
            dest_asset: request.dest_asset,
            dest_amount: amounts[amounts.len() - 1],
        };
        if self.events.send(event).is_err() {
            debug!("No trade subscribers");
        }

        info!(
            "✅ Trade {} of {:?} -> {} of {:?} for {:?}",
            event.src_amount, event.src_asset, event.dest_amount, event.dest_asset, caller
        );
        Ok(event.dest_amount)
    }

    /// Caller-input checks; run before any provider call
    fn validate(&self, request: &TradeRequest, src: AssetKind) -> Result<()> {
        if request.src_asset == request.dest_asset {
            return Err(RouteError::DestinationEqualsSource {
                asset: request.src_asset,
            });
        }

        let expected_attachment = if src.is_native() {
            request.amount
        } else {
            U256::zero()
        };
        if request.attached_value != expected_attachment {
            return Err(RouteError::AmountMismatch {
                declared: request.amount,
                attached: request.attached_value,
            });
        }
        Ok(())
    }

    async fn execute(
        &self,
        caller: Address,
        request: &TradeRequest,
        src: AssetKind,
        dest: AssetKind,
        options: TradeOptions,
    ) -> Result<Vec<U256>> {
        let path = self.path(src, dest);
        let hops = path.len();
        let amount = request.amount;
        let router = self.provider.router_address();

        let mut call = SwapCall {
            sender: self.address,
            amount_in: amount,
            amount_out_min: options.amount_out_min.unwrap_or(self.config.amount_out_min),
            path,
            to: caller,
            deadline: options.deadline.unwrap_or(self.config.deadline),
        };

        let amounts = match (src, dest) {
            (AssetKind::Native, _) => {
                self.provider
                    .transfer_native(caller, self.address, amount)
                    .await?;
                debug!("🔄 swapExactETHForTokens {} via {:?}", amount, call.path);
                self.provider.swap_exact_eth_for_tokens(call).await?
            }
            (AssetKind::Token(token), AssetKind::Native) => {
                self.pull_and_approve(token, caller, router, amount).await?;
                call.to = self.address;
                debug!("🔄 swapExactTokensForETH {} via {:?}", amount, call.path);
                let amounts = self.provider.swap_exact_tokens_for_eth(call).await?;
                let amount_out = last_amount(&amounts, hops)?;
                self.provider
                    .transfer_native(self.address, caller, amount_out)
                    .await?;
                amounts
            }
            (AssetKind::Token(token), AssetKind::Token(_)) => {
                self.pull_and_approve(token, caller, router, amount).await?;
                debug!("🔄 swapExactTokensForTokens {} via {:?}", amount, call.path);
                self.provider.swap_exact_tokens_for_tokens(call).await?
            }
        };

        last_amount(&amounts, hops)?;
        Ok(amounts)
    }

    async fn pull_and_approve(
        &self,
        token: Address,
        caller: Address,
        router: Address,
        amount: U256,
    ) -> Result<()> {
        self.provider
            .transfer_from(token, self.address, caller, self.address, amount)
            .await?;
        self.provider
            .approve(token, self.address, router, amount)
            .await?;
        Ok(())
    }
}

/// Final amount of a router reply, which must hold one entry per hop
fn last_amount(amounts: &[U256], hops: usize) -> Result<U256> {
    if amounts.len() != hops {
        return Err(RouteError::MalformedRouterResponse(format!(
            "expected {} amounts, got {}",
            hops,
            amounts.len()
        )));
    }
    amounts
        .last()
        .copied()
        .ok_or_else(|| RouteError::MalformedRouterResponse("no amounts".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderResult};
    use crate::provider::{Operation, RouterProtocol, SimulatedChain, SnapshotId, TokenProtocol};
    use async_trait::async_trait;
    use route_config::blockchain::tokens::{DAI, ETHER, MKR, WETH};

    fn caller() -> Address {
        Address::repeat_byte(0xca)
    }

    fn route_address() -> Address {
        Address::repeat_byte(0x70)
    }

    fn setup() -> (UniswapV2TradingRoute<SimulatedChain>, Arc<SimulatedChain>) {
        let chain = Arc::new(SimulatedChain::mainnet());
        chain.set_rate(WETH, DAI, U256::from(2_000u64), U256::one()).unwrap();
        chain.set_rate(MKR, DAI, U256::from(700u64), U256::one()).unwrap();
        chain.set_rate(MKR, WETH, U256::from(7u64), U256::from(20u64)).unwrap();
        let route =
            UniswapV2TradingRoute::new(RouteConfig::mainnet(), route_address(), Arc::clone(&chain));
        (route, chain)
    }

    #[tokio::test]
    async fn test_caller_errors_precede_provider_calls() {
        let (route, chain) = setup();
        chain.fail_on(Operation::Quote, "unreachable");
        chain.fail_on(Operation::NativeTransfer, "unreachable");

        let same = route
            .trade(caller(), TradeRequest::token(MKR, MKR, U256::one()))
            .await
            .unwrap_err();
        assert!(matches!(same, RouteError::DestinationEqualsSource { asset } if asset == MKR));

        let quote = route.quote(ETHER, ETHER, U256::one()).await.unwrap_err();
        assert!(matches!(quote, RouteError::DestinationEqualsSource { .. }));

        let mismatch = route
            .trade(
                caller(),
                TradeRequest::native(ETHER, DAI, U256::from(10u64))
                    .with_attached_value(U256::from(5u64)),
            )
            .await
            .unwrap_err();
        assert!(matches!(mismatch, RouteError::AmountMismatch { .. }));
        assert_eq!(chain.snapshot_depth(), 0);
    }

    #[tokio::test]
    async fn test_token_to_native_forwards_proceeds() {
        let (route, chain) = setup();
        chain.mint(MKR, caller(), U256::from(20u64)).unwrap();
        chain.set_allowance(MKR, caller(), route_address(), U256::from(20u64));

        let out = route
            .trade(caller(), TradeRequest::token(MKR, ETHER, U256::from(20u64)))
            .await
            .unwrap();

        assert_eq!(out, U256::from(7u64));
        assert_eq!(chain.native_balance(caller()), U256::from(7u64));
        assert_eq!(chain.native_balance(route_address()), U256::zero());
        assert_eq!(chain.token_balance(MKR, route_address()), U256::zero());
        assert_eq!(chain.snapshot_depth(), 0);
    }

    #[tokio::test]
    async fn test_failed_forward_reverts_everything() {
        let (route, chain) = setup();
        chain.mint(MKR, caller(), U256::from(20u64)).unwrap();
        chain.set_allowance(MKR, caller(), route_address(), U256::from(20u64));
        chain.fail_on(Operation::NativeTransfer, "forward failed");

        let err = route
            .trade(caller(), TradeRequest::token(MKR, ETHER, U256::from(20u64)))
            .await
            .unwrap_err();
        assert!(matches!(
            err.provider_error(),
            Some(crate::error::ProviderError::Injected {
                operation: Operation::NativeTransfer,
                ..
            })
        ));

        assert_eq!(chain.token_balance(MKR, caller()), U256::from(20u64));
        assert_eq!(
            chain.token_allowance(MKR, caller(), route_address()),
            U256::from(20u64)
        );
        assert_eq!(
            chain.token_allowance(MKR, route_address(), route.router()),
            U256::zero()
        );
        assert_eq!(chain.snapshot_depth(), 0);
    }

    /// Simulated chain whose snapshots can never be released or reverted
    struct StuckSnapshots(SimulatedChain);

    #[async_trait]
    impl TokenProtocol for StuckSnapshots {
        async fn balance_of(&self, token: Address, holder: Address) -> ProviderResult<U256> {
            self.0.balance_of(token, holder).await
        }

        async fn native_balance_of(&self, holder: Address) -> ProviderResult<U256> {
            self.0.native_balance_of(holder).await
        }

        async fn allowance(
            &self,
            token: Address,
            owner: Address,
            spender: Address,
        ) -> ProviderResult<U256> {
            self.0.allowance(token, owner, spender).await
        }

        async fn approve(
            &self,
            token: Address,
            owner: Address,
            spender: Address,
            amount: U256,
        ) -> ProviderResult<()> {
            self.0.approve(token, owner, spender, amount).await
        }

        async fn transfer_from(
            &self,
            token: Address,
            spender: Address,
            from: Address,
            to: Address,
            amount: U256,
        ) -> ProviderResult<()> {
            self.0.transfer_from(token, spender, from, to, amount).await
        }

        async fn transfer_native(
            &self,
            from: Address,
            to: Address,
            amount: U256,
        ) -> ProviderResult<()> {
            self.0.transfer_native(from, to, amount).await
        }
    }

    #[async_trait]
    impl RouterProtocol for StuckSnapshots {
        fn router_address(&self) -> Address {
            self.0.router_address()
        }

        async fn get_amounts_out(
            &self,
            amount_in: U256,
            path: &[Address],
        ) -> ProviderResult<Vec<U256>> {
            self.0.get_amounts_out(amount_in, path).await
        }

        async fn swap_exact_eth_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
            self.0.swap_exact_eth_for_tokens(call).await
        }

        async fn swap_exact_tokens_for_eth(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
            self.0.swap_exact_tokens_for_eth(call).await
        }

        async fn swap_exact_tokens_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
            self.0.swap_exact_tokens_for_tokens(call).await
        }
    }

    #[async_trait]
    impl SwapProvider for StuckSnapshots {
        fn trade_lock(&self) -> &tokio::sync::Mutex<()> {
            self.0.trade_lock()
        }

        async fn snapshot(&self) -> Option<SnapshotId> {
            self.0.snapshot().await
        }

        async fn revert_to(&self, id: SnapshotId) -> ProviderResult<()> {
            Err(ProviderError::UnknownSnapshot(id))
        }

        async fn release(&self, id: SnapshotId) -> ProviderResult<()> {
            Err(ProviderError::UnknownSnapshot(id))
        }
    }

    fn stuck_setup() -> (UniswapV2TradingRoute<StuckSnapshots>, Arc<StuckSnapshots>) {
        let chain = SimulatedChain::mainnet();
        chain.set_rate(MKR, WETH, U256::from(7u64), U256::from(20u64)).unwrap();
        chain.mint(MKR, caller(), U256::from(20u64)).unwrap();
        chain.set_allowance(MKR, caller(), route_address(), U256::from(20u64));
        let provider = Arc::new(StuckSnapshots(chain));
        let route = UniswapV2TradingRoute::new(
            RouteConfig::mainnet(),
            route_address(),
            Arc::clone(&provider),
        );
        (route, provider)
    }

    #[tokio::test]
    async fn test_trade_error_survives_failed_revert() {
        let (route, provider) = stuck_setup();
        provider.0.fail_on(Operation::NativeTransfer, "forward failed");

        let err = route
            .trade(caller(), TradeRequest::token(MKR, ETHER, U256::from(20u64)))
            .await
            .unwrap_err();
        assert!(matches!(
            err.provider_error(),
            Some(ProviderError::Injected {
                operation: Operation::NativeTransfer,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_completed_trade_survives_failed_release() {
        let (route, provider) = stuck_setup();
        let mut events = route.subscribe();

        let out = route
            .trade(caller(), TradeRequest::token(MKR, ETHER, U256::from(20u64)))
            .await
            .unwrap();

        assert_eq!(out, U256::from(7u64));
        assert_eq!(provider.0.native_balance(caller()), U256::from(7u64));
        let event = events.try_recv().unwrap();
        assert_eq!(event.src_amount, U256::from(20u64));
        assert_eq!(event.dest_amount, U256::from(7u64));
    }

    #[test]
    fn test_last_amount_requires_one_entry_per_hop() {
        assert_eq!(
            last_amount(&[U256::one(), U256::from(2u64)], 2).unwrap(),
            U256::from(2u64)
        );
        assert!(matches!(
            last_amount(&[U256::one()], 2),
            Err(RouteError::MalformedRouterResponse(_))
        ));
        assert!(last_amount(&[], 0).is_err());
    }
}
