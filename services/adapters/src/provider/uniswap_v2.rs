//! Delegating provider for a live Uniswap V2 deployment
//!
//! Encodes every call with the canonical ABIs from `dex`, reads through
//! `eth_call` and submits state changes as transactions signed by the
//! middleware. Swaps are simulated with `eth_call` first so the router's
//! reported amounts are known before the transaction is sent; the
//! transaction then executes against the same state unless the pool moves in
//! between.
//!
//! The provider signs for exactly one account. Requests to act for any other
//! account fail with [`ProviderError::Unauthorized`]; transfers whose source
//! and destination coincide are no-ops, which lets a single signer act as
//! both caller and route.

use super::{RouterProtocol, SwapCall, SwapProvider, TokenProtocol};
use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use dex::{erc20, uniswap_v2};
use ethers::abi::Function;
use ethers::providers::{Middleware, MiddlewareError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, U256, U64};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// [`SwapProvider`] backed by an ethers middleware
pub struct UniswapV2Provider<M> {
    client: Arc<M>,
    router: Address,
    account: Address,
    trade_lock: Mutex<()>,
}

impl<M: Middleware + 'static> UniswapV2Provider<M> {
    /// `account` must be the address the middleware signs for
    pub fn new(client: Arc<M>, router: Address, account: Address) -> Self {
        Self {
            client,
            router,
            account,
            trade_lock: Mutex::new(()),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    fn ensure_account(&self, account: Address) -> ProviderResult<()> {
        if account != self.account {
            return Err(ProviderError::Unauthorized { account });
        }
        Ok(())
    }

    fn transaction(&self, to: Address, data: Vec<u8>, value: U256) -> TypedTransaction {
        TransactionRequest::new()
            .from(self.account)
            .to(to)
            .data(data)
            .value(value)
            .into()
    }

    async fn eth_call(&self, tx: &TypedTransaction) -> ProviderResult<Vec<u8>> {
        self.client
            .call(tx, None)
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(middleware_error)
    }

    async fn submit(&self, tx: TypedTransaction) -> ProviderResult<()> {
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(middleware_error)?;
        let tx_hash = pending.tx_hash();
        debug!("📤 Submitted transaction 0x{:x}", tx_hash);

        let receipt = pending
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .ok_or_else(|| {
                ProviderError::Transport(format!("transaction 0x{:x} dropped", tx_hash))
            })?;

        if receipt.status != Some(U64::one()) {
            return Err(ProviderError::Reverted(format!(
                "transaction 0x{:x} failed in block {:?}",
                tx_hash, receipt.block_number
            )));
        }
        debug!("✅ Transaction 0x{:x} confirmed", tx_hash);
        Ok(())
    }

    /// Simulate, then send, a token call returning `bool`
    async fn token_call(&self, token: Address, function: &Function, data: Vec<u8>) -> ProviderResult<()> {
        let tx = self.transaction(token, data, U256::zero());
        let output = self.eth_call(&tx).await?;
        if !erc20::decode_success(function, &output)? {
            return Err(ProviderError::Reverted(format!(
                "{} on {:?} returned false",
                function.name, token
            )));
        }
        self.submit(tx).await
    }

    /// Simulate, then send, a router swap
    async fn swap(
        &self,
        function: &Function,
        call: &SwapCall,
        data: Vec<u8>,
        value: U256,
    ) -> ProviderResult<Vec<U256>> {
        self.ensure_account(call.sender)?;
        let tx = self.transaction(self.router, data, value);

        let output = self.eth_call(&tx).await?;
        let amounts = uniswap_v2::decode_amounts(function, &output)?;

        info!(
            "🔄 {} {} -> {:?} (expected out {:?})",
            function.name,
            call.amount_in,
            call.path,
            amounts.last()
        );
        self.submit(tx).await?;
        Ok(amounts)
    }
}

fn middleware_error<E: MiddlewareError>(error: E) -> ProviderError {
    match error.as_error_response() {
        Some(response) => ProviderError::Reverted(response.message.clone()),
        None => ProviderError::Transport(error.to_string()),
    }
}

#[async_trait]
impl<M: Middleware + 'static> TokenProtocol for UniswapV2Provider<M> {
    async fn balance_of(&self, token: Address, holder: Address) -> ProviderResult<U256> {
        let data = erc20::encode_balance_of(holder)?;
        let output = self
            .eth_call(&self.transaction(token, data, U256::zero()))
            .await?;
        Ok(erc20::decode_uint(&erc20::BALANCE_OF, &output)?)
    }

    async fn native_balance_of(&self, holder: Address) -> ProviderResult<U256> {
        self.client
            .get_balance(holder, None)
            .await
            .map_err(middleware_error)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> ProviderResult<U256> {
        let data = erc20::encode_allowance(owner, spender)?;
        let output = self
            .eth_call(&self.transaction(token, data, U256::zero()))
            .await?;
        Ok(erc20::decode_uint(&erc20::ALLOWANCE, &output)?)
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        self.ensure_account(owner)?;
        let data = erc20::encode_approve(spender, amount)?;
        self.token_call(token, &erc20::APPROVE, data).await
    }

    async fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        self.ensure_account(spender)?;
        if from == to {
            return Ok(());
        }
        let data = erc20::encode_transfer_from(from, to, amount)?;
        self.token_call(token, &erc20::TRANSFER_FROM, data).await
    }

    async fn transfer_native(&self, from: Address, to: Address, amount: U256) -> ProviderResult<()> {
        self.ensure_account(from)?;
        if from == to || amount.is_zero() {
            return Ok(());
        }
        self.submit(self.transaction(to, Vec::new(), amount)).await
    }
}

#[async_trait]
impl<M: Middleware + 'static> RouterProtocol for UniswapV2Provider<M> {
    fn router_address(&self) -> Address {
        self.router
    }

    async fn get_amounts_out(&self, amount_in: U256, path: &[Address]) -> ProviderResult<Vec<U256>> {
        let data = uniswap_v2::encode_get_amounts_out(amount_in, path)?;
        let output = self
            .eth_call(&self.transaction(self.router, data, U256::zero()))
            .await?;
        Ok(uniswap_v2::decode_amounts(&uniswap_v2::GET_AMOUNTS_OUT, &output)?)
    }

    async fn swap_exact_eth_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let data = uniswap_v2::encode_swap_exact_eth_for_tokens(
            call.amount_out_min,
            &call.path,
            call.to,
            call.deadline,
        )?;
        self.swap(&uniswap_v2::SWAP_EXACT_ETH_FOR_TOKENS, &call, data, call.amount_in)
            .await
    }

    async fn swap_exact_tokens_for_eth(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let data = uniswap_v2::encode_swap_exact_tokens_for_eth(
            call.amount_in,
            call.amount_out_min,
            &call.path,
            call.to,
            call.deadline,
        )?;
        self.swap(&uniswap_v2::SWAP_EXACT_TOKENS_FOR_ETH, &call, data, U256::zero())
            .await
    }

    async fn swap_exact_tokens_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let data = uniswap_v2::encode_swap_exact_tokens_for_tokens(
            call.amount_in,
            call.amount_out_min,
            &call.path,
            call.to,
            call.deadline,
        )?;
        self.swap(&uniswap_v2::SWAP_EXACT_TOKENS_FOR_TOKENS, &call, data, U256::zero())
            .await
    }
}

// Live chains are atomic per transaction; no snapshots
impl<M: Middleware + 'static> SwapProvider for UniswapV2Provider<M> {
    fn trade_lock(&self) -> &Mutex<()> {
        &self.trade_lock
    }
}
