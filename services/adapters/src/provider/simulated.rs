//! Simulated chain
//!
//! A deterministic in-memory ledger implementing [`SwapProvider`]. It models
//! exactly what a trading route can observe of a chain:
//!
//! - native balances, ERC-20 balances and allowances, seeded directly
//! - a Uniswap V2 style router quoting from fixed per-pair exchange rates
//!   (`amount * numerator / denominator`, floored) with unlimited output
//!   inventory
//! - a settable block timestamp checked against swap deadlines
//! - failure injection per [`Operation`]
//! - stacked snapshots that can be reverted or released
//!
//! Every state-changing call runs against a copy of the ledger that is only
//! committed when the call succeeds, so a failing call never leaves partial
//! effects behind.

use super::{Operation, RouterProtocol, SnapshotId, SwapCall, SwapProvider, TokenProtocol};
use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use parking_lot::Mutex;
use route_config::blockchain::{routers, tokens};
use std::collections::HashMap;
use tokio::sync::Mutex as TradeLock;
use tracing::debug;

/// Block timestamp a fresh chain starts at
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Fixed exchange rate of a directed token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate {
    pub numerator: U256,
    pub denominator: U256,
}

impl ExchangeRate {
    /// `None` for a zero denominator
    pub fn new(numerator: U256, denominator: U256) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    /// Output for `amount_in`, rounded down
    pub fn apply(&self, amount_in: U256) -> ProviderResult<U256> {
        amount_in
            .checked_mul(self.numerator)
            .map(|product| product / self.denominator)
            .ok_or_else(|| {
                ProviderError::Overflow(format!(
                    "{} * {} exceeds 256 bits",
                    amount_in, self.numerator
                ))
            })
    }
}

#[derive(Debug, Clone, Default)]
struct Ledger {
    timestamp: U256,
    native: HashMap<Address, U256>,
    /// (token, holder) -> balance
    balances: HashMap<(Address, Address), U256>,
    /// (token, owner, spender) -> allowance
    allowances: HashMap<(Address, Address, Address), U256>,
    /// (from, to) -> rate
    rates: HashMap<(Address, Address), ExchangeRate>,
}

impl Ledger {
    fn native_balance(&self, holder: Address) -> U256 {
        self.native.get(&holder).copied().unwrap_or_default()
    }

    fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances.get(&(token, holder)).copied().unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn debit_native(&mut self, holder: Address, amount: U256) -> ProviderResult<()> {
        let available = self.native_balance(holder);
        if available < amount {
            return Err(ProviderError::InsufficientNativeBalance {
                holder,
                available,
                required: amount,
            });
        }
        self.native.insert(holder, available - amount);
        Ok(())
    }

    fn credit_native(&mut self, holder: Address, amount: U256) -> ProviderResult<()> {
        let balance = self
            .native_balance(holder)
            .checked_add(amount)
            .ok_or_else(|| ProviderError::Overflow(format!("native balance of {:?}", holder)))?;
        self.native.insert(holder, balance);
        Ok(())
    }

    fn credit_token(&mut self, token: Address, holder: Address, amount: U256) -> ProviderResult<()> {
        let balance = self
            .balance(token, holder)
            .checked_add(amount)
            .ok_or_else(|| {
                ProviderError::Overflow(format!("balance of {:?} in token {:?}", holder, token))
            })?;
        self.balances.insert((token, holder), balance);
        Ok(())
    }

    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        let available = self.balance(token, from);
        if available < amount {
            return Err(ProviderError::InsufficientBalance {
                token,
                holder: from,
                available,
                required: amount,
            });
        }
        self.balances.insert((token, from), available - amount);
        self.credit_token(token, to, amount)
    }

    /// ERC-20 `transferFrom`: allowance is spent before the balance moves
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(ProviderError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                available: allowance,
                required: amount,
            });
        }
        // Infinite approvals are never decremented
        if allowance != U256::MAX {
            self.allowances
                .insert((token, from, spender), allowance - amount);
        }
        self.move_tokens(token, from, to, amount)
    }

    fn amounts_out(&self, amount_in: U256, path: &[Address]) -> ProviderResult<Vec<U256>> {
        if path.len() < 2 {
            return Err(ProviderError::InvalidPath);
        }

        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        for pair in path.windows(2) {
            let input = amounts[amounts.len() - 1];
            if input.is_zero() {
                return Err(ProviderError::InsufficientInputAmount);
            }
            let rate = self
                .rates
                .get(&(pair[0], pair[1]))
                .ok_or(ProviderError::NoLiquidityPath {
                    from: pair[0],
                    to: pair[1],
                })?;
            amounts.push(rate.apply(input)?);
        }
        Ok(amounts)
    }

    fn ensure_deadline(&self, deadline: U256) -> ProviderResult<()> {
        if deadline < self.timestamp {
            return Err(ProviderError::Expired {
                deadline,
                timestamp: self.timestamp,
            });
        }
        Ok(())
    }
}

fn ensure_output(amounts: &[U256], amount_out_min: U256) -> ProviderResult<U256> {
    let amount_out = amounts.last().copied().unwrap_or_default();
    if amount_out < amount_out_min {
        return Err(ProviderError::InsufficientOutputAmount {
            amount_out,
            amount_out_min,
        });
    }
    Ok(amount_out)
}

#[derive(Debug, Default)]
struct ChainState {
    ledger: Ledger,
    snapshots: Vec<Ledger>,
    failures: HashMap<Operation, String>,
}

/// Deterministic in-memory [`SwapProvider`]
#[derive(Debug)]
pub struct SimulatedChain {
    router: Address,
    wrapped_native: Address,
    state: Mutex<ChainState>,
    trade_lock: TradeLock<()>,
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl SimulatedChain {
    /// Empty chain whose router lives at `router` and wraps native currency
    /// into `wrapped_native`
    pub fn new(router: Address, wrapped_native: Address) -> Self {
        let ledger = Ledger {
            timestamp: U256::from(GENESIS_TIMESTAMP),
            ..Ledger::default()
        };
        Self {
            router,
            wrapped_native,
            state: Mutex::new(ChainState {
                ledger,
                ..ChainState::default()
            }),
            trade_lock: TradeLock::new(()),
        }
    }

    /// Empty chain at the mainnet Uniswap V2 router and WETH addresses
    pub fn mainnet() -> Self {
        Self::new(routers::UNISWAP_V2_ROUTER, tokens::WETH)
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    // ---- seeding ----

    pub fn set_native_balance(&self, holder: Address, amount: U256) {
        self.state.lock().ledger.native.insert(holder, amount);
    }

    pub fn set_token_balance(&self, token: Address, holder: Address, amount: U256) {
        self.state.lock().ledger.balances.insert((token, holder), amount);
    }

    /// Add `amount` to a token balance
    pub fn mint(&self, token: Address, holder: Address, amount: U256) -> ProviderResult<()> {
        self.state.lock().ledger.credit_token(token, holder, amount)
    }

    /// Seed an allowance without going through [`TokenProtocol::approve`]
    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .ledger
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Set the directed rate `from -> to`; a zero denominator is rejected
    pub fn set_rate(
        &self,
        from: Address,
        to: Address,
        numerator: U256,
        denominator: U256,
    ) -> ProviderResult<()> {
        let rate = ExchangeRate::new(numerator, denominator)
            .ok_or(ProviderError::InvalidRate { from, to })?;
        self.state.lock().ledger.rates.insert((from, to), rate);
        Ok(())
    }

    /// Remove the pool between `from` and `to` in both directions
    pub fn remove_pair(&self, from: Address, to: Address) {
        let mut state = self.state.lock();
        state.ledger.rates.remove(&(from, to));
        state.ledger.rates.remove(&(to, from));
    }

    pub fn set_timestamp(&self, timestamp: U256) {
        self.state.lock().ledger.timestamp = timestamp;
    }

    /// Make every subsequent `operation` fail with `message`
    pub fn fail_on(&self, operation: Operation, message: impl Into<String>) {
        self.state.lock().failures.insert(operation, message.into());
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    // ---- queries ----

    pub fn native_balance(&self, holder: Address) -> U256 {
        self.state.lock().ledger.native_balance(holder)
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        self.state.lock().ledger.balance(token, holder)
    }

    pub fn token_allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state.lock().ledger.allowance(token, owner, spender)
    }

    pub fn timestamp(&self) -> U256 {
        self.state.lock().ledger.timestamp
    }

    pub fn snapshot_depth(&self) -> usize {
        self.state.lock().snapshots.len()
    }

    // ---- snapshots ----

    /// Push a copy of the ledger; ids are stack positions
    pub fn take_snapshot(&self) -> SnapshotId {
        let mut state = self.state.lock();
        let saved = state.ledger.clone();
        state.snapshots.push(saved);
        (state.snapshots.len() - 1) as SnapshotId
    }

    /// Restore snapshot `id`, discarding it and every newer one
    pub fn revert_snapshot(&self, id: SnapshotId) -> ProviderResult<()> {
        let mut state = self.state.lock();
        let index = usize::try_from(id).map_err(|_| ProviderError::UnknownSnapshot(id))?;
        if index >= state.snapshots.len() {
            return Err(ProviderError::UnknownSnapshot(id));
        }
        state.snapshots.truncate(index + 1);
        let saved = state
            .snapshots
            .pop()
            .ok_or(ProviderError::UnknownSnapshot(id))?;
        state.ledger = saved;
        debug!("🔄 Reverted simulated chain to snapshot {}", id);
        Ok(())
    }

    /// Drop snapshot `id` and every newer one, keeping current state
    pub fn release_snapshot(&self, id: SnapshotId) -> ProviderResult<()> {
        let mut state = self.state.lock();
        let index = usize::try_from(id).map_err(|_| ProviderError::UnknownSnapshot(id))?;
        if index >= state.snapshots.len() {
            return Err(ProviderError::UnknownSnapshot(id));
        }
        state.snapshots.truncate(index);
        Ok(())
    }

    /// Run `apply` on a copy of the ledger and commit it on success
    fn transact<T>(
        &self,
        operation: Operation,
        apply: impl FnOnce(&mut Ledger) -> ProviderResult<T>,
    ) -> ProviderResult<T> {
        let mut state = self.state.lock();
        if let Some(message) = state.failures.get(&operation) {
            return Err(ProviderError::Injected {
                operation,
                message: message.clone(),
            });
        }

        let mut next = state.ledger.clone();
        let result = apply(&mut next)?;
        state.ledger = next;
        Ok(result)
    }

    fn check_failure(&self, operation: Operation) -> ProviderResult<()> {
        match self.state.lock().failures.get(&operation) {
            Some(message) => Err(ProviderError::Injected {
                operation,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TokenProtocol for SimulatedChain {
    async fn balance_of(&self, token: Address, holder: Address) -> ProviderResult<U256> {
        Ok(self.token_balance(token, holder))
    }

    async fn native_balance_of(&self, holder: Address) -> ProviderResult<U256> {
        Ok(self.native_balance(holder))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> ProviderResult<U256> {
        Ok(self.token_allowance(token, owner, spender))
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        self.transact(Operation::Approve, |ledger| {
            ledger.allowances.insert((token, owner, spender), amount);
            Ok(())
        })
    }

    async fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> ProviderResult<()> {
        self.transact(Operation::TransferFrom, |ledger| {
            ledger.transfer_from(token, spender, from, to, amount)
        })
    }

    async fn transfer_native(&self, from: Address, to: Address, amount: U256) -> ProviderResult<()> {
        self.transact(Operation::NativeTransfer, |ledger| {
            ledger.debit_native(from, amount)?;
            ledger.credit_native(to, amount)
        })
    }
}

#[async_trait]
impl RouterProtocol for SimulatedChain {
    fn router_address(&self) -> Address {
        self.router
    }

    async fn get_amounts_out(&self, amount_in: U256, path: &[Address]) -> ProviderResult<Vec<U256>> {
        self.check_failure(Operation::Quote)?;
        self.state.lock().ledger.amounts_out(amount_in, path)
    }

    async fn swap_exact_eth_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let router = self.router;
        let wrapped_native = self.wrapped_native;
        self.transact(Operation::Swap, |ledger| {
            ledger.ensure_deadline(call.deadline)?;
            if call.path.first() != Some(&wrapped_native) {
                return Err(ProviderError::InvalidPath);
            }
            let amounts = ledger.amounts_out(call.amount_in, &call.path)?;
            let amount_out = ensure_output(&amounts, call.amount_out_min)?;

            ledger.debit_native(call.sender, call.amount_in)?;
            ledger.credit_native(router, call.amount_in)?;
            let dest = call.path[call.path.len() - 1];
            ledger.credit_token(dest, call.to, amount_out)?;
            Ok(amounts)
        })
    }

    async fn swap_exact_tokens_for_eth(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let router = self.router;
        let wrapped_native = self.wrapped_native;
        self.transact(Operation::Swap, |ledger| {
            ledger.ensure_deadline(call.deadline)?;
            if call.path.last() != Some(&wrapped_native) {
                return Err(ProviderError::InvalidPath);
            }
            let amounts = ledger.amounts_out(call.amount_in, &call.path)?;
            let amount_out = ensure_output(&amounts, call.amount_out_min)?;

            ledger.transfer_from(call.path[0], router, call.sender, router, call.amount_in)?;
            ledger.credit_native(call.to, amount_out)?;
            Ok(amounts)
        })
    }

    async fn swap_exact_tokens_for_tokens(&self, call: SwapCall) -> ProviderResult<Vec<U256>> {
        let router = self.router;
        self.transact(Operation::Swap, |ledger| {
            ledger.ensure_deadline(call.deadline)?;
            let amounts = ledger.amounts_out(call.amount_in, &call.path)?;
            let amount_out = ensure_output(&amounts, call.amount_out_min)?;

            ledger.transfer_from(call.path[0], router, call.sender, router, call.amount_in)?;
            let dest = call.path[call.path.len() - 1];
            ledger.credit_token(dest, call.to, amount_out)?;
            Ok(amounts)
        })
    }
}

#[async_trait]
impl SwapProvider for SimulatedChain {
    fn trade_lock(&self) -> &TradeLock<()> {
        &self.trade_lock
    }

    async fn snapshot(&self) -> Option<SnapshotId> {
        Some(self.take_snapshot())
    }

    async fn revert_to(&self, id: SnapshotId) -> ProviderResult<()> {
        self.revert_snapshot(id)
    }

    async fn release(&self, id: SnapshotId) -> ProviderResult<()> {
        self.release_snapshot(id)
    }
}
