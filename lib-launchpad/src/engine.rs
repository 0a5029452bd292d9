//! The launchpad engine: registry, trading, and graduation behind one
//! thread-safe facade.
//!
//! Locking model: a coarse map of tokens under `RwLock`, one `Mutex` per
//! token entry. Operations on different tokens proceed in parallel;
//! operations on one token serialize. The per-token lock is held across the
//! sink call during graduation, which is what makes the graduation latch an
//! effective re-entrancy guard.
//!
//! Lock order is always: token map, token entry, sink, fee ledger. Nothing
//! acquires them in any other order, so the engine cannot deadlock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use lib_curve::BondingCurve;
use lib_types::{Address, Amount, Bps, CurveId, SinkId, Timestamp, TokenId};
use tracing::{debug, info};

use crate::config::{GlobalConfig, TokenConfig, TokenDefaults};
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::fees::FeeLedger;
use crate::graduation::{execute_graduation, GraduationReceipt};
use crate::ledger::TransferGate;
use crate::registry::{derive_token_id, TokenEntry, TokenInfo};
use crate::sink::LiquiditySink;
use crate::trading::{self, TradeQuote, TradeReceipt};

/// Recover the guard on a poisoned lock; all protected state is kept
/// consistent by value-level checks, not by panic-freedom.
fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Token-launch platform engine.
pub struct Launchpad {
    config: RwLock<GlobalConfig>,
    curves: RwLock<HashMap<CurveId, Arc<dyn BondingCurve>>>,
    sinks: RwLock<HashMap<SinkId, Arc<Mutex<Box<dyn LiquiditySink>>>>>,
    tokens: RwLock<HashMap<TokenId, Arc<Mutex<TokenEntry>>>>,
    fees: Mutex<FeeLedger>,
    creation_nonce: AtomicU64,
}

impl Launchpad {
    pub fn new(admin: Address, treasury: Address) -> Self {
        Self {
            config: RwLock::new(GlobalConfig::new(admin, treasury)),
            curves: RwLock::new(HashMap::new()),
            sinks: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            fees: Mutex::new(FeeLedger::new()),
            creation_nonce: AtomicU64::new(0),
        }
    }

    // ------------------------------------------------------------------
    // admin
    // ------------------------------------------------------------------

    /// Register a bonding curve on the allow-list.
    pub fn allow_curve(
        &self,
        caller: &Address,
        id: CurveId,
        curve: Arc<dyn BondingCurve>,
    ) -> LaunchpadResult<()> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.require_admin(caller)?;
        config.allowed_curves.insert(id);
        self.curves
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, curve);
        info!(curve = id.0, "curve allow-listed");
        Ok(())
    }

    /// Register a liquidity sink on the allow-list.
    pub fn allow_sink(
        &self,
        caller: &Address,
        id: SinkId,
        sink: Box<dyn LiquiditySink>,
    ) -> LaunchpadResult<()> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.require_admin(caller)?;
        config.allowed_sinks.insert(id);
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(sink)));
        info!(sink = id.0, "sink allow-listed");
        Ok(())
    }

    /// Update default graduation parameters for tokens created from now on.
    pub fn set_default_threshold(
        &self,
        caller: &Address,
        graduation_threshold: Amount,
        graduation_eth_fee: Amount,
    ) -> LaunchpadResult<()> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.require_admin(caller)?;
        let next = TokenDefaults {
            graduation_threshold,
            graduation_eth_fee,
            ..config.defaults.clone()
        };
        next.validate()?;
        config.defaults = next;
        Ok(())
    }

    /// Update default fee parameters for tokens created from now on.
    pub fn set_default_fees(
        &self,
        caller: &Address,
        buy_fee_bps: Bps,
        sell_fee_bps: Bps,
        creator_fee_share_bps: Bps,
    ) -> LaunchpadResult<()> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.require_admin(caller)?;
        let next = TokenDefaults {
            buy_fee_bps,
            sell_fee_bps,
            creator_fee_share_bps,
            ..config.defaults.clone()
        };
        next.validate()?;
        config.defaults = next;
        Ok(())
    }

    // ------------------------------------------------------------------
    // token creation and lookup
    // ------------------------------------------------------------------

    /// Create a new token. Its configuration is frozen from the current
    /// defaults; the curve's full supply starts in engine custody.
    pub fn create_token(
        &self,
        creator: &Address,
        name: &str,
        symbol: &str,
        metadata_uri: &str,
        curve: CurveId,
        sink: SinkId,
    ) -> LaunchpadResult<TokenId> {
        let (defaults, sink_arc, total_supply) = {
            let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if !config.allowed_curves.contains(&curve) {
                return Err(LaunchpadError::InvalidCurve(curve));
            }
            if !config.allowed_sinks.contains(&sink) {
                return Err(LaunchpadError::InvalidSink(sink));
            }
            let curves = self.curves.read().unwrap_or_else(PoisonError::into_inner);
            let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
            let curve_impl = curves.get(&curve).ok_or(LaunchpadError::InvalidCurve(curve))?;
            let sink_arc = sinks
                .get(&sink)
                .ok_or(LaunchpadError::InvalidSink(sink))?
                .clone();
            (config.defaults.clone(), sink_arc, curve_impl.total_supply())
        };
        let sink_address = lock(&sink_arc).address();

        let token_config = TokenConfig {
            name: name.to_string(),
            symbol: symbol.to_string(),
            metadata_uri: metadata_uri.to_string(),
            creator: *creator,
            curve,
            sink,
            sink_address,
            graduation_threshold: defaults.graduation_threshold,
            graduation_eth_fee: defaults.graduation_eth_fee,
            buy_fee_bps: defaults.buy_fee_bps,
            sell_fee_bps: defaults.sell_fee_bps,
            creator_fee_share_bps: defaults.creator_fee_share_bps,
        };
        token_config.validate()?;

        let nonce = self.creation_nonce.fetch_add(1, Ordering::Relaxed);
        let id = derive_token_id(creator, symbol, nonce);
        let entry = TokenEntry::new(id, token_config, total_supply);
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(entry)));

        info!(token = %id, %creator, symbol, "token created");
        Ok(id)
    }

    fn entry(&self, token: TokenId) -> LaunchpadResult<Arc<Mutex<TokenEntry>>> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token)
            .cloned()
            .ok_or(LaunchpadError::TokenNotFound(token))
    }

    fn curve_for(&self, id: CurveId) -> LaunchpadResult<Arc<dyn BondingCurve>> {
        self.curves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(LaunchpadError::InvalidCurve(id))
    }

    fn treasury(&self) -> Address {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .treasury
    }

    /// Config and state snapshot for one token.
    pub fn token_info(&self, token: TokenId) -> LaunchpadResult<TokenInfo> {
        let entry = self.entry(token)?;
        let guard = lock(&entry);
        Ok(TokenInfo {
            id: token,
            config: guard.config.clone(),
            state: guard.state.clone(),
        })
    }

    pub fn balance_of(&self, token: TokenId, who: &Address) -> LaunchpadResult<Amount> {
        let entry = self.entry(token)?;
        let guard = lock(&entry);
        Ok(guard.balances.balance_of(who))
    }

    pub fn is_graduation_eligible(&self, token: TokenId) -> LaunchpadResult<bool> {
        let entry = self.entry(token)?;
        let guard = lock(&entry);
        Ok(guard.is_graduation_eligible())
    }

    // ------------------------------------------------------------------
    // trading
    // ------------------------------------------------------------------

    pub fn quote_buy(&self, token: TokenId, eth_in: Amount) -> LaunchpadResult<TradeQuote> {
        let entry = self.entry(token)?;
        let guard = lock(&entry);
        let curve = self.curve_for(guard.config.curve)?;
        trading::quote_buy(&guard, curve.as_ref(), eth_in)
    }

    pub fn quote_sell(
        &self,
        token: TokenId,
        token_amount: Amount,
    ) -> LaunchpadResult<TradeQuote> {
        let entry = self.entry(token)?;
        let guard = lock(&entry);
        let curve = self.curve_for(guard.config.curve)?;
        trading::quote_sell(&guard, curve.as_ref(), token_amount)
    }

    pub fn buy(
        &self,
        buyer: &Address,
        token: TokenId,
        eth_in: Amount,
        min_tokens_out: Amount,
        deadline: Timestamp,
    ) -> LaunchpadResult<TradeReceipt> {
        self.buy_at(now_unix(), buyer, token, eth_in, min_tokens_out, deadline)
    }

    /// `buy` with an explicit clock, for deterministic tests.
    pub fn buy_at(
        &self,
        now: Timestamp,
        buyer: &Address,
        token: TokenId,
        eth_in: Amount,
        min_tokens_out: Amount,
        deadline: Timestamp,
    ) -> LaunchpadResult<TradeReceipt> {
        let entry = self.entry(token)?;
        let mut guard = lock(&entry);
        let curve = self.curve_for(guard.config.curve)?;
        let receipt = trading::execute_buy(
            token,
            &mut guard,
            curve.as_ref(),
            *buyer,
            eth_in,
            min_tokens_out,
            deadline,
            now,
        )?;
        lock(&self.fees).credit(self.treasury(), receipt.fee_split.treasury);
        debug!(
            token = %token,
            trader = %buyer,
            eth_in,
            tokens_out = receipt.token_amount,
            "buy executed"
        );
        Ok(receipt)
    }

    pub fn sell(
        &self,
        seller: &Address,
        token: TokenId,
        token_amount: Amount,
        min_eth_out: Amount,
        deadline: Timestamp,
    ) -> LaunchpadResult<TradeReceipt> {
        self.sell_at(now_unix(), seller, token, token_amount, min_eth_out, deadline)
    }

    /// `sell` with an explicit clock, for deterministic tests.
    pub fn sell_at(
        &self,
        now: Timestamp,
        seller: &Address,
        token: TokenId,
        token_amount: Amount,
        min_eth_out: Amount,
        deadline: Timestamp,
    ) -> LaunchpadResult<TradeReceipt> {
        let entry = self.entry(token)?;
        let mut guard = lock(&entry);
        let curve = self.curve_for(guard.config.curve)?;
        let receipt = trading::execute_sell(
            token,
            &mut guard,
            curve.as_ref(),
            *seller,
            token_amount,
            min_eth_out,
            deadline,
            now,
        )?;
        lock(&self.fees).credit(self.treasury(), receipt.fee_split.treasury);
        debug!(
            token = %token,
            trader = %seller,
            tokens_in = token_amount,
            eth_out = receipt.eth_net,
            "sell executed"
        );
        Ok(receipt)
    }

    /// User-level token transfer, subject to the pre-graduation sink gate.
    pub fn transfer(
        &self,
        token: TokenId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> LaunchpadResult<()> {
        let entry = self.entry(token)?;
        let mut guard = lock(&entry);
        let gate = TransferGate {
            sink_address: guard.config.sink_address,
            graduated: guard.state.graduated,
        };
        guard.balances.transfer(from, to, amount, gate)
    }

    // ------------------------------------------------------------------
    // graduation
    // ------------------------------------------------------------------

    /// Graduate an eligible token. Permissionless: anyone may trigger it
    /// once the threshold is met.
    pub fn graduate(&self, token: TokenId) -> LaunchpadResult<GraduationReceipt> {
        let entry = self.entry(token)?;
        let mut guard = lock(&entry);
        let sink_arc = {
            let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
            sinks
                .get(&guard.config.sink)
                .ok_or(LaunchpadError::InvalidSink(guard.config.sink))?
                .clone()
        };
        let mut sink = lock(&sink_arc);
        let (receipt, treasury_credit) =
            execute_graduation(token, &mut guard, sink.as_mut())?;
        lock(&self.fees).credit(self.treasury(), treasury_credit);
        info!(
            token = %token,
            eth_for_liquidity = receipt.eth_for_liquidity,
            tokens_to_sink = receipt.tokens_to_sink,
            "token graduated"
        );
        Ok(receipt)
    }

    // ------------------------------------------------------------------
    // fee claims
    // ------------------------------------------------------------------

    /// Pay out the creator's accrued trading fees. Creator only.
    pub fn claim_creator_fees(
        &self,
        caller: &Address,
        token: TokenId,
    ) -> LaunchpadResult<Amount> {
        let entry = self.entry(token)?;
        let mut guard = lock(&entry);
        if guard.config.creator != *caller {
            return Err(LaunchpadError::CallerIsNotCreator);
        }
        let amount = guard.state.creator_fees_accrued;
        if amount == 0 {
            return Err(LaunchpadError::NothingToClaim);
        }
        guard.state.creator_fees_accrued = 0;
        info!(token = %token, amount, "creator fees claimed");
        Ok(amount)
    }

    /// Pay out the treasury's accrued fees. Admin only.
    pub fn claim_treasury_fees(&self, caller: &Address) -> LaunchpadResult<Amount> {
        let treasury = {
            let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
            config.require_admin(caller)?;
            config.treasury
        };
        let amount = lock(&self.fees).claim(&treasury)?;
        info!(amount, "treasury fees claimed");
        Ok(amount)
    }

    /// Treasury fees accrued and not yet claimed.
    pub fn treasury_accrued(&self) -> Amount {
        let treasury = self.treasury();
        lock(&self.fees).accrued_for(&treasury)
    }
}

fn now_unix() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
