//! Platform and per-token configuration.
//!
//! Platform defaults are mutable (admin-only) and copied into an immutable
//! per-token snapshot at creation time, so changing a default never
//! retroactively reprices live tokens.

use std::collections::HashSet;

use lib_types::{Address, Amount, Bps, CurveId, SinkId, MAX_BPS};
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};

/// Cap on each trading-fee side (30%)
pub const MAX_FEE_BPS: Bps = 3_000;

/// Longest accepted token name
pub const MAX_NAME_LEN: usize = 64;

/// Longest accepted token symbol
pub const MAX_SYMBOL_LEN: usize = 16;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Platform-level defaults applied to every token created after they are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDefaults {
    /// ETH collected at which a token becomes graduation-eligible
    pub graduation_threshold: Amount,
    /// Flat ETH fee carved out of collected ETH at graduation
    pub graduation_eth_fee: Amount,
    pub buy_fee_bps: Bps,
    pub sell_fee_bps: Bps,
    /// Creator's share of each trading fee; remainder goes to the treasury
    pub creator_fee_share_bps: Bps,
}

impl TokenDefaults {
    /// Production defaults: graduate near 7.956 ETH collected, 0.5 ETH
    /// graduation fee, 1% trading fees split evenly with the creator.
    pub fn mainnet() -> Self {
        Self {
            graduation_threshold: 7_956_000_000_000_000_000,
            graduation_eth_fee: 500_000_000_000_000_000,
            buy_fee_bps: 100,
            sell_fee_bps: 100,
            creator_fee_share_bps: 5_000,
        }
    }

    pub fn validate(&self) -> LaunchpadResult<()> {
        for bps in [self.buy_fee_bps, self.sell_fee_bps] {
            if bps > MAX_FEE_BPS {
                return Err(LaunchpadError::FeeTooHigh { bps, cap: MAX_FEE_BPS });
            }
        }
        if self.creator_fee_share_bps > MAX_BPS {
            return Err(LaunchpadError::FeeTooHigh {
                bps: self.creator_fee_share_bps,
                cap: MAX_BPS,
            });
        }
        // A token that could graduate with nothing left for liquidity is
        // misconfigured, not merely unprofitable.
        if self.graduation_threshold <= self.graduation_eth_fee {
            return Err(LaunchpadError::InvalidGraduationConfig);
        }
        Ok(())
    }
}

// ============================================================================
// GLOBAL CONFIG
// ============================================================================

/// Mutable platform state: admin, treasury, defaults, and allow-lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub admin: Address,
    pub treasury: Address,
    pub defaults: TokenDefaults,
    pub allowed_curves: HashSet<CurveId>,
    pub allowed_sinks: HashSet<SinkId>,
}

impl GlobalConfig {
    pub fn new(admin: Address, treasury: Address) -> Self {
        Self {
            admin,
            treasury,
            defaults: TokenDefaults::mainnet(),
            allowed_curves: HashSet::new(),
            allowed_sinks: HashSet::new(),
        }
    }

    pub fn require_admin(&self, caller: &Address) -> LaunchpadResult<()> {
        if *caller != self.admin {
            return Err(LaunchpadError::Unauthorized("admin only"));
        }
        Ok(())
    }
}

// ============================================================================
// PER-TOKEN SNAPSHOT
// ============================================================================

/// Immutable per-token configuration, frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
    pub creator: Address,
    pub curve: CurveId,
    pub sink: SinkId,
    /// Custody address of the sink, snapshotted so later sink re-registration
    /// cannot change which destination the transfer gate blocks
    pub sink_address: Address,
    pub graduation_threshold: Amount,
    pub graduation_eth_fee: Amount,
    pub buy_fee_bps: Bps,
    pub sell_fee_bps: Bps,
    pub creator_fee_share_bps: Bps,
}

impl TokenConfig {
    pub fn validate(&self) -> LaunchpadResult<()> {
        if self.name.is_empty()
            || self.name.len() > MAX_NAME_LEN
            || self.symbol.is_empty()
            || self.symbol.len() > MAX_SYMBOL_LEN
        {
            return Err(LaunchpadError::InvalidNameOrSymbol);
        }
        TokenDefaults {
            graduation_threshold: self.graduation_threshold,
            graduation_eth_fee: self.graduation_eth_fee,
            buy_fee_bps: self.buy_fee_bps,
            sell_fee_bps: self.sell_fee_bps,
            creator_fee_share_bps: self.creator_fee_share_bps,
        }
        .validate()
    }
}

/// Mutable per-token economic state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// Net ETH held against the curve (gross buys minus fees, minus sells)
    pub eth_collected: Amount,
    /// Tokens held outside engine custody
    pub circulating_supply: Amount,
    /// ETH owed to the creator from trading fees, claimable on demand
    pub creator_fees_accrued: Amount,
    /// Terminal latch: once set, trading is closed forever
    pub graduated: bool,
}
