//! Trading-fee computation and treasury accrual.
//!
//! All splits are exact: `creator + treasury == fee` for every input, with
//! integer-division remainders assigned to the treasury. This is the single
//! source of truth for fee math; trading and graduation code never computes
//! a split inline.

use std::collections::HashMap;

use lib_types::{Address, Amount, Bps, MAX_BPS};
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};

/// Fee taken from `amount` at `bps` basis points, rounded down.
pub fn trade_fee(amount: Amount, bps: Bps) -> Amount {
    amount.saturating_mul(bps as Amount) / MAX_BPS as Amount
}

/// Exact division of one fee between creator and treasury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub creator: Amount,
    pub treasury: Amount,
}

/// Split `fee` by the creator's share; the rounding remainder goes to the
/// treasury.
pub fn split_trade_fee(fee: Amount, creator_share_bps: Bps) -> FeeSplit {
    let creator = fee.saturating_mul(creator_share_bps as Amount) / MAX_BPS as Amount;
    FeeSplit { creator, treasury: fee - creator }
}

// ============================================================================
// ACCRUAL LEDGER
// ============================================================================

/// ETH owed to platform-level beneficiaries (the treasury), accrued on every
/// trade and graduation, released only through an explicit claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeLedger {
    accrued: HashMap<Address, Amount>,
    total_collected: Amount,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, beneficiary: Address, amount: Amount) {
        if amount == 0 {
            return;
        }
        let entry = self.accrued.entry(beneficiary).or_insert(0);
        *entry = entry.saturating_add(amount);
        self.total_collected = self.total_collected.saturating_add(amount);
    }

    pub fn accrued_for(&self, beneficiary: &Address) -> Amount {
        self.accrued.get(beneficiary).copied().unwrap_or(0)
    }

    /// Lifetime total credited, including amounts already claimed.
    pub fn total_collected(&self) -> Amount {
        self.total_collected
    }

    /// Zero out and return the beneficiary's accrued balance.
    pub fn claim(&mut self, beneficiary: &Address) -> LaunchpadResult<Amount> {
        match self.accrued.remove(beneficiary) {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(LaunchpadError::NothingToClaim),
        }
    }
}
