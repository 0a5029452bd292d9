//! Per-token balance sheet.
//!
//! One `BalanceSheet` per token, fixed supply minted once at construction.
//! No mint or burn afterwards: every movement is a transfer, so the sum of
//! all balances is invariant for the life of the token.

use std::collections::HashMap;

use lib_types::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::errors::{LaunchpadError, LaunchpadResult};

/// Destination gate consulted on every transfer.
///
/// Before graduation, tokens must not reach the sink's custody address
/// through the ledger; the only sanctioned path is the graduation deposit.
#[derive(Debug, Clone, Copy)]
pub struct TransferGate {
    pub sink_address: Address,
    pub graduated: bool,
}

impl TransferGate {
    pub fn allows(&self, to: &Address) -> bool {
        self.graduated || *to != self.sink_address
    }
}

/// Internal token balances for a single token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    balances: HashMap<Address, Amount>,
}

impl BalanceSheet {
    /// Mint the full fixed supply to `holder`. The only mint this sheet will
    /// ever see; supply conservation holds from here on.
    pub fn with_supply(holder: Address, supply: Amount) -> Self {
        let mut balances = HashMap::new();
        balances.insert(holder, supply);
        Self { balances }
    }

    pub fn balance_of(&self, who: &Address) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    /// Sum of all balances. Equals the minted supply unless a bug broke
    /// conservation; tests lean on this.
    pub fn total(&self) -> Amount {
        self.balances.values().sum()
    }

    /// Move `amount` from `from` to `to`, enforcing the destination gate.
    ///
    /// Checks run in a fixed order and nothing is written until all pass,
    /// so a failed transfer leaves the sheet untouched.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
        gate: TransferGate,
    ) -> LaunchpadResult<()> {
        if from == to {
            return Err(LaunchpadError::SelfTransferNotAllowed);
        }
        if amount == 0 {
            return Err(LaunchpadError::ZeroAmount);
        }
        if !gate.allows(to) {
            return Err(LaunchpadError::PreGraduationSinkTransferForbidden);
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(LaunchpadError::InsufficientBalance { have, need: amount });
        }

        let dest_new = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LaunchpadError::Overflow)?;
        self.balances.insert(*from, have - amount);
        self.balances.insert(*to, dest_new);
        Ok(())
    }
}
