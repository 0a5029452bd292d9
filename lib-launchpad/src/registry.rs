//! Token registry entries and identifier derivation.

use lib_types::{Address, Amount, TokenId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::{TokenConfig, TokenState};
use crate::ledger::BalanceSheet;

/// Everything the engine tracks for one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub config: TokenConfig,
    pub state: TokenState,
    pub balances: BalanceSheet,
}

impl TokenEntry {
    /// Fresh entry with the curve's full supply in engine custody.
    pub fn new(id: TokenId, config: TokenConfig, total_supply: Amount) -> Self {
        Self {
            config,
            state: TokenState::default(),
            balances: BalanceSheet::with_supply(custody_address(&id), total_supply),
        }
    }

    /// Graduation eligibility: enough ETH collected and not already latched.
    pub fn is_graduation_eligible(&self) -> bool {
        !self.state.graduated && self.state.eth_collected >= self.config.graduation_threshold
    }
}

/// Read-only snapshot handed out by lookup operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub id: TokenId,
    pub config: TokenConfig,
    pub state: TokenState,
}

impl TokenInfo {
    /// JSON form for indexers and monitoring.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Deterministic token identifier: hash of creator, symbol, and a
/// per-platform creation nonce. The nonce keeps repeated launches of the
/// same symbol by the same creator distinct.
pub fn derive_token_id(creator: &Address, symbol: &str, nonce: u64) -> TokenId {
    let mut hasher = Sha256::new();
    hasher.update(b"launchpad-token-v1");
    hasher.update(creator.as_bytes());
    hasher.update(symbol.as_bytes());
    hasher.update(nonce.to_be_bytes());
    TokenId::new(hasher.finalize().into())
}

/// Custody address holding a token's unsold reserve; derived from the token
/// id so no key material exists for it.
pub fn custody_address(id: &TokenId) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"launchpad-custody-v1");
    hasher.update(id.as_bytes());
    Address::new(hasher.finalize().into())
}
