//! Liquidity-sink boundary.
//!
//! A sink is the external venue that receives a token's remaining reserve
//! and collected ETH at graduation (an AMM pool, a vault, an escrow). The
//! engine depends only on this trait; everything behind it is someone
//! else's problem.

use lib_types::{Address, Amount, TokenId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by a liquidity sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Sink rejected the deposit: {0}")]
    DepositRejected(String),

    #[error("Sink is unavailable")]
    Unavailable,
}

/// Receipt returned by a sink once a deposit has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkDepositReceipt {
    pub token: TokenId,
    pub token_amount: Amount,
    pub eth_amount: Amount,
}

/// The one collaborator interface the economic core calls out to.
///
/// # Contract
///
/// * `deposit_liquidity` is invoked at most once per token over its whole
///   lifetime; implementations may rely on that.
/// * Failure must be reported structurally via `Err` - a sink must never
///   silently drop a deposit, since the engine rolls the graduation back
///   on error.
pub trait LiquiditySink: Send {
    /// Address the sink takes custody at. Token transfers to this address
    /// are blocked until the token has graduated.
    fn address(&self) -> Address;

    /// Accept the graduation deposit for `token`.
    fn deposit_liquidity(
        &mut self,
        token: TokenId,
        token_amount: Amount,
        eth_amount: Amount,
    ) -> Result<SinkDepositReceipt, SinkError>;
}
