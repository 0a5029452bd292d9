//! The pricing capability every launchpad curve implements.

use lib_types::Amount;
use thiserror::Error;

/// Error during curve evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("ETH reserve outside curve domain: {eth_reserve} > ceiling {ceiling}")]
    DomainExceeded { eth_reserve: Amount, ceiling: Amount },

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid curve shape: {0}")]
    InvalidShape(&'static str),
}

/// Result type for curve operations
pub type CurveResult<T> = Result<T, CurveError>;

/// A deterministic pricing function relating accumulated ETH reserve to
/// token reserve.
///
/// Implementations are stateless and shared read-only across every token
/// that references them; the sufficient summary of a token's position on
/// the curve is its `eth_reserve` alone.
///
/// # Rounding contract
///
/// Both quote directions must be derived from the same reserve function and
/// must round *against* the trader: `tokens_for_eth` rounds token output
/// down, `eth_for_tokens` rounds ETH output down. Buying then immediately
/// selling the proceeds therefore never returns more ETH than was spent.
pub trait BondingCurve: Send + Sync {
    /// Token-side reserve implied by an ETH-side reserve.
    fn token_reserve(&self, eth_reserve: Amount) -> CurveResult<Amount>;

    /// Tokens released for `eth_in` ETH added at reserve position `eth_reserve`.
    fn tokens_for_eth(&self, eth_reserve: Amount, eth_in: Amount) -> CurveResult<Amount>;

    /// ETH released for `tokens_in` tokens returned at reserve position `eth_reserve`.
    fn eth_for_tokens(&self, eth_reserve: Amount, tokens_in: Amount) -> CurveResult<Amount>;

    /// Largest ETH reserve for which the curve is defined.
    ///
    /// Every operation whose end position would exceed this fails with
    /// [`CurveError::DomainExceeded`].
    fn eth_reserve_ceiling(&self) -> Amount;

    /// Token reserve at `eth_reserve == 0`, i.e. the full supply the curve
    /// was shaped for.
    fn total_supply(&self) -> Amount;
}
