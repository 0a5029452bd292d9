//! Launchpad error types.
//!
//! Every economic constraint gets its own variant so callers (and tests) can
//! distinguish "you asked for too much" from "the system is in the wrong
//! state" without string matching.

use lib_curve::CurveError;
use lib_types::{Amount, Bps, CurveId, SinkId, Timestamp, TokenId};
use thiserror::Error;

use crate::sink::SinkError;

/// Error during launchpad operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    // ---- input validation ----
    #[error("Token name or symbol is empty or too long")]
    InvalidNameOrSymbol,

    #[error("Curve {0:?} is not on the allow-list")]
    InvalidCurve(CurveId),

    #[error("Liquidity sink {0:?} is not on the allow-list")]
    InvalidSink(SinkId),

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Deadline expired: now {now} > deadline {deadline}")]
    DeadlineExpired { now: Timestamp, deadline: Timestamp },

    #[error("Fee {bps} bps exceeds cap {cap} bps")]
    FeeTooHigh { bps: Bps, cap: Bps },

    #[error("Graduation threshold must exceed the graduation fee")]
    InvalidGraduationConfig,

    // ---- economic constraints ----
    #[error("Slippage tolerance exceeded: got {got}, minimum {min}")]
    SlippageExceeded { got: Amount, min: Amount },

    #[error("Insufficient token reserve in custody: have {have}, need {need}")]
    InsufficientReserve { have: Amount, need: Amount },

    #[error("Insufficient ETH reserves: have {have}, need {need}")]
    InsufficientEthReserves { have: Amount, need: Amount },

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Self transfers are not allowed")]
    SelfTransferNotAllowed,

    #[error("Transfers to the liquidity sink are forbidden before graduation")]
    PreGraduationSinkTransferForbidden,

    // ---- lifecycle ----
    #[error("Graduation criteria not met: collected {collected}, threshold {threshold}")]
    GraduationCriteriaNotMet { collected: Amount, threshold: Amount },

    #[error("Token has already graduated")]
    AlreadyGraduated,

    // ---- fee claims ----
    #[error("Caller is not the token creator")]
    CallerIsNotCreator,

    #[error("Nothing to claim")]
    NothingToClaim,

    // ---- authorization / lookup ----
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Token not found: {0:?}")]
    TokenNotFound(TokenId),

    // ---- numeric ----
    #[error("Arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Curve(#[from] CurveError),

    // ---- external collaborators ----
    #[error("Liquidity sink deposit failed: {0}")]
    SinkDepositFailed(#[from] SinkError),
}

/// Result type for launchpad operations
pub type LaunchpadResult<T> = Result<T, LaunchpadError>;
