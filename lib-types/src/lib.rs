//! Launchpad primitives.
//! Stable, protocol-neutral, behavior-free.
//!
//! Rule: No String identifiers in economic state. Ever.

pub mod primitives;

pub use primitives::{
    Address, Amount, Bps, CurveId, SinkId, Timestamp, TokenId, MAX_BPS, WAD,
};
