//! Bonding-Curve Pricing (Pure Functions)
//!
//! Deterministic price discovery for launchpad tokens before graduation.
//!
//! # Design Principles
//!
//! 1. **Pure functions** - No side effects, no global state
//! 2. **Deterministic** - Same inputs produce identical outputs across all platforms
//! 3. **No floats** - All arithmetic uses u128/U256 integers
//! 4. **Closed domain** - Every operation is rejected outside the curve's
//!    documented ETH-reserve range instead of relying on incidental overflow
//!
//! # The Reserve Function
//!
//! The token-side reserve is always *derived* from the ETH-side reserve via
//! the curve's closed form. Callers never track the two independently, so
//! the pair cannot drift out of sync across repeated buy/sell operations.
//!
//! # Usage
//!
//! ```
//! use lib_curve::{BondingCurve, ConstantProductCurve};
//! use lib_types::WAD;
//!
//! let curve = ConstantProductCurve::canonical();
//! let tokens = curve.tokens_for_eth(0, WAD).unwrap();
//! let eth_back = curve.eth_for_tokens(WAD, tokens).unwrap();
//! assert!(eth_back <= WAD);
//! ```

pub mod constant_product;
pub mod curve;

#[cfg(test)]
mod golden_vectors;

pub use constant_product::ConstantProductCurve;
pub use curve::{BondingCurve, CurveError, CurveResult};
