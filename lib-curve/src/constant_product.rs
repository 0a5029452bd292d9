//! Constant-Product Bonding Curve
//!
//! Token reserve as a closed form of the ETH reserve:
//!
//! ```text
//! t(e) = K / (e + E0) - T0        with  K = (TOTAL_SUPPLY + T0) * E0
//! ```
//!
//! The shape constants `K`, `T0`, `E0` are fixed at deployment and shared by
//! every token using the curve. The `K` identity above pins `t(0)` to the
//! total supply exactly, so the curve starts with the entire supply on the
//! token side and releases it as ETH accumulates.
//!
//! # Quote Formulas
//!
//! Both directions are derived algebraically from `t(e)`:
//!
//! ```text
//! buy:   tokens_out = K * dx / ((e + E0) * (e + E0 + dx))      (floor)
//! sell:  eth_out    = (e + E0) - ceil(K / (K/(e + E0) + dt))   (floor)
//! ```
//!
//! Floor on the buy side and the inner ceiling on the sell side both round
//! in the protocol's favor, so a buy/sell round trip can never extract more
//! ETH than was deposited.
//!
//! # Domain
//!
//! The curve is defined for `e <= ceiling` where `ceiling = K/T0 - E0` is
//! the point at which the token reserve reaches zero (~33.76 ETH for the
//! canonical constants). Within that range every U256 intermediate fits:
//! `K * dx < 2^152 * 2^66` and `(e + E0)^2 < 2^134`.

use lib_types::{Amount, WAD};
use serde::{Deserialize, Serialize};
use uint::construct_uint;

use crate::curve::{BondingCurve, CurveError, CurveResult};

construct_uint! {
    /// 256-bit unsigned integer for curve intermediates
    pub(crate) struct U256(4);
}

// =============================================================================
// CANONICAL SHAPE CONSTANTS
// =============================================================================

/// Fixed total supply every curve instance is shaped for: 1B tokens at 1e18
pub const CANONICAL_TOTAL_SUPPLY: Amount = 1_000_000_000 * WAD;

/// Canonical token-side offset
pub const CANONICAL_T0: Amount = 91_849_411_764_705_882_352_941_171;

/// Canonical ETH-side offset (~3.1009 ETH)
pub const CANONICAL_E0: Amount = 3_100_900_000_000_000_000;

// =============================================================================
// CURVE
// =============================================================================

/// Constant-product launch curve.
///
/// Stores only the u128 shape parameters; `K` is recomputed from the
/// identity `K = (total_supply + t0) * e0`, which makes `t(0) == total_supply`
/// hold by construction rather than by configuration discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductCurve {
    total_supply: Amount,
    t0: Amount,
    e0: Amount,
    /// ETH reserve at which the token reserve reaches zero
    ceiling: Amount,
}

impl ConstantProductCurve {
    /// Build a curve from its shape parameters.
    pub fn new(total_supply: Amount, t0: Amount, e0: Amount) -> CurveResult<Self> {
        if total_supply == 0 || t0 == 0 || e0 == 0 {
            return Err(CurveError::InvalidShape("shape parameters must be positive"));
        }
        let k = k_from(total_supply, t0, e0).ok_or(CurveError::Overflow)?;
        // ceiling = K/T0 - E0, the zero-crossing of the token reserve
        let ceiling = narrow(k / U256::from(t0))?
            .checked_sub(e0)
            .ok_or(CurveError::InvalidShape("t0 too large for e0"))?;
        Ok(Self { total_supply, t0, e0, ceiling })
    }

    /// The curve deployed on mainnet: 1B supply, graduation band near 8 ETH.
    pub fn canonical() -> Self {
        // Canonical constants always satisfy `new`'s checks.
        Self::new(CANONICAL_TOTAL_SUPPLY, CANONICAL_T0, CANONICAL_E0)
            .unwrap_or_else(|_| unreachable!("canonical constants are valid"))
    }

    fn k(&self) -> U256 {
        // Cannot overflow: validated in `new`
        (U256::from(self.total_supply) + U256::from(self.t0)) * U256::from(self.e0)
    }

    fn check_domain(&self, eth_reserve: Amount) -> CurveResult<()> {
        if eth_reserve > self.ceiling {
            return Err(CurveError::DomainExceeded {
                eth_reserve,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }
}

impl BondingCurve for ConstantProductCurve {
    fn token_reserve(&self, eth_reserve: Amount) -> CurveResult<Amount> {
        self.check_domain(eth_reserve)?;
        let s = U256::from(eth_reserve) + U256::from(self.e0);
        let r = (self.k() / s)
            .checked_sub(U256::from(self.t0))
            .ok_or(CurveError::DomainExceeded {
                eth_reserve,
                ceiling: self.ceiling,
            })?;
        narrow(r)
    }

    fn tokens_for_eth(&self, eth_reserve: Amount, eth_in: Amount) -> CurveResult<Amount> {
        if eth_in == 0 {
            return Err(CurveError::ZeroAmount);
        }
        let end = eth_reserve.checked_add(eth_in).ok_or(CurveError::Overflow)?;
        self.check_domain(end)?;

        // tokens_out = K*dx / (s * (s + dx)), floor
        let s = U256::from(eth_reserve) + U256::from(self.e0);
        let s_end = U256::from(end) + U256::from(self.e0);
        let num = self
            .k()
            .checked_mul(U256::from(eth_in))
            .ok_or(CurveError::Overflow)?;
        let den = s.checked_mul(s_end).ok_or(CurveError::Overflow)?;
        narrow(num / den)
    }

    fn eth_for_tokens(&self, eth_reserve: Amount, tokens_in: Amount) -> CurveResult<Amount> {
        if tokens_in == 0 {
            return Err(CurveError::ZeroAmount);
        }
        self.check_domain(eth_reserve)?;

        // eth_out = s - ceil(K / (K/s + dt)), floor overall
        let k = self.k();
        let s = U256::from(eth_reserve) + U256::from(self.e0);
        let token_virtual = k / s;
        let d = token_virtual
            .checked_add(U256::from(tokens_in))
            .ok_or(CurveError::Overflow)?;
        let new_s = ceil_div(k, d);
        if new_s >= s {
            // dust sale below quantization: releases nothing
            return Ok(0);
        }
        narrow(s - new_s)
    }

    fn eth_reserve_ceiling(&self) -> Amount {
        self.ceiling
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }
}

// =============================================================================
// U256 HELPERS
// =============================================================================

fn k_from(total_supply: Amount, t0: Amount, e0: Amount) -> Option<U256> {
    (U256::from(total_supply) + U256::from(t0)).checked_mul(U256::from(e0))
}

fn ceil_div(n: U256, d: U256) -> U256 {
    let q = n / d;
    if n % d > U256::zero() {
        q + U256::one()
    } else {
        q
    }
}

fn narrow(value: U256) -> CurveResult<Amount> {
    if value > U256::from(u128::MAX) {
        return Err(CurveError::Overflow);
    }
    Ok(value.as_u128())
}
