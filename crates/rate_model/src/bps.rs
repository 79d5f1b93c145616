//! Basis-point adjustment of fixed-point rates

use crate::{ModelError, Result, BPS_SCALE, KILL_BPS, MAX_BPS_ADJUSTMENT, MAX_RATE};

/// Bounds checked by `add_bps` before multiplying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpsLimits {
    /// Largest rate accepted
    pub max_rate: u128,
    /// Largest positive bps accepted
    pub max_bps: i128,
}

impl BpsLimits {
    pub const DEFAULT: Self = Self {
        max_rate: MAX_RATE,
        max_bps: MAX_BPS_ADJUSTMENT,
    };
}

impl Default for BpsLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `rate * (10000 + bps) / 10000` under the default limits
pub fn add_bps(rate: u128, bps: i128) -> Result<u128> {
    add_bps_with(BpsLimits::DEFAULT, rate, bps)
}

/// `rate * (10000 + bps) / 10000`, rounding down
///
/// # Errors
/// * `BpsOutOfRange` if `bps < -10000` or `bps > limits.max_bps`
/// * `RateOutOfRange` if `rate > limits.max_rate`
/// * `Overflow` if the product does not fit (only reachable with custom limits)
pub fn add_bps_with(limits: BpsLimits, rate: u128, bps: i128) -> Result<u128> {
    if bps < KILL_BPS || bps > limits.max_bps {
        return Err(ModelError::BpsOutOfRange);
    }
    if rate > limits.max_rate {
        return Err(ModelError::RateOutOfRange);
    }

    // bps >= -10000, so the factor is never negative
    let factor = BPS_SCALE.checked_add(bps).ok_or(ModelError::Overflow)? as u128;
    let scaled = rate.checked_mul(factor).ok_or(ModelError::Overflow)?;
    Ok(scaled / BPS_SCALE as u128)
}

// ============================================================================
// Wide multiply-divide
// ============================================================================

/// `floor(a * b / d)` with a 256-bit intermediate product
///
/// Returns `None` if `d == 0` or the quotient does not fit in a u128.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some(product / d);
    }

    let (hi, lo) = widening_mul(a, b);
    if hi >= d {
        return None;
    }

    // Restoring long division, one bit of `lo` at a time; `rem < d` throughout
    let mut rem = hi;
    let mut quot: u128 = 0;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        quot <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1;
        }
    }
    Some(quot)
}

/// Full 256-bit product as `(high, low)` halves
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (ll & MASK) | ((mid & MASK) << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}


#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// B1: add_bps never increases the rate for non-positive bps
    #[kani::proof]
    #[kani::unwind(3)]
    fn b1_discount_never_increases_rate() {
        let rate: u128 = kani::any();
        let bps: i128 = kani::any();

        kani::assume(rate <= MAX_RATE);
        kani::assume(bps >= KILL_BPS && bps <= 0);

        let adjusted = add_bps(rate, bps).unwrap();
        assert!(adjusted <= rate, "B1: discount increased rate");
    }

    /// B2: every in-range input succeeds
    #[kani::proof]
    #[kani::unwind(3)]
    fn b2_in_range_never_fails() {
        let rate: u128 = kani::any();
        let bps: i128 = kani::any();

        kani::assume(rate <= MAX_RATE);
        kani::assume(bps >= KILL_BPS && bps <= MAX_BPS_ADJUSTMENT);

        assert!(add_bps(rate, bps).is_ok(), "B2: in-range add_bps failed");
    }
}
