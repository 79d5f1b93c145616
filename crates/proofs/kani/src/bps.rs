//! Kani proofs for basis-point adjustment
//!
//! - **R1: Kill Sentinel** - -10000 bps always yields a zero rate
//! - **R2: Monotone** - a larger bps never yields a smaller rate
//! - **R3: Bounds Checked First** - out-of-range bps fails for any rate
//! - **R4: Wide Division** - `mul_div_floor` agrees with the narrow product

use rate_model::{add_bps, mul_div_floor, ModelError, KILL_BPS, MAX_BPS_ADJUSTMENT, MAX_RATE};

/// R1: kill bps zeroes every in-range rate
#[kani::proof]
#[kani::unwind(3)]
fn r1_kill_bps_zeroes_rate() {
    let rate: u128 = kani::any();
    kani::assume(rate <= MAX_RATE);

    assert_eq!(add_bps(rate, KILL_BPS), Ok(0), "R1: kill bps left a rate");
}

/// R2: add_bps is monotone in bps
#[kani::proof]
#[kani::unwind(3)]
fn r2_monotone_in_bps() {
    let rate: u128 = kani::any();
    let lo: i128 = kani::any();
    let hi: i128 = kani::any();

    kani::assume(rate <= MAX_RATE);
    kani::assume(lo >= KILL_BPS && lo <= hi && hi <= MAX_BPS_ADJUSTMENT);

    let low = add_bps(rate, lo).unwrap();
    let high = add_bps(rate, hi).unwrap();
    assert!(low <= high, "R2: larger bps produced a smaller rate");
}

/// R3: bps range is rejected regardless of the rate
#[kani::proof]
#[kani::unwind(3)]
fn r3_bps_range_checked_first() {
    let rate: u128 = kani::any();
    let bps: i128 = kani::any();
    kani::assume(bps < KILL_BPS || bps > MAX_BPS_ADJUSTMENT);

    assert_eq!(add_bps(rate, bps), Err(ModelError::BpsOutOfRange));
}

/// R4: the 256-bit path matches plain arithmetic when the product fits
#[kani::proof]
#[kani::unwind(130)]
fn r4_mul_div_matches_narrow() {
    let a: u64 = kani::any();
    let b: u64 = kani::any();
    let d: u128 = kani::any();
    kani::assume(d > 0);

    let (a, b) = (a as u128, b as u128);
    assert_eq!(mul_div_floor(a, b, d), Some(a * b / d), "R4: wide path diverged");
}
