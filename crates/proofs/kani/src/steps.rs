//! Kani proofs for step function evaluation
//!
//! - **S1: Kill Short-Circuit** - reaching a -10000 step always returns -10000
//! - **S2: Bounded Average** - range evaluation stays within its step values
//! - **S3: Truncation** - division rounds toward zero for either sign

use arrayvec::ArrayVec;
use rate_model::{div_trunc, eval_range, KILL_BPS};

/// Two breakpoints with three symbolic values, none of them the kill sentinel
fn symbolic_curve() -> (ArrayVec<i128, 2>, ArrayVec<i128, 3>) {
    let x0: i128 = kani::any();
    let x1: i128 = kani::any();
    kani::assume(-1_000 <= x0 && x0 < x1 && x1 <= 1_000);

    let mut ys = ArrayVec::new();
    for _ in 0..3 {
        let y: i128 = kani::any();
        kani::assume(y > KILL_BPS && y <= 10_000);
        ys.push(y);
    }
    let mut xs = ArrayVec::new();
    xs.push(x0);
    xs.push(x1);
    (xs, ys)
}

/// S1: a range that reaches the final kill step returns the sentinel
#[kani::proof]
#[kani::unwind(5)]
fn s1_kill_step_short_circuits() {
    let (xs, mut ys) = symbolic_curve();
    ys[2] = KILL_BPS;

    let from: i128 = kani::any();
    let to: i128 = kani::any();
    kani::assume(-2_000 <= from && from < to && to <= 2_000);
    kani::assume(to > xs[1]);

    assert_eq!(eval_range(from, to, &xs, &ys), Ok(KILL_BPS), "S1: kill step skipped");
}

/// S2: the weighted average never leaves [min Y, max Y]
#[kani::proof]
#[kani::unwind(5)]
fn s2_range_average_bounded() {
    let (xs, ys) = symbolic_curve();

    let from: i128 = kani::any();
    let to: i128 = kani::any();
    kani::assume(-2_000 <= from && from < to && to <= 2_000);

    let bps = eval_range(from, to, &xs, &ys).unwrap();
    let lo = ys.iter().copied().min().unwrap();
    let hi = ys.iter().copied().max().unwrap();
    assert!(lo <= bps && bps <= hi, "S2: average outside step values");
}

/// S3: div_trunc never floors a negative quotient
#[kani::proof]
#[kani::unwind(3)]
fn s3_division_truncates_toward_zero() {
    let num: i128 = kani::any();
    let den: i128 = kani::any();
    kani::assume(den != 0 && num > -1_000_000 && num < 1_000_000);
    kani::assume(den > -1_000 && den < 1_000);

    let q = div_trunc(num, den).unwrap();
    assert!(q.unsigned_abs() * den.unsigned_abs() <= num.unsigned_abs(), "S3: rounded away from zero");
    assert!(q == 0 || (q < 0) == ((num < 0) != (den < 0)), "S3: sign flipped");
}
