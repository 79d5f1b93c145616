//! Piecewise step functions - Legacy point evaluation and enhanced range evaluation
//!
//! A step function is a list of ascending breakpoints `X` with values `Y` (bps).
//! - Legacy: `len(Y) == len(X)`, evaluated at a single point (`eval_point`)
//! - Enhanced: `len(Y) == len(X) + 1`, evaluated over a range (`eval_range`),
//!   the extra value covering everything beyond the last breakpoint
//!
//! Both modes divide the width-weighted sum with truncation toward zero, so a
//! negative quotient rounds up. The two modes are deliberately kept separate.

use arrayvec::ArrayVec;

use crate::{
    ModelError, Result, IMBALANCE_MAX, KILL_BPS, MAX_ENHANCED_STEPS, MAX_LEGACY_STEPS,
};

// ============================================================================
// Arithmetic helpers
// ============================================================================

/// Integer division truncating toward zero
///
/// Rust's `/` on signed integers truncates (it does not floor), so
/// `-3500 / 300 == -11`. `checked_div` also rejects a zero divisor and
/// `i128::MIN / -1`.
#[inline]
pub fn div_trunc(num: i128, den: i128) -> Result<i128> {
    num.checked_div(den).ok_or(ModelError::Overflow)
}

/// True iff `a * b` does not fit in an i128
#[inline]
pub fn would_overflow_multiply(a: i128, b: i128) -> bool {
    a.checked_mul(b).is_none()
}

/// `acc + width * y` with overflow detection
#[inline]
fn accumulate(acc: i128, width: i128, y: i128) -> Result<i128> {
    width
        .checked_mul(y)
        .and_then(|term| acc.checked_add(term))
        .ok_or(ModelError::Overflow)
}

#[inline]
fn span(hi: i128, lo: i128) -> Result<i128> {
    hi.checked_sub(lo).ok_or(ModelError::Overflow)
}

// ============================================================================
// Evaluation
// ============================================================================

/// Legacy evaluation of a step function at `qty`
///
/// * `qty == 0`: the first `Y[i]` with `X[i] >= 0`, else the last `Y`
/// * `qty > 0`: walk positive breakpoints upward from 0, the residual past
///   the last breakpoint weighted by the last `Y`
/// * `qty < 0`: walk negative breakpoints upward from `qty`; the first
///   non-negative breakpoint's `Y` weights whatever remains
///
/// The weighted sum is divided by `qty`, truncating toward zero.
pub fn eval_point(qty: i128, xs: &[i128], ys: &[i128]) -> Result<i128> {
    if xs.is_empty() {
        return Ok(0);
    }
    if ys.len() != xs.len() {
        return Err(ModelError::StepLengthMismatch);
    }
    let last_y = ys[ys.len() - 1];

    if qty == 0 {
        let y = xs
            .iter()
            .zip(ys)
            .find(|(x, _)| **x >= 0)
            .map_or(last_y, |(_, y)| *y);
        return Ok(y);
    }

    let mut change: i128 = 0;

    if qty > 0 {
        let mut last: i128 = 0;
        for (&x, &y) in xs.iter().zip(ys) {
            if x <= 0 {
                continue;
            }
            if qty <= x {
                change = accumulate(change, qty - last, y)?;
                last = qty;
                break;
            }
            change = accumulate(change, x - last, y)?;
            last = x;
        }
        if qty > last {
            change = accumulate(change, qty - last, last_y)?;
        }
    } else {
        let mut last = qty;
        for (&x, &y) in xs.iter().zip(ys) {
            if x >= 0 {
                change = accumulate(change, last, y)?;
                last = 0;
                break;
            }
            if last < x {
                change = accumulate(change, span(last, x)?, y)?;
                last = x;
            }
        }
        if last < 0 {
            change = accumulate(change, last, last_y)?;
        }
    }

    div_trunc(change, qty)
}

/// Enhanced evaluation of a step function over `[from, to)`
///
/// `ys` carries one more value than `xs`; that final value applies beyond the
/// last breakpoint. Reaching a `-10000` value returns `-10000` immediately.
/// The weighted sum is divided by `to - from`, truncating toward zero.
pub fn eval_range(from: i128, to: i128, xs: &[i128], ys: &[i128]) -> Result<i128> {
    if ys.is_empty() || from == to {
        return Ok(0);
    }
    if ys.len() != xs.len() + 1 {
        return Err(ModelError::StepLengthMismatch);
    }
    let points = xs
        .iter()
        .copied()
        .chain(core::iter::once(IMBALANCE_MAX))
        .zip(ys.iter().copied());
    eval_range_points(from, to, points)
}

/// Range evaluation over `(x, y)` points whose final x is the terminator
fn eval_range_points<I>(from: i128, to: i128, points: I) -> Result<i128>
where
    I: Iterator<Item = (i128, i128)>,
{
    if from == to {
        return Ok(0);
    }
    let width = span(to, from)?;
    let mut cursor = from;
    let mut change: i128 = 0;

    for (x, y) in points {
        if x <= cursor {
            continue;
        }
        if y == KILL_BPS {
            return Ok(KILL_BPS);
        }
        if x >= to {
            change = accumulate(change, span(to, cursor)?, y)?;
            break;
        }
        change = accumulate(change, span(x, cursor)?, y)?;
        cursor = x;
    }

    div_trunc(change, width)
}

// ============================================================================
// Step word codec
// ============================================================================

/// One signed breakpoint pair packed into a 32-byte word
///
/// Layout: bytes 0..16 hold `x`, bytes 16..32 hold `y`, both big-endian
/// two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepWord(pub [u8; 32]);

impl StepWord {
    /// Pack `(x, y)`; magnitudes of 2^127 are rejected
    pub fn encode(x: i128, y: i128) -> Result<Self> {
        if x == i128::MIN || y == i128::MIN {
            return Err(ModelError::Overflow);
        }
        let mut word = [0u8; 32];
        word[..16].copy_from_slice(&x.to_be_bytes());
        word[16..].copy_from_slice(&y.to_be_bytes());
        Ok(Self(word))
    }

    /// Exact inverse of `encode`
    pub fn decode(&self) -> Result<(i128, i128)> {
        let (x, y) = self.split();
        if x == i128::MIN || y == i128::MIN {
            return Err(ModelError::Overflow);
        }
        Ok((x, y))
    }

    fn split(&self) -> (i128, i128) {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&self.0[..16]);
        lo.copy_from_slice(&self.0[16..]);
        (i128::from_be_bytes(hi), i128::from_be_bytes(lo))
    }

    fn x(&self) -> i128 {
        self.split().0
    }

    fn y(&self) -> i128 {
        self.split().1
    }
}

// ============================================================================
// Step mode and validation
// ============================================================================

/// Deployment-wide step function flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepMode {
    /// Point evaluation, separate quantity and imbalance curves
    Legacy,
    /// Range evaluation with kill sentinel, imbalance curves only
    #[default]
    Enhanced,
}

impl StepMode {
    /// Breakpoint ceiling on len(Y)
    pub const fn max_steps(self) -> usize {
        match self {
            StepMode::Legacy => MAX_LEGACY_STEPS,
            StepMode::Enhanced => MAX_ENHANCED_STEPS,
        }
    }

    /// Check the shape and values of a curve for this mode
    ///
    /// `non_negative` additionally requires every breakpoint to be >= 0
    /// (quantity curves).
    pub fn validate(
        self,
        xs: &[i128],
        ys: &[i128],
        max_step_bps: i128,
        non_negative: bool,
    ) -> Result<()> {
        let paired = match self {
            StepMode::Legacy => ys.len() == xs.len(),
            StepMode::Enhanced => ys.len() == xs.len() + 1,
        };
        if !paired {
            return Err(ModelError::StepLengthMismatch);
        }
        if ys.len() > self.max_steps() {
            return Err(ModelError::TooManySteps);
        }
        if xs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ModelError::NonIncreasingSteps);
        }
        if non_negative && xs.iter().any(|x| *x < 0) {
            return Err(ModelError::NegativeStep);
        }
        if self == StepMode::Enhanced && xs.iter().any(|x| *x == IMBALANCE_MAX || *x == i128::MIN)
        {
            return Err(ModelError::ReservedStepX);
        }
        if ys.iter().any(|y| *y < KILL_BPS || *y > max_step_bps) {
            return Err(ModelError::StepValueOutOfRange);
        }
        Ok(())
    }
}

// ============================================================================
// Curves
// ============================================================================

/// Legacy curve: parallel X and Y arrays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyCurve {
    xs: ArrayVec<i128, MAX_LEGACY_STEPS>,
    ys: ArrayVec<i128, MAX_LEGACY_STEPS>,
}

impl LegacyCurve {
    pub fn new(xs: &[i128], ys: &[i128], max_step_bps: i128, non_negative: bool) -> Result<Self> {
        StepMode::Legacy.validate(xs, ys, max_step_bps, non_negative)?;
        let mut curve = Self::default();
        curve
            .xs
            .try_extend_from_slice(xs)
            .map_err(|_| ModelError::TooManySteps)?;
        curve
            .ys
            .try_extend_from_slice(ys)
            .map_err(|_| ModelError::TooManySteps)?;
        Ok(curve)
    }

    pub fn xs(&self) -> &[i128] {
        &self.xs
    }

    pub fn ys(&self) -> &[i128] {
        &self.ys
    }

    pub fn eval(&self, qty: i128) -> Result<i128> {
        eval_point(qty, &self.xs, &self.ys)
    }
}

/// Enhanced curve stored as packed words
///
/// Word `i` holds `(X[i], Y[i])`; the final word holds `(IMBALANCE_MAX, Y[n])`.
/// An empty curve has no words and evaluates to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedCurve {
    words: ArrayVec<StepWord, MAX_ENHANCED_STEPS>,
}

impl PackedCurve {
    pub fn new(xs: &[i128], ys: &[i128], max_step_bps: i128) -> Result<Self> {
        StepMode::Enhanced.validate(xs, ys, max_step_bps, false)?;
        let mut words = ArrayVec::new();
        let xs_terminated = xs.iter().copied().chain(core::iter::once(IMBALANCE_MAX));
        for (x, &y) in xs_terminated.zip(ys) {
            words
                .try_push(StepWord::encode(x, y)?)
                .map_err(|_| ModelError::TooManySteps)?;
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[StepWord] {
        &self.words
    }

    pub fn x_len(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    pub fn y_len(&self) -> usize {
        self.words.len()
    }

    /// Breakpoint `i`, excluding the terminator
    pub fn x(&self, i: usize) -> Option<i128> {
        (i < self.x_len()).then(|| self.words[i].x())
    }

    pub fn y(&self, i: usize) -> Option<i128> {
        self.words.get(i).map(StepWord::y)
    }

    pub fn eval(&self, from: i128, to: i128) -> Result<i128> {
        if self.words.is_empty() {
            return Ok(0);
        }
        eval_range_points(from, to, self.words.iter().map(|w| w.split()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // eval_point
    // ------------------------------------------------------------------------

    #[test]
    fn test_eval_point_empty() {
        assert_eq!(eval_point(100, &[], &[]), Ok(0));
        assert_eq!(eval_point(-100, &[], &[]), Ok(0));
        assert_eq!(eval_point(0, &[], &[]), Ok(0));
    }

    #[test]
    fn test_eval_point_positive_partial_first_step() {
        // (15*8 + 2*30) / 17 = 180 / 17 = 10
        assert_eq!(eval_point(17, &[15, 30, 70], &[8, 30, 70]), Ok(10));
    }

    #[test]
    fn test_eval_point_negative_rounds_toward_zero() {
        let xs = [-200, -100, -50];
        let ys = [-20, -10, -5];
        // 3500 / -300 = -11.67 -> -11
        assert_eq!(eval_point(-300, &xs, &ys), Ok(-11));
        assert_eq!(eval_point(-25, &xs, &ys), Ok(-5));
        assert_eq!(eval_point(-75, &xs, &ys), Ok(-5));
    }

    #[test]
    fn test_eval_point_negative_reaching_non_negative_step() {
        // 3200 / -300 = -10.67 -> -10
        assert_eq!(eval_point(-300, &[-200, -100, -50, 0], &[-20, -10, -5, 1]), Ok(-10));

        let xs = [-200, -100, -50, 10];
        let ys = [-20, -10, -5, 2];
        // 3150 / -300 = -10.5 -> -10
        assert_eq!(eval_point(-300, &xs, &ys), Ok(-10));
        // 650 / -150 = -4.33 -> -4
        assert_eq!(eval_point(-150, &xs, &ys), Ok(-4));
    }

    #[test]
    fn test_eval_point_negative_qty_positive_steps() {
        assert_eq!(eval_point(-100, &[0, 10, 20, 30], &[0, 20, 50, 100]), Ok(0));
        assert_eq!(eval_point(-100, &[10, 20, 30], &[20, 50, 100]), Ok(20));
    }

    #[test]
    fn test_eval_point_zero_qty() {
        assert_eq!(eval_point(0, &[10, 20, 30], &[20, 50, 100]), Ok(20));
        // No breakpoint >= 0: the last Y
        assert_eq!(eval_point(0, &[-100, -50, -30], &[20, 50, 100]), Ok(100));
    }

    #[test]
    fn test_eval_point_beyond_last_step() {
        assert_eq!(eval_point(20, &[-100, -50, -30], &[20, 50, 100]), Ok(100));
        // (10*20 + 20*50 + 10*100) / 40 = 2200 / 40
        assert_eq!(eval_point(40, &[10, 30, 50], &[20, 50, 100]), Ok(55));
        // (10*20 + 20*50 + 90*100) / 120 = 10200 / 120 = 85
        assert_eq!(eval_point(120, &[10, 30, 50], &[20, 50, 100]), Ok(85));
        assert_eq!(
            eval_point(120, &[-100, -50, 10, 30, 150], &[-30, -15, 20, 50, 100]),
            Ok(85)
        );
    }

    #[test]
    fn test_eval_point_length_mismatch() {
        assert_eq!(
            eval_point(5, &[1, 2], &[1]),
            Err(ModelError::StepLengthMismatch)
        );
    }

    #[test]
    fn test_eval_point_overflow_is_error() {
        assert_eq!(
            eval_point(i128::MAX, &[1], &[10_000]),
            Err(ModelError::Overflow)
        );
    }

    // ------------------------------------------------------------------------
    // eval_range
    // ------------------------------------------------------------------------

    #[test]
    fn test_eval_range_negative_steps() {
        let xs = [-200, -100, -50];
        let ys = [-20, -10, -5, -2];
        assert_eq!(eval_range(-400, -300, &xs, &ys), Ok(-20));
        assert_eq!(eval_range(-25, 0, &xs, &ys), Ok(-2));
        // (-25*-5 + 85*-2)... = -245 / 85 = -2.88 -> -2
        assert_eq!(eval_range(-75, 10, &xs, &ys), Ok(-2));
    }

    #[test]
    fn test_eval_range_mixed_steps() {
        // -3225 / 275 = -11.7 -> -11
        assert_eq!(
            eval_range(-300, -25, &[-200, -100, -50, 0], &[-20, -10, -5, 1, 5]),
            Ok(-11)
        );

        let xs = [-200, -100, -50, 10];
        let ys = [-20, -10, -5, 2, 5];
        // -3105 / 315 = -9.86 -> -9
        assert_eq!(eval_range(-300, 15, &xs, &ys), Ok(-9));
        // -580 / 170 = -3.41 -> -3
        assert_eq!(eval_range(-150, 20, &xs, &ys), Ok(-3));
    }

    #[test]
    fn test_eval_range_positive_steps() {
        assert_eq!(
            eval_range(-100, 0, &[0, 10, 20, 30], &[0, 20, 50, 100, 120]),
            Ok(0)
        );

        let xs = [10, 20, 30];
        let ys = [20, 50, 100, 120];
        assert_eq!(eval_range(-100, 5, &xs, &ys), Ok(20));
        assert_eq!(eval_range(0, 0, &xs, &ys), Ok(0));
        assert_eq!(eval_range(120, 120, &xs, &ys), Ok(0));

        assert_eq!(eval_range(0, 20, &[-100, -50, -30], &[20, 50, 100, 120]), Ok(120));

        let xs = [10, 30, 50];
        assert_eq!(eval_range(0, 40, &xs, &ys), Ok(55));
        // (10*20 + 20*50 + 20*100 + 70*120) / 120 = 11600 / 120 = 96
        assert_eq!(eval_range(0, 120, &xs, &ys), Ok(96));
    }

    #[test]
    fn test_eval_range_tail_only() {
        assert_eq!(eval_range(0, 120, &[], &[2]), Ok(2));
        assert_eq!(eval_range(-50, 50, &[], &[-7]), Ok(-7));
    }

    #[test]
    fn test_eval_range_empty() {
        assert_eq!(eval_range(0, 120, &[], &[]), Ok(0));
    }

    #[test]
    fn test_eval_range_kill_short_circuits() {
        let xs = [-100, 100, 200, 300];
        let ys = [0, -100, -200, -300, -10_000];
        assert_eq!(eval_range(0, 301, &xs, &ys), Ok(KILL_BPS));
        assert_eq!(eval_range(301, 1_000, &xs, &ys), Ok(KILL_BPS));
        assert_eq!(eval_range(0, 300, &xs, &ys), Ok(-200));

        let ys = [-10_000, -100, -200, -300, -500];
        assert_eq!(eval_range(-101, 0, &xs, &ys), Ok(KILL_BPS));
        assert_eq!(eval_range(-200, -101, &xs, &ys), Ok(KILL_BPS));
        assert_eq!(eval_range(-100, 0, &xs, &ys), Ok(-100));
    }

    #[test]
    fn test_eval_range_kill_in_tail() {
        let xs = [10, 20, 30];
        let ys = [0, -10, -20, -10_000];
        assert_eq!(eval_range(0, 10, &xs, &ys), Ok(0));
        // -10 / 11 truncates to 0
        assert_eq!(eval_range(0, 11, &xs, &ys), Ok(0));
        // -280 / 29 = -9.66 -> -9
        assert_eq!(eval_range(0, 29, &xs, &ys), Ok(-9));
        assert_eq!(eval_range(0, 30, &xs, &ys), Ok(-10));
        assert_eq!(eval_range(0, 31, &xs, &ys), Ok(KILL_BPS));
    }

    #[test]
    fn test_eval_range_reversed_is_not_negation() {
        let xs = [10, 30, 50];
        let ys = [20, 50, 100, 120];
        assert_eq!(eval_range(0, 40, &xs, &ys), Ok(55));
        // Walking down from 40 only sees the segment containing `from`
        assert_eq!(eval_range(40, 0, &xs, &ys), Ok(100));
    }

    #[test]
    fn test_eval_range_length_mismatch() {
        assert_eq!(
            eval_range(0, 5, &[1, 2], &[1, 2]),
            Err(ModelError::StepLengthMismatch)
        );
    }

    // ------------------------------------------------------------------------
    // helpers and codec
    // ------------------------------------------------------------------------

    #[test]
    fn test_div_trunc() {
        assert_eq!(div_trunc(3_500, -300), Ok(-11));
        assert_eq!(div_trunc(-3_500, 300), Ok(-11));
        assert_eq!(div_trunc(3_500, 300), Ok(11));
        assert_eq!(div_trunc(-10, 11), Ok(0));
        assert_eq!(div_trunc(1, 0), Err(ModelError::Overflow));
        assert_eq!(div_trunc(i128::MIN, -1), Err(ModelError::Overflow));
    }

    #[test]
    fn test_would_overflow_multiply() {
        let big = 1i128 << 64;
        assert!(would_overflow_multiply(big, big));
        assert!(would_overflow_multiply(-big, -big));
        assert!(would_overflow_multiply(-big, big));
        assert!(!would_overflow_multiply(1 << 50, big));
        assert!(!would_overflow_multiply(-(1 << 50), big));
        assert!(!would_overflow_multiply(0, i128::MAX));
        assert!(!would_overflow_multiply(i128::MIN, 0));
        assert!(!would_overflow_multiply(i128::MIN, 1));
        assert!(would_overflow_multiply(i128::MIN, -1));
        assert!(!would_overflow_multiply(i128::MAX, -1));
    }

    #[test]
    fn test_step_word_layout() {
        let word = StepWord::encode(1, -1).unwrap();
        assert_eq!(word.0[15], 1);
        assert!(word.0[..15].iter().all(|b| *b == 0));
        assert!(word.0[16..].iter().all(|b| *b == 0xff));
        assert_eq!(word.decode(), Ok((1, -1)));
    }

    #[test]
    fn test_step_word_extremes() {
        let max = i128::MAX;
        assert_eq!(StepWord::encode(max, -max).unwrap().decode(), Ok((max, -max)));
        assert_eq!(StepWord::encode(i128::MIN, 0), Err(ModelError::Overflow));
        assert_eq!(StepWord::encode(0, i128::MIN), Err(ModelError::Overflow));

        let mut raw = [0u8; 32];
        raw[0] = 0x80;
        assert_eq!(StepWord(raw).decode(), Err(ModelError::Overflow));
    }

    // ------------------------------------------------------------------------
    // validation and curves
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_legacy() {
        let mode = StepMode::Legacy;
        assert!(mode.validate(&[], &[], 10_000, true).is_ok());
        assert!(mode.validate(&[1, 2], &[5, 6], 10_000, true).is_ok());
        assert_eq!(
            mode.validate(&[1, 2], &[5], 10_000, true),
            Err(ModelError::StepLengthMismatch)
        );
        assert_eq!(
            mode.validate(&[2, 2], &[5, 6], 10_000, true),
            Err(ModelError::NonIncreasingSteps)
        );
        assert_eq!(
            mode.validate(&[-1, 2], &[5, 6], 10_000, true),
            Err(ModelError::NegativeStep)
        );
        assert!(mode.validate(&[-1, 2], &[5, 6], 10_000, false).is_ok());
        assert_eq!(
            mode.validate(&[1], &[-10_001], 10_000, false),
            Err(ModelError::StepValueOutOfRange)
        );
        assert_eq!(
            mode.validate(&[1], &[10_001], 10_000, false),
            Err(ModelError::StepValueOutOfRange)
        );

        let xs: [i128; 11] = core::array::from_fn(|i| i as i128);
        assert_eq!(
            mode.validate(&xs, &xs, 10_000, true),
            Err(ModelError::TooManySteps)
        );
    }

    #[test]
    fn test_validate_enhanced() {
        let mode = StepMode::Enhanced;
        assert_eq!(
            mode.validate(&[], &[], 10_000, false),
            Err(ModelError::StepLengthMismatch)
        );
        assert!(mode.validate(&[], &[3], 10_000, false).is_ok());
        assert_eq!(
            mode.validate(&[1, 2], &[5, 6], 10_000, false),
            Err(ModelError::StepLengthMismatch)
        );
        assert_eq!(
            mode.validate(&[i128::MAX], &[1, 2], 10_000, false),
            Err(ModelError::ReservedStepX)
        );

        let xs: [i128; 15] = core::array::from_fn(|i| i as i128);
        let ys = [0i128; 16];
        assert!(mode.validate(&xs, &ys, 10_000, false).is_ok());

        let xs: [i128; 16] = core::array::from_fn(|i| i as i128);
        let ys = [0i128; 17];
        assert_eq!(
            mode.validate(&xs, &ys, 10_000, false),
            Err(ModelError::TooManySteps)
        );
    }

    #[test]
    fn test_packed_curve_matches_slices() {
        let xs = [-200, -100, -50, 10];
        let ys = [-20, -10, -5, 2, 5];
        let curve = PackedCurve::new(&xs, &ys, 10_000).unwrap();

        assert_eq!(curve.x_len(), 4);
        assert_eq!(curve.y_len(), 5);
        assert_eq!(curve.x(3), Some(10));
        assert_eq!(curve.x(4), None);
        assert_eq!(curve.y(4), Some(5));
        assert_eq!(curve.y(5), None);

        for (from, to) in [(-300, 15), (-150, 20), (0, 120), (-400, -300), (40, 0)] {
            assert_eq!(curve.eval(from, to), eval_range(from, to, &xs, &ys));
        }
    }

    #[test]
    fn test_empty_curves() {
        assert_eq!(PackedCurve::default().eval(0, 100), Ok(0));
        assert_eq!(PackedCurve::default().x_len(), 0);
        assert_eq!(LegacyCurve::default().eval(100), Ok(0));
    }

    #[test]
    fn test_legacy_curve() {
        let curve = LegacyCurve::new(&[15, 30, 70], &[8, 30, 70], 10_000, true).unwrap();
        assert_eq!(curve.xs(), &[15, 30, 70]);
        assert_eq!(curve.eval(17), Ok(10));
    }
}
