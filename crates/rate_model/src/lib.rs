//! Rate Model - Pure fixed-point pricing math for reserve conversion rates
//!
//! Everything in this crate is stateless and deterministic:
//! - `add_bps`: apply a signed basis-point adjustment to an 18-decimal rate
//! - `mul_div_floor`: `a * b / d` without intermediate overflow
//! - `eval_point` / `eval_range`: piecewise step-function evaluation
//! - `StepWord`: signed breakpoint pair packed into one 32-byte word
//! - compact blobs: 14 signed 8-bit deltas packed one per byte
//!
//! The stateful engine lives in the `reserve-rates` crate and calls into
//! these functions; the Kani harnesses in `proofs-kani` verify them.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(kani)]
extern crate kani;

pub mod bps;
pub mod compact;
pub mod step;

pub use bps::{add_bps, add_bps_with, mul_div_floor, BpsLimits};
pub use compact::{decode_compact_blob, encode_compact_blob, CompactDeltas};
pub use step::{
    div_trunc, eval_point, eval_range, would_overflow_multiply, LegacyCurve, PackedCurve,
    StepMode, StepWord,
};

/// Fixed-point unit of every rate (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: i128 = 10_000;

/// Step value meaning "reject this trade"; composes to a zero rate
pub const KILL_BPS: i128 = -10_000;

/// Default ceiling on the rate accepted by `add_bps` (1e24)
pub const MAX_RATE: u128 = PRECISION * 1_000_000;

/// Default ceiling on the bps accepted by `add_bps` (1e11)
pub const MAX_BPS_ADJUSTMENT: i128 = 100_000_000_000;

/// Default ceiling on a single step-function value
pub const MAX_STEP_BPS: i128 = 10_000;

/// Legacy mode: len(X) == len(Y) <= 10
pub const MAX_LEGACY_STEPS: usize = 10;

/// Enhanced mode: len(Y) <= 16, len(X) == len(Y) - 1
pub const MAX_ENHANCED_STEPS: usize = 16;

/// Saturating bound of every stored imbalance accumulator
pub const IMBALANCE_MAX: i128 = i128::MAX;

/// Assets sharing one compact bucket
pub const COMPACT_SLOTS: usize = 14;

/// Error types for rate math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// bps below -10000 or above the configured ceiling
    BpsOutOfRange,
    /// Rate above the configured ceiling
    RateOutOfRange,
    /// Arithmetic overflow
    Overflow,
    /// Compact blob longer than one bucket
    BlobTooLong,
    /// X/Y lengths do not pair up for the step mode
    StepLengthMismatch,
    /// More breakpoints than the step mode allows
    TooManySteps,
    /// Breakpoints not strictly increasing
    NonIncreasingSteps,
    /// Negative breakpoint on a quantity curve
    NegativeStep,
    /// Step value outside [-10000, max]
    StepValueOutOfRange,
    /// Breakpoint collides with the packed-curve terminator
    ReservedStepX,
}

impl core::fmt::Display for ModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ModelError::BpsOutOfRange => "bps adjustment out of range",
            ModelError::RateOutOfRange => "rate exceeds maximum",
            ModelError::Overflow => "arithmetic overflow",
            ModelError::BlobTooLong => "compact blob longer than 14 bytes",
            ModelError::StepLengthMismatch => "step function X/Y lengths do not pair up",
            ModelError::TooManySteps => "too many step function breakpoints",
            ModelError::NonIncreasingSteps => "step function breakpoints must strictly increase",
            ModelError::NegativeStep => "quantity step breakpoints must be non-negative",
            ModelError::StepValueOutOfRange => "step function value out of range",
            ModelError::ReservedStepX => "step function breakpoint uses a reserved value",
        };
        f.write_str(msg)
    }
}

/// Result type for rate math
pub type Result<T> = core::result::Result<T, ModelError>;
