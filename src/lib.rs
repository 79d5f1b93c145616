//! Reserve Rates - Conversion rate engine for an automated market-making reserve
//!
//! For every listed asset the engine layers, in order:
//! 1. a base buy/sell rate (18-decimal fixed point)
//! 2. a compact per-asset delta (signed byte, units of 10 bps)
//! 3. a quantity step function (legacy mode only)
//! 4. an imbalance step function keyed on net inventory drift
//!
//! and then bounds the result with per-epoch and cumulative imbalance limits
//! and a staleness window. `RateEngine::get_rate` never fails: every reason a
//! trade cannot be priced yields a rate of 0.
//!
//! The pure math lives in `rate_model`; this crate owns the state.

#![forbid(unsafe_code)]

pub mod asset;
pub mod compact;
pub mod config;
pub mod engine;
pub mod error;
pub mod imbalance;
pub mod registry;
pub mod serde_utils;
pub mod steps;

pub use asset::AssetId;
pub use compact::{CompactBucket, CompactEntry, CompactRateStore, CompactSlot};
pub use config::EngineConfig;
pub use engine::{RateEngine, RateQuote, Rejection};
pub use error::{ErrorKind, RateError, Result};
pub use imbalance::{ImbalanceAccountant, ImbalanceRecord, ImbalanceSnapshot};
pub use registry::{Asset, AssetRegistry, ControlInfo};
pub use steps::{AssetCurves, Curve, CurveKind, StepCommand, StepField};

pub use rate_model::{
    add_bps, decode_compact_blob, encode_compact_blob, eval_point, eval_range,
    would_overflow_multiply, ModelError, StepMode, StepWord, BPS_SCALE, COMPACT_SLOTS,
    IMBALANCE_MAX, KILL_BPS, MAX_BPS_ADJUSTMENT, MAX_RATE, MAX_STEP_BPS, PRECISION,
};

/// Caller-supplied monotonically increasing period counter
pub type Epoch = u64;

/// Trade direction from the reserve's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Taker buys the asset from the reserve; imbalance grows
    Buy,
    /// Taker sells the asset to the reserve; imbalance shrinks
    Sell,
}

impl Side {
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}
