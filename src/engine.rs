//! Rate engine: composes registry, compact store, step curves and imbalance
//!
//! `get_rate` evaluates, in order:
//! 1. listed, enabled and a non-zero record resolution
//! 2. staleness: `current_epoch > last_update + valid_duration` prices at 0
//! 3. base rate adjusted by the compact delta (x10 bps)
//! 4. quantity curve (legacy only), then imbalance curve
//! 5. per-epoch and total imbalance limits
//!
//! Any rejection or arithmetic failure yields 0. `quote` exposes the same
//! computation with a breakdown or the rejection reason.

use std::collections::HashMap;

use log::{debug, trace};
use rate_model::{
    add_bps_with, mul_div_floor, LegacyCurve, ModelError, PackedCurve, StepMode, KILL_BPS,
    PRECISION,
};
use serde::Serialize;
use thiserror::Error;

use crate::compact::{CompactEntry, CompactRateStore};
use crate::config::EngineConfig;
use crate::error::{RateError, Result};
use crate::imbalance::{ImbalanceAccountant, ImbalanceRecord, ImbalanceSnapshot};
use crate::registry::{Asset, AssetRegistry, ControlInfo};
use crate::serde_utils;
use crate::steps::{AssetCurves, Curve, StepCommand};
use crate::{AssetId, Epoch, Side};

// ============================================================================
// Quote types
// ============================================================================

/// Breakdown of a successful rate computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateQuote {
    pub asset: AssetId,
    pub side: Side,
    #[serde(with = "serde_utils::u128_string")]
    pub qty: u128,
    #[serde(with = "serde_utils::u128_string")]
    pub base_rate: u128,
    pub compact_bps: i128,
    /// Destination quantity estimate (buys only)
    #[serde(with = "serde_utils::u128_string")]
    pub dst_qty: u128,
    /// Always 0 in enhanced mode
    pub qty_bps: i128,
    pub imbalance_bps: i128,
    /// Signed imbalance this trade would add
    pub imbalance_change: i128,
    #[serde(with = "serde_utils::u128_string")]
    pub rate: u128,
}

/// Why a rate is zero
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("asset is not listed")]
    NotListed,

    #[error("trading is disabled")]
    Disabled,

    #[error("pricing is disabled (record resolution is 0)")]
    PricingDisabled,

    #[error("rates expired at epoch {expiry} (now {current_epoch})")]
    Stale { current_epoch: Epoch, expiry: Epoch },

    #[error("imbalance step function rejects the trade")]
    KillStep,

    #[error("epoch imbalance {imbalance} would reach limit {limit}")]
    EpochLimit { imbalance: i128, limit: u128 },

    #[error("total imbalance {imbalance} would reach limit {limit}")]
    TotalLimit { imbalance: i128, limit: u128 },

    #[error("rate arithmetic out of range: {0}")]
    Arithmetic(ModelError),
}

impl From<ModelError> for Rejection {
    fn from(err: ModelError) -> Self {
        Rejection::Arithmetic(err)
    }
}

fn to_signed(value: u128) -> core::result::Result<i128, ModelError> {
    i128::try_from(value).map_err(|_| ModelError::Overflow)
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(RateError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

/// Owns every per-asset store; independent instances share nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEngine {
    config: EngineConfig,
    registry: AssetRegistry,
    compact: CompactRateStore,
    imbalance: ImbalanceAccountant,
    curves: HashMap<AssetId, AssetCurves>,
}

impl RateEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: AssetRegistry::new(),
            compact: CompactRateStore::new(),
            imbalance: ImbalanceAccountant::new(),
            curves: HashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn step_mode(&self) -> StepMode {
        self.config.step_mode
    }

    // ========================================
    // Registry
    // ========================================

    /// List an asset and give it the next compact slot
    pub fn register(&mut self, asset: AssetId) -> Result<()> {
        if self.registry.contains(asset) {
            return Err(RateError::AlreadyListed(asset));
        }
        let slot = self.compact.allocate_slot();
        self.registry.register(asset, slot)?;
        self.curves.insert(asset, AssetCurves::new(self.config.step_mode));
        Ok(())
    }

    /// Any values are accepted; a zero resolution disables pricing
    pub fn set_control_info(
        &mut self,
        asset: AssetId,
        min_record_resolution: u128,
        max_per_epoch_imbalance: u128,
        max_total_imbalance: u128,
    ) -> Result<()> {
        let control = ControlInfo {
            min_record_resolution,
            max_per_epoch_imbalance,
            max_total_imbalance,
        };
        self.registry.set_control_info(asset, control)?;
        debug!("control info for {}: {:?}", asset, control);
        Ok(())
    }

    pub fn control_info(&self, asset: AssetId) -> Result<ControlInfo> {
        Ok(self.registry.get(asset)?.control)
    }

    pub fn enable(&mut self, asset: AssetId) -> Result<()> {
        self.registry.enable(asset)
    }

    pub fn disable(&mut self, asset: AssetId) -> Result<()> {
        self.registry.disable(asset)
    }

    pub fn asset(&self, asset: AssetId) -> Result<&Asset> {
        self.registry.get(asset)
    }

    pub fn listed_assets(&self) -> &[AssetId] {
        self.registry.listed()
    }

    /// `(listed, enabled)`
    pub fn asset_basic_data(&self, asset: AssetId) -> (bool, bool) {
        self.registry.basic_data(asset)
    }

    pub fn set_valid_duration(&mut self, epochs: Epoch) {
        debug!("valid duration set to {} epochs", epochs);
        self.config.valid_duration_epochs = epochs;
    }

    pub fn valid_duration(&self) -> Epoch {
        self.config.valid_duration_epochs
    }

    // ========================================
    // Base rates and compact data
    // ========================================

    /// Update one asset's base rates
    pub fn set_asset_base_rate(&mut self, asset: AssetId, buy: u128, sell: u128) -> Result<()> {
        self.registry.set_base_rate(asset, buy, sell)
    }

    /// Base rates for a batch of assets plus a compact update; all or nothing
    #[allow(clippy::too_many_arguments)]
    pub fn set_base_rate(
        &mut self,
        assets: &[AssetId],
        buys: &[u128],
        sells: &[u128],
        buy_blobs: &[Vec<u8>],
        sell_blobs: &[Vec<u8>],
        epoch: Epoch,
        indices: &[usize],
    ) -> Result<()> {
        check_len("base buy rates", assets.len(), buys.len())?;
        check_len("base sell rates", assets.len(), sells.len())?;
        for asset in assets {
            self.registry.get(*asset)?;
        }
        let staged = self.compact.stage(buy_blobs, sell_blobs, epoch, indices)?;

        for ((asset, buy), sell) in assets.iter().zip(buys).zip(sells) {
            self.registry.set_base_rate(*asset, *buy, *sell)?;
        }
        self.compact.commit(staged);
        debug!(
            "base rates for {} assets, {} compact buckets at epoch {}",
            assets.len(),
            indices.len(),
            epoch
        );
        Ok(())
    }

    pub fn base_rate(&self, asset: AssetId, side: Side) -> Result<u128> {
        Ok(self.registry.get(asset)?.base_rate(side))
    }

    pub fn set_compact_data(
        &mut self,
        buy_blobs: &[Vec<u8>],
        sell_blobs: &[Vec<u8>],
        epoch: Epoch,
        indices: &[usize],
    ) -> Result<()> {
        self.compact
            .set_compact_data(buy_blobs, sell_blobs, epoch, indices)
    }

    pub fn get_compact_data(&self, asset: AssetId) -> Result<CompactEntry> {
        let slot = self.registry.get(asset)?.slot;
        Ok(self.compact.entry(slot))
    }

    pub fn last_update_epoch(&self, asset: AssetId) -> Result<Epoch> {
        let slot = self.registry.get(asset)?.slot;
        Ok(self.compact.last_update_epoch(slot))
    }

    pub fn compact_bucket_count(&self) -> usize {
        self.compact.bucket_count()
    }

    // ========================================
    // Step functions
    // ========================================

    fn build_curve(&self, xs: &[i128], ys: &[i128], non_negative: bool) -> Result<Curve> {
        let max_step_bps = self.config.max_step_bps;
        let curve = match self.config.step_mode {
            StepMode::Legacy => {
                Curve::Legacy(LegacyCurve::new(xs, ys, max_step_bps, non_negative)?)
            }
            StepMode::Enhanced => Curve::Packed(PackedCurve::new(xs, ys, max_step_bps)?),
        };
        Ok(curve)
    }

    fn curves_mut(&mut self, asset: AssetId) -> Result<&mut AssetCurves> {
        self.curves.get_mut(&asset).ok_or(RateError::NotListed(asset))
    }

    fn curves(&self, asset: AssetId) -> Result<&AssetCurves> {
        self.curves.get(&asset).ok_or(RateError::NotListed(asset))
    }

    /// Replace both quantity curves (legacy mode only)
    pub fn set_qty_step_function(
        &mut self,
        asset: AssetId,
        x_buy: &[i128],
        y_buy: &[i128],
        x_sell: &[i128],
        y_sell: &[i128],
    ) -> Result<()> {
        if self.config.step_mode == StepMode::Enhanced {
            return Err(RateError::QtyStepsUnsupported);
        }
        self.registry.get(asset)?;
        let buy = self.build_curve(x_buy, y_buy, true)?;
        let sell = self.build_curve(x_sell, y_sell, true)?;
        self.curves_mut(asset)?.set_qty(buy, sell);
        debug!(
            "qty step functions for {}: {} buy / {} sell steps",
            asset,
            x_buy.len(),
            x_sell.len()
        );
        Ok(())
    }

    /// Replace both imbalance curves
    pub fn set_imbalance_step_function(
        &mut self,
        asset: AssetId,
        x_buy: &[i128],
        y_buy: &[i128],
        x_sell: &[i128],
        y_sell: &[i128],
    ) -> Result<()> {
        self.registry.get(asset)?;
        let buy = self.build_curve(x_buy, y_buy, false)?;
        let sell = self.build_curve(x_sell, y_sell, false)?;
        self.curves_mut(asset)?.set_imbalance(buy, sell);
        debug!(
            "imbalance step functions for {}: {} buy / {} sell steps",
            asset,
            x_buy.len(),
            x_sell.len()
        );
        Ok(())
    }

    pub fn step_curves(&self, asset: AssetId) -> Result<&AssetCurves> {
        self.curves(asset)
    }

    /// Raw breakpoint access through the legacy command table
    pub fn step_function_data(&self, asset: AssetId, command: u8, param: usize) -> Result<i128> {
        let command = StepCommand::try_from(command)?;
        self.curves(asset)?.command_value(command, param)
    }

    /// Raw imbalance step value, including the -10000 sentinel
    ///
    /// Enhanced mode averages over `[from, to)`; legacy mode reads the
    /// value at `to`.
    pub fn imbalance_step_bps(&self, asset: AssetId, side: Side, from: i128, to: i128) -> Result<i128> {
        Ok(self.curves(asset)?.imbalance(side).eval(from, to)?)
    }

    // ========================================
    // Imbalance
    // ========================================

    pub fn record_imbalance(
        &mut self,
        asset: AssetId,
        delta: i128,
        last_rate_epoch: Epoch,
        current_epoch: Epoch,
    ) -> Result<()> {
        let resolution = self.registry.get(asset)?.control.min_record_resolution;
        if resolution == 0 {
            return Err(RateError::ResolutionNotSet(asset));
        }
        self.imbalance
            .record(asset, resolution, delta, last_rate_epoch, current_epoch);
        Ok(())
    }

    /// `(total, current-epoch)` imbalance in raw units
    pub fn get_imbalance(
        &self,
        asset: AssetId,
        last_rate_epoch: Epoch,
        current_epoch: Epoch,
    ) -> Result<ImbalanceSnapshot> {
        let resolution = self.registry.get(asset)?.control.min_record_resolution;
        trace!(
            "imbalance query for {} (rate epoch {}, epoch {})",
            asset,
            last_rate_epoch,
            current_epoch
        );
        Ok(self.imbalance.snapshot(asset, resolution, current_epoch))
    }

    pub fn imbalance_record(&self, asset: AssetId) -> Option<&ImbalanceRecord> {
        self.imbalance.record_of(asset)
    }

    // ========================================
    // Pricing
    // ========================================

    /// Conversion rate for `qty`, or 0 if the trade cannot be priced
    pub fn get_rate(&self, asset: AssetId, current_epoch: Epoch, side: Side, qty: u128) -> u128 {
        match self.quote(asset, current_epoch, side, qty) {
            Ok(quote) => quote.rate,
            Err(reason) => {
                debug!(
                    "{:?} {} of {} at epoch {} priced at 0: {}",
                    side, qty, asset, current_epoch, reason
                );
                0
            }
        }
    }

    /// `get_rate` with a breakdown, or the reason the rate is 0
    pub fn quote(
        &self,
        asset: AssetId,
        current_epoch: Epoch,
        side: Side,
        qty: u128,
    ) -> core::result::Result<RateQuote, Rejection> {
        let info = self.registry.get(asset).map_err(|_| Rejection::NotListed)?;
        if !info.enabled {
            return Err(Rejection::Disabled);
        }
        if !info.pricing_enabled() {
            return Err(Rejection::PricingDisabled);
        }

        let expiry = self
            .compact
            .last_update_epoch(info.slot)
            .saturating_add(self.config.valid_duration_epochs);
        if current_epoch > expiry {
            return Err(Rejection::Stale {
                current_epoch,
                expiry,
            });
        }

        let limits = self.config.bps_limits();
        let base_rate = info.base_rate(side);
        let compact_bps = i128::from(self.compact.delta(info.slot, side)) * 10;
        let mut rate = add_bps_with(limits, base_rate, compact_bps)?;

        let qty_signed = to_signed(qty)?;
        let (dst_qty, change) = match side {
            Side::Buy => {
                let dst = mul_div_floor(qty, rate, PRECISION).ok_or(ModelError::Overflow)?;
                (dst, to_signed(dst)?)
            }
            Side::Sell => (0, -qty_signed),
        };

        let control = info.control;
        let snapshot = self
            .imbalance
            .snapshot(asset, control.min_record_resolution, current_epoch);
        let total_after = snapshot
            .total
            .checked_add(change)
            .ok_or(ModelError::Overflow)?;
        let curves = self.curves.get(&asset).ok_or(Rejection::NotListed)?;

        let mut qty_bps = 0;
        if let Some(curve) = curves.qty(side) {
            let point = match side {
                Side::Buy => change,
                Side::Sell => qty_signed,
            };
            qty_bps = curve.eval_move(0, point)?;
            rate = add_bps_with(limits, rate, qty_bps)?;
        }

        let imbalance_bps = curves
            .imbalance(side)
            .eval_move(snapshot.total, total_after)?;
        rate = add_bps_with(limits, rate, imbalance_bps)?;
        if imbalance_bps == KILL_BPS {
            return Err(Rejection::KillStep);
        }

        let epoch_after = snapshot
            .current_epoch
            .checked_add(change)
            .ok_or(ModelError::Overflow)?;
        if epoch_after.unsigned_abs() >= control.max_per_epoch_imbalance {
            return Err(Rejection::EpochLimit {
                imbalance: epoch_after,
                limit: control.max_per_epoch_imbalance,
            });
        }
        if total_after.unsigned_abs() >= control.max_total_imbalance {
            return Err(Rejection::TotalLimit {
                imbalance: total_after,
                limit: control.max_total_imbalance,
            });
        }

        Ok(RateQuote {
            asset,
            side,
            qty,
            base_rate,
            compact_bps,
            dst_qty,
            qty_bps,
            imbalance_bps,
            imbalance_change: change,
            rate,
        })
    }
}
