//! Imbalance accountant: per-epoch and cumulative inventory drift
//!
//! Values are stored compressed (`raw / min_record_resolution`) and expanded
//! again on read. Accumulators saturate at `±IMBALANCE_MAX` instead of
//! overflowing, so one asset's extreme volume cannot poison its own reads or
//! anyone else's. The resolution used on read is whatever is configured at
//! that moment; stored values are never rescaled.

use std::collections::HashMap;

use log::{trace, warn};
use rate_model::IMBALANCE_MAX;
use serde::Serialize;

use crate::{AssetId, Epoch};

/// Compressed accumulators for one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImbalanceRecord {
    /// Accumulated within `last_epoch`
    pub epoch_imbalance: i128,
    /// Accumulated since listing
    pub total_imbalance: i128,
    /// Epoch of the last recorded trade
    pub last_epoch: Epoch,
    /// Rate-update epoch supplied with the last recorded trade
    pub last_rate_epoch: Epoch,
}

/// Decompressed view returned by `ImbalanceAccountant::snapshot`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImbalanceSnapshot {
    pub total: i128,
    pub current_epoch: i128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImbalanceAccountant {
    records: HashMap<AssetId, ImbalanceRecord>,
}

// ============================================================================
// Saturating helpers
// ============================================================================

fn clamp(value: i128) -> i128 {
    value.clamp(-IMBALANCE_MAX, IMBALANCE_MAX)
}

fn saturating_accumulate(acc: i128, delta: i128) -> i128 {
    match acc.checked_add(delta) {
        Some(sum) => clamp(sum),
        None if delta > 0 => IMBALANCE_MAX,
        None => -IMBALANCE_MAX,
    }
}

/// `raw / resolution`, truncating toward zero
pub fn compress(raw: i128, resolution: u128) -> i128 {
    match i128::try_from(resolution) {
        Ok(0) => 0,
        Ok(res) => clamp(raw / res),
        // A divisor beyond i128::MAX exceeds every representable magnitude
        Err(_) => 0,
    }
}

/// `stored * resolution`, saturating at the sentinel
pub fn decompress(stored: i128, resolution: u128) -> i128 {
    if stored == 0 || resolution == 0 {
        return 0;
    }
    let expanded = i128::try_from(resolution)
        .ok()
        .and_then(|res| stored.checked_mul(res));
    match expanded {
        Some(value) => clamp(value),
        None if stored > 0 => IMBALANCE_MAX,
        None => -IMBALANCE_MAX,
    }
}

// ============================================================================
// Accountant
// ============================================================================

impl ImbalanceAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` (raw units) to an asset's accumulators
    ///
    /// A trade in a new epoch restarts the per-epoch accumulator at `delta`;
    /// the running total always accumulates.
    pub fn record(
        &mut self,
        asset: AssetId,
        resolution: u128,
        delta: i128,
        last_rate_epoch: Epoch,
        current_epoch: Epoch,
    ) -> ImbalanceRecord {
        let compressed = compress(delta, resolution);
        let record = self.records.entry(asset).or_default();

        if record.last_epoch != current_epoch {
            record.epoch_imbalance = compressed;
            record.last_epoch = current_epoch;
        } else {
            record.epoch_imbalance = saturating_accumulate(record.epoch_imbalance, compressed);
        }
        record.total_imbalance = saturating_accumulate(record.total_imbalance, compressed);
        record.last_rate_epoch = last_rate_epoch;

        if record.total_imbalance.abs() == IMBALANCE_MAX
            || record.epoch_imbalance.abs() == IMBALANCE_MAX
        {
            warn!("imbalance of {} saturated at epoch {}", asset, current_epoch);
        }
        trace!(
            "{} imbalance += {} (compressed {}): epoch {} total {}",
            asset,
            delta,
            compressed,
            record.epoch_imbalance,
            record.total_imbalance
        );
        *record
    }

    /// `(total, current-epoch)` imbalance in raw units
    ///
    /// The per-epoch part reads 0 unless the last trade happened in
    /// `current_epoch`.
    pub fn snapshot(
        &self,
        asset: AssetId,
        resolution: u128,
        current_epoch: Epoch,
    ) -> ImbalanceSnapshot {
        let Some(record) = self.records.get(&asset) else {
            return ImbalanceSnapshot::default();
        };
        let epoch_imbalance = if record.last_epoch == current_epoch {
            record.epoch_imbalance
        } else {
            0
        };
        ImbalanceSnapshot {
            total: decompress(record.total_imbalance, resolution),
            current_epoch: decompress(epoch_imbalance, resolution),
        }
    }

    pub fn record_of(&self, asset: AssetId) -> Option<&ImbalanceRecord> {
        self.records.get(&asset)
    }
}
