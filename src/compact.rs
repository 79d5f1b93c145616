//! Compact rate store: bucketed signed-byte deltas
//!
//! Asset `i` lives in bucket `i / 14`, field `i % 14`. Each bucket carries one
//! last-update epoch shared by its 14 assets. Buckets only grow.

use log::debug;
use rate_model::{decode_compact_blob, CompactDeltas, COMPACT_SLOTS};
use serde::Serialize;

use crate::error::{RateError, Result};
use crate::{Epoch, Side};

/// Position of an asset inside the compact store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CompactSlot {
    pub bucket: usize,
    pub field: usize,
}

impl CompactSlot {
    pub const fn for_index(index: usize) -> Self {
        Self {
            bucket: index / COMPACT_SLOTS,
            field: index % COMPACT_SLOTS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactBucket {
    pub buy: CompactDeltas,
    pub sell: CompactDeltas,
    pub last_update_epoch: u32,
}

/// `get_compact_data` view of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompactEntry {
    pub bucket: usize,
    pub field: usize,
    pub buy_delta: i8,
    pub sell_delta: i8,
}

/// Decoded bucket updates, ready to apply without further checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCompactData {
    updates: Vec<(usize, CompactBucket)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactRateStore {
    buckets: Vec<CompactBucket>,
    slots_used: usize,
}

impl CompactRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot, opening a bucket when the previous one is full
    pub fn allocate_slot(&mut self) -> CompactSlot {
        let slot = CompactSlot::for_index(self.slots_used);
        if slot.field == 0 {
            self.buckets.push(CompactBucket::default());
        }
        self.slots_used += 1;
        slot
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> Option<&CompactBucket> {
        self.buckets.get(index)
    }

    /// Validate and decode a batch without touching any bucket
    pub fn stage(
        &self,
        buy_blobs: &[Vec<u8>],
        sell_blobs: &[Vec<u8>],
        epoch: Epoch,
        indices: &[usize],
    ) -> Result<StagedCompactData> {
        if buy_blobs.len() != indices.len() {
            return Err(RateError::LengthMismatch {
                what: "buy blobs",
                expected: indices.len(),
                actual: buy_blobs.len(),
            });
        }
        if sell_blobs.len() != indices.len() {
            return Err(RateError::LengthMismatch {
                what: "sell blobs",
                expected: indices.len(),
                actual: sell_blobs.len(),
            });
        }
        let buckets = self.buckets.len();
        if indices.len() > buckets {
            return Err(RateError::TooManyBuckets {
                count: indices.len(),
                buckets,
            });
        }
        let last_update_epoch =
            u32::try_from(epoch).map_err(|_| RateError::EpochOutOfRange(epoch))?;

        let mut updates = Vec::with_capacity(indices.len());
        for ((&index, buy), sell) in indices.iter().zip(buy_blobs).zip(sell_blobs) {
            if index >= buckets {
                return Err(RateError::BucketOutOfRange { index, buckets });
            }
            let bucket = CompactBucket {
                buy: decode_compact_blob(buy)?,
                sell: decode_compact_blob(sell)?,
                last_update_epoch,
            };
            updates.push((index, bucket));
        }
        Ok(StagedCompactData { updates })
    }

    /// Apply a batch produced by `stage`
    pub fn commit(&mut self, staged: StagedCompactData) {
        for (index, bucket) in staged.updates {
            if let Some(slot) = self.buckets.get_mut(index) {
                *slot = bucket;
            }
        }
    }

    /// Overwrite whole buckets; all or nothing
    pub fn set_compact_data(
        &mut self,
        buy_blobs: &[Vec<u8>],
        sell_blobs: &[Vec<u8>],
        epoch: Epoch,
        indices: &[usize],
    ) -> Result<()> {
        let staged = self.stage(buy_blobs, sell_blobs, epoch, indices)?;
        debug!("compact update of {} buckets at epoch {}", indices.len(), epoch);
        self.commit(staged);
        Ok(())
    }

    pub fn entry(&self, slot: CompactSlot) -> CompactEntry {
        let bucket = self.buckets.get(slot.bucket).copied().unwrap_or_default();
        CompactEntry {
            bucket: slot.bucket,
            field: slot.field,
            buy_delta: bucket.buy[slot.field],
            sell_delta: bucket.sell[slot.field],
        }
    }

    pub fn delta(&self, slot: CompactSlot, side: Side) -> i8 {
        let entry = self.entry(slot);
        match side {
            Side::Buy => entry.buy_delta,
            Side::Sell => entry.sell_delta,
        }
    }

    pub fn last_update_epoch(&self, slot: CompactSlot) -> Epoch {
        self.buckets
            .get(slot.bucket)
            .map_or(0, |bucket| Epoch::from(bucket.last_update_epoch))
    }
}
