//! Asset registry: listing, enable flags, control parameters, base rates

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::compact::CompactSlot;
use crate::error::{RateError, Result};
use crate::serde_utils;
use crate::{AssetId, Side};

/// Per-asset imbalance controls
///
/// `min_record_resolution == 0` marks pricing as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInfo {
    #[serde(with = "serde_utils::u128_string")]
    pub min_record_resolution: u128,
    #[serde(with = "serde_utils::u128_string")]
    pub max_per_epoch_imbalance: u128,
    #[serde(with = "serde_utils::u128_string")]
    pub max_total_imbalance: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: AssetId,
    /// Listing order, also the compact slot source
    pub index: usize,
    pub slot: CompactSlot,
    pub enabled: bool,
    pub base_buy_rate: u128,
    pub base_sell_rate: u128,
    pub control: ControlInfo,
}

impl Asset {
    pub fn base_rate(&self, side: Side) -> u128 {
        match side {
            Side::Buy => self.base_buy_rate,
            Side::Sell => self.base_sell_rate,
        }
    }

    pub fn pricing_enabled(&self) -> bool {
        self.control.min_record_resolution > 0
    }
}

/// Listed assets keyed by id; assets are never removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRegistry {
    assets: HashMap<AssetId, Asset>,
    listed: Vec<AssetId>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a new asset in the given compact slot
    pub fn register(&mut self, id: AssetId, slot: CompactSlot) -> Result<&Asset> {
        if self.assets.contains_key(&id) {
            return Err(RateError::AlreadyListed(id));
        }
        let asset = Asset {
            id,
            index: self.listed.len(),
            slot,
            enabled: false,
            base_buy_rate: 0,
            base_sell_rate: 0,
            control: ControlInfo::default(),
        };
        info!(
            "listed asset {} at index {} (bucket {}, field {})",
            id, asset.index, slot.bucket, slot.field
        );
        self.listed.push(id);
        Ok(self.assets.entry(id).or_insert(asset))
    }

    pub fn get(&self, id: AssetId) -> Result<&Asset> {
        self.assets.get(&id).ok_or(RateError::NotListed(id))
    }

    fn get_mut(&mut self, id: AssetId) -> Result<&mut Asset> {
        self.assets.get_mut(&id).ok_or(RateError::NotListed(id))
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    /// Ids in listing order
    pub fn listed(&self) -> &[AssetId] {
        &self.listed
    }

    pub fn len(&self) -> usize {
        self.listed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listed.is_empty()
    }

    /// `(listed, enabled)`; unknown ids are neither
    pub fn basic_data(&self, id: AssetId) -> (bool, bool) {
        self.assets
            .get(&id)
            .map_or((false, false), |asset| (true, asset.enabled))
    }

    pub fn set_control_info(&mut self, id: AssetId, control: ControlInfo) -> Result<()> {
        self.get_mut(id)?.control = control;
        Ok(())
    }

    /// Enabling requires a non-zero record resolution
    pub fn enable(&mut self, id: AssetId) -> Result<()> {
        let asset = self.get_mut(id)?;
        if !asset.pricing_enabled() {
            return Err(RateError::ResolutionNotSet(id));
        }
        asset.enabled = true;
        info!("enabled trading for {}", id);
        Ok(())
    }

    pub fn disable(&mut self, id: AssetId) -> Result<()> {
        self.get_mut(id)?.enabled = false;
        info!("disabled trading for {}", id);
        Ok(())
    }

    pub fn set_base_rate(&mut self, id: AssetId, buy: u128, sell: u128) -> Result<()> {
        let asset = self.get_mut(id)?;
        asset.base_buy_rate = buy;
        asset.base_sell_rate = sell;
        Ok(())
    }
}
