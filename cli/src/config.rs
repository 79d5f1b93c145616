//! Reserve description files
//!
//! A TOML file describes one deployment: engine parameters, the listed
//! assets with their rates and curves, and optionally imbalance already
//! recorded against them. `build_engine` replays it into a `RateEngine`.

use anyhow::{bail, Context, Result};
use log::debug;
use reserve_rates::serde_utils;
use reserve_rates::{AssetId, ControlInfo, EngineConfig, Epoch, RateEngine, StepMode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "reserve.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReserveConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Epoch stamped on every compact bucket
    #[serde(default)]
    pub compact_epoch: Epoch,

    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    pub symbol: AssetId,

    #[serde(with = "serde_utils::u128_string")]
    pub buy_rate: u128,

    #[serde(with = "serde_utils::u128_string")]
    pub sell_rate: u128,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default)]
    pub control: ControlInfo,

    /// Compact buy delta in units of 10 bps
    #[serde(default)]
    pub compact_buy: i8,

    #[serde(default)]
    pub compact_sell: i8,

    #[serde(default)]
    pub qty_buy: Option<CurveConfig>,

    #[serde(default)]
    pub qty_sell: Option<CurveConfig>,

    #[serde(default)]
    pub imbalance_buy: Option<CurveConfig>,

    #[serde(default)]
    pub imbalance_sell: Option<CurveConfig>,

    #[serde(default, rename = "imbalance")]
    pub imbalances: Vec<ImbalanceEntry>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveConfig {
    #[serde(default, with = "serde_utils::i128_seq")]
    pub x: Vec<i128>,

    #[serde(default, with = "serde_utils::i128_seq")]
    pub y: Vec<i128>,
}

/// A trade already recorded against an asset
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImbalanceEntry {
    #[serde(with = "serde_utils::i128_string")]
    pub delta: i128,

    pub epoch: Epoch,

    #[serde(default)]
    pub rate_epoch: Epoch,
}

/// `--config`, else `./reserve.toml`
pub fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

pub fn load(path: &Path) -> Result<ReserveConfig> {
    if !path.exists() {
        bail!(
            "Reserve file not found: {}\n\
             Start from cli/reserve.example.toml",
            path.display()
        );
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reserve file: {}", path.display()))?;
    parse(&data).with_context(|| format!("Invalid reserve file: {}", path.display()))
}

pub fn parse(data: &str) -> Result<ReserveConfig> {
    Ok(toml::from_str(data)?)
}

/// An empty curve in the deployment's step mode
fn flat_curve(mode: StepMode) -> CurveConfig {
    match mode {
        StepMode::Legacy => CurveConfig::default(),
        StepMode::Enhanced => CurveConfig {
            x: Vec::new(),
            y: vec![0],
        },
    }
}

/// Replay a reserve description into a fresh engine
pub fn build_engine(config: &ReserveConfig) -> Result<RateEngine> {
    let mut engine = RateEngine::new(config.engine).context("Invalid engine parameters")?;
    let mode = config.engine.step_mode;

    for asset in &config.assets {
        engine
            .register(asset.symbol)
            .with_context(|| format!("Failed to list {}", asset.symbol))?;
    }

    let buckets = engine.compact_bucket_count();
    let mut buy_blobs = vec![Vec::new(); buckets];
    let mut sell_blobs = vec![Vec::new(); buckets];
    for asset in &config.assets {
        let deltas = [(&mut buy_blobs, asset.compact_buy), (&mut sell_blobs, asset.compact_sell)];
        let slot = engine.asset(asset.symbol)?.slot;
        for (blobs, delta) in deltas {
            let blob = &mut blobs[slot.bucket];
            if blob.len() <= slot.field {
                blob.resize(slot.field + 1, 0);
            }
            blob[slot.field] = delta.to_be_bytes()[0];
        }
    }

    let ids: Vec<AssetId> = config.assets.iter().map(|a| a.symbol).collect();
    let buys: Vec<u128> = config.assets.iter().map(|a| a.buy_rate).collect();
    let sells: Vec<u128> = config.assets.iter().map(|a| a.sell_rate).collect();
    let indices: Vec<usize> = (0..buckets).collect();
    engine
        .set_base_rate(&ids, &buys, &sells, &buy_blobs, &sell_blobs, config.compact_epoch, &indices)
        .context("Failed to set base rates")?;

    for asset in &config.assets {
        configure_asset(&mut engine, asset, mode)
            .with_context(|| format!("Failed to configure {}", asset.symbol))?;
    }

    debug!(
        "built {:?} reserve with {} assets in {} buckets",
        mode,
        ids.len(),
        buckets
    );
    Ok(engine)
}

fn configure_asset(engine: &mut RateEngine, asset: &AssetConfig, mode: StepMode) -> Result<()> {
    let id = asset.symbol;
    let control = asset.control;
    engine.set_control_info(
        id,
        control.min_record_resolution,
        control.max_per_epoch_imbalance,
        control.max_total_imbalance,
    )?;

    if asset.qty_buy.is_some() || asset.qty_sell.is_some() {
        let buy = asset.qty_buy.clone().unwrap_or_default();
        let sell = asset.qty_sell.clone().unwrap_or_default();
        engine.set_qty_step_function(id, &buy.x, &buy.y, &sell.x, &sell.y)?;
    }

    let buy = asset.imbalance_buy.clone().unwrap_or_else(|| flat_curve(mode));
    let sell = asset.imbalance_sell.clone().unwrap_or_else(|| flat_curve(mode));
    engine.set_imbalance_step_function(id, &buy.x, &buy.y, &sell.x, &sell.y)?;

    for entry in &asset.imbalances {
        engine.record_imbalance(id, entry.delta, entry.rate_epoch, entry.epoch)?;
    }
    if asset.enabled {
        engine.enable(id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reserve_rates::{Side, PRECISION};
    use std::io::Write;

    const LEGACY_RESERVE: &str = r#"
compact_epoch = 3000

[engine]
step_mode = "legacy"
valid_duration_epochs = 1000

[[asset]]
symbol = "KNC"
buy_rate = "120_000_000_000_000_000_000"
sell_rate = "12_000_000_000_000_000"
compact_buy = 12
compact_sell = -5
control = { min_record_resolution = 2, max_per_epoch_imbalance = 4000, max_total_imbalance = 48000 }
qty_buy = { x = [15, 30, 70], y = [8, 30, 70] }
qty_sell = { x = [155, 305, 705], y = [10, 32, 78] }
imbalance_buy = { x = [180, 330, 900, 1500], y = [35, 150, 310, 1100] }
imbalance_sell = { x = [-1500, -900, -330, -180], y = [-1100, -310, -150, -35] }
"#;

    #[test]
    fn test_build_legacy_reserve() {
        let config = parse(LEGACY_RESERVE).unwrap();
        let engine = build_engine(&config).unwrap();
        let knc = AssetId::from_symbol("KNC").unwrap();

        assert_eq!(engine.asset_basic_data(knc), (true, true));
        assert_eq!(
            engine.get_rate(knc, 3000, Side::Buy, 17),
            131_069_719_598_400_000_000
        );
        assert_eq!(
            engine.get_rate(knc, 3000, Side::Sell, 400),
            11_914_702_722_000_000
        );
    }

    #[test]
    fn test_enhanced_defaults_and_imbalance_replay() {
        let data = r#"
compact_epoch = 10

[[asset]]
symbol = "OMG"
buy_rate = 1_000_000_000_000_000_000
sell_rate = "1000000000000000000"
control = { min_record_resolution = 1, max_per_epoch_imbalance = 1000, max_total_imbalance = "2000" }
imbalance = [{ delta = 1500, epoch = 9 }]
"#;
        let engine = build_engine(&parse(data).unwrap()).unwrap();
        let omg = AssetId::from_symbol("OMG").unwrap();

        assert_eq!(engine.step_mode(), StepMode::Enhanced);
        assert_eq!(engine.get_imbalance(omg, 0, 10).unwrap().total, 1500);
        assert_eq!(engine.get_rate(omg, 10, Side::Buy, 499), PRECISION);
        assert_eq!(engine.get_rate(omg, 10, Side::Buy, 500), 0);
    }

    #[test]
    fn test_qty_curves_rejected_in_enhanced_mode() {
        let data = r#"
[[asset]]
symbol = "ZRX"
buy_rate = 1
sell_rate = 1
qty_buy = { x = [1], y = [1] }
"#;
        let err = build_engine(&parse(data).unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("quantity step functions"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse("[[asset]]\nsymbol = \"KNC\"\nbuy_rate = 1\nsell_rate = 1\ncolour = 3\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LEGACY_RESERVE.as_bytes()).unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.assets.len(), 1);
        assert_eq!(config.engine.step_mode, StepMode::Legacy);
        assert!(load(Path::new("/nonexistent/reserve.toml")).is_err());
    }

    #[test]
    fn test_example_file_builds() {
        let data = include_str!("../reserve.example.toml");
        let engine = build_engine(&parse(data).unwrap()).unwrap();
        assert!(!engine.listed_assets().is_empty());
    }
}
