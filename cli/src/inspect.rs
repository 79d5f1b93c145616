//! Asset inspection and listing

use anyhow::{Context, Result};
use colored::Colorize;
use reserve_rates::{AssetId, Curve, CurveKind, Epoch, RateEngine, Side};
use serde_json::json;

use crate::quote::format_rate;

fn curve_json(curve: Option<&Curve>) -> serde_json::Value {
    match curve {
        Some(curve) => json!({
            "x": curve.xs().iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            "y": curve.ys().iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        }),
        None => serde_json::Value::Null,
    }
}

fn print_curve(label: &str, curve: Option<&Curve>) {
    match curve {
        Some(curve) if curve.y_len() > 0 => {
            println!("  {} X={:?} Y={:?}", label.bright_cyan(), curve.xs(), curve.ys());
        }
        Some(_) => println!("  {} {}", label.bright_cyan(), "(empty)".dimmed()),
        None => {}
    }
}

/// Everything the engine knows about one asset
pub fn inspect_asset(
    engine: &RateEngine,
    asset: AssetId,
    epoch: Option<Epoch>,
    as_json: bool,
) -> Result<()> {
    let info = engine.asset(asset).context("Cannot inspect asset")?;
    let compact = engine.get_compact_data(asset)?;
    let last_update = engine.last_update_epoch(asset)?;
    let epoch = epoch.unwrap_or(last_update);
    let imbalance = engine.get_imbalance(asset, last_update, epoch)?;
    let curves = engine.step_curves(asset)?;
    let expiry = last_update.saturating_add(engine.valid_duration());

    if as_json {
        let value = json!({
            "asset": asset,
            "index": info.index,
            "enabled": info.enabled,
            "base_buy_rate": info.base_buy_rate.to_string(),
            "base_sell_rate": info.base_sell_rate.to_string(),
            "control": info.control,
            "compact": compact,
            "last_update_epoch": last_update,
            "expires_after": expiry,
            "imbalance": {
                "epoch": epoch,
                "total": imbalance.total.to_string(),
                "current_epoch": imbalance.current_epoch.to_string(),
            },
            "curves": {
                "qty_buy": curve_json(curves.curve(CurveKind::Qty, Side::Buy)),
                "qty_sell": curve_json(curves.curve(CurveKind::Qty, Side::Sell)),
                "imbalance_buy": curve_json(curves.curve(CurveKind::Imbalance, Side::Buy)),
                "imbalance_sell": curve_json(curves.curve(CurveKind::Imbalance, Side::Sell)),
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", format!("=== {} ===", asset).bright_green().bold());
    let status = if info.enabled {
        "enabled".bright_green()
    } else {
        "disabled".yellow()
    };
    println!("{} {} (index {})", "Status:".bright_cyan(), status, info.index);
    println!("{} {}", "Base buy:".bright_cyan(), format_rate(info.base_buy_rate));
    println!("{} {}", "Base sell:".bright_cyan(), format_rate(info.base_sell_rate));
    println!(
        "{} bucket {} field {} buy {:+} sell {:+} (x10 bps)",
        "Compact:".bright_cyan(),
        compact.bucket,
        compact.field,
        compact.buy_delta,
        compact.sell_delta
    );
    println!(
        "{} {} (valid through {})",
        "Last update:".bright_cyan(),
        last_update,
        expiry
    );
    println!(
        "{} resolution {} / epoch max {} / total max {}",
        "Control:".bright_cyan(),
        info.control.min_record_resolution,
        info.control.max_per_epoch_imbalance,
        info.control.max_total_imbalance
    );
    println!(
        "{} total {} / epoch {} {}",
        "Imbalance:".bright_cyan(),
        imbalance.total,
        epoch,
        imbalance.current_epoch
    );

    println!("{}", "Step functions:".bright_cyan());
    print_curve("qty buy:", curves.curve(CurveKind::Qty, Side::Buy));
    print_curve("qty sell:", curves.curve(CurveKind::Qty, Side::Sell));
    print_curve("imbalance buy:", curves.curve(CurveKind::Imbalance, Side::Buy));
    print_curve("imbalance sell:", curves.curve(CurveKind::Imbalance, Side::Sell));
    Ok(())
}

/// Listed assets in listing order
pub fn list_assets(engine: &RateEngine, as_json: bool) -> Result<()> {
    if as_json {
        let mut rows = Vec::new();
        for asset in engine.listed_assets() {
            let info = engine.asset(*asset)?;
            rows.push(json!({
                "asset": asset,
                "index": info.index,
                "enabled": info.enabled,
                "base_buy_rate": info.base_buy_rate.to_string(),
                "base_sell_rate": info.base_sell_rate.to_string(),
            }));
        }
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "=== Listed Assets ===".bright_green().bold());
    if engine.listed_assets().is_empty() {
        println!("{}", "No assets listed".dimmed());
        return Ok(());
    }
    for asset in engine.listed_assets() {
        let info = engine.asset(*asset)?;
        let marker = if info.enabled {
            "✓".bright_green()
        } else {
            "✗".yellow()
        };
        println!(
            "{} {:<8} buy {:<24} sell {}",
            marker,
            asset.to_string(),
            format_rate(info.base_buy_rate),
            format_rate(info.base_sell_rate)
        );
    }
    println!(
        "\n{} {} assets in {} compact buckets",
        "Total:".bright_cyan(),
        engine.listed_assets().len(),
        engine.compact_bucket_count()
    );
    Ok(())
}
