//! Rate quotes

use anyhow::Result;
use colored::Colorize;
use reserve_rates::{AssetId, Epoch, RateEngine, Side, PRECISION};
use serde_json::json;

/// Render an 18-decimal rate as a decimal string
pub fn format_rate(rate: u128) -> String {
    let whole = rate / PRECISION;
    let frac = rate % PRECISION;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:018}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

fn format_bps(bps: i128) -> String {
    format!("{:+} bps", bps)
}

pub fn show_quote(
    engine: &RateEngine,
    asset: AssetId,
    side: Side,
    qty: u128,
    epoch: Epoch,
    as_json: bool,
) -> Result<()> {
    let outcome = engine.quote(asset, epoch, side, qty);

    if as_json {
        let value = match &outcome {
            Ok(quote) => serde_json::to_value(quote)?,
            Err(reason) => json!({
                "asset": asset,
                "side": side,
                "qty": qty.to_string(),
                "rate": "0",
                "rejection": reason.to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "=== Rate Quote ===".bright_green().bold());
    println!("{} {}", "Asset:".bright_cyan(), asset);
    println!("{} {:?}", "Side:".bright_cyan(), side);
    println!("{} {}", "Qty:".bright_cyan(), qty);
    println!("{} {}", "Epoch:".bright_cyan(), epoch);

    match outcome {
        Ok(quote) => {
            println!("{} {}", "Base rate:".bright_cyan(), format_rate(quote.base_rate));
            println!("{} {}", "Compact:".bright_cyan(), format_bps(quote.compact_bps));
            if side.is_buy() {
                println!("{} {}", "Dest qty:".bright_cyan(), quote.dst_qty);
            }
            if engine.step_mode() == reserve_rates::StepMode::Legacy {
                println!("{} {}", "Qty step:".bright_cyan(), format_bps(quote.qty_bps));
            }
            println!(
                "{} {} (change {:+})",
                "Imbalance step:".bright_cyan(),
                format_bps(quote.imbalance_bps),
                quote.imbalance_change
            );
            println!(
                "\n{} {} ({})",
                "✓".bright_green(),
                format_rate(quote.rate).bright_green().bold(),
                quote.rate
            );
        }
        Err(reason) => {
            println!("\n{} {}", "✗ rate 0:".bright_red().bold(), reason);
        }
    }
    Ok(())
}
