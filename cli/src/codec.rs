//! Offline helpers: compact blobs and step function evaluation

use anyhow::{Context, Result};
use colored::Colorize;
use rate_model::{decode_compact_blob, encode_compact_blob, eval_point, eval_range, StepMode};
use serde_json::json;

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    hex::decode(digits).with_context(|| format!("Invalid hex blob: {}", text))
}

pub fn compact_encode(deltas: &[i8], as_json: bool) -> Result<()> {
    let blob = encode_compact_blob(deltas)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Cannot encode compact deltas")?;
    let encoded = format!("0x{}", to_hex(&blob));
    if as_json {
        println!("{}", json!({ "blob": encoded, "deltas": deltas }));
    } else {
        println!("{}", encoded.bright_green());
    }
    Ok(())
}

pub fn compact_decode(blob: &str, as_json: bool) -> Result<()> {
    let bytes = from_hex(blob)?;
    let deltas = decode_compact_blob(&bytes)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Cannot decode compact blob")?;
    if as_json {
        println!("{}", json!({ "deltas": deltas }));
        return Ok(());
    }
    println!("{}", "=== Compact Deltas ===".bright_green().bold());
    for (field, delta) in deltas.iter().enumerate() {
        println!("{} {:>4} ({:+} bps)", format!("[{:2}]", field).bright_cyan(), delta, i32::from(*delta) * 10);
    }
    Ok(())
}

/// Evaluate a curve given on the command line
///
/// `to` is `None` for legacy point evaluation.
pub fn step_eval(xs: &[i128], ys: &[i128], from: i128, to: Option<i128>, as_json: bool) -> Result<()> {
    let (mode, bps) = match to {
        None => (StepMode::Legacy, eval_point(from, xs, ys)),
        Some(to) => (StepMode::Enhanced, eval_range(from, to, xs, ys)),
    };
    let bps = bps
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Cannot evaluate step function")?;

    if as_json {
        println!(
            "{}",
            json!({ "mode": mode, "bps": bps.to_string() })
        );
    } else {
        println!("{} {:+} bps", "✓".bright_green(), bps);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(to_hex(&[0x80, 0x00, 0xff]), "8000ff");
        assert_eq!(from_hex("0x8000ff").unwrap(), vec![0x80, 0x00, 0xff]);
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
        assert!(from_hex("aéa").is_err());
        assert!(from_hex("éé").is_err());
    }

    #[test]
    fn test_decode_rejects_non_ascii_blob() {
        assert!(compact_decode("aéa", true).is_err());
        assert!(compact_decode("0x80ff", true).is_ok());
    }

    #[test]
    fn test_oversized_blob_rejected() {
        assert!(compact_decode(&"00".repeat(15), true).is_err());
        assert!(compact_encode(&[0; 15], true).is_err());
    }

    #[test]
    fn test_step_eval_modes() {
        assert!(step_eval(&[15, 30, 70], &[8, 30, 70], 17, None, true).is_ok());
        assert!(step_eval(&[15], &[8], 0, Some(30), true).is_err());
        assert!(step_eval(&[15], &[8, 9], 0, Some(30), true).is_ok());
    }
}
