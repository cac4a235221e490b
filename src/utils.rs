use anyhow::Result;
use chrono::{DateTime, Utc};
use ethers::{types::{Address, U256}, utils::to_checksum};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::str::FromStr;

use crate::error::{AnalyzerError, AnalyzerResult};

pub const PROJECT_NAME: &str = "token_analyzer";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn setup_logger(level: &str) -> Result<()> {
    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Red,
        error: Color::BrightRed,
    };
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout())
        .level(LevelFilter::Error)
        .level_for(PROJECT_NAME, level)
        .level_for("tower_http", level)
        .apply()?;

    Ok(())
}

/// Parses a 20-byte hex account id, with or without `0x`, in any letter case.
pub fn parse_address(input: &str) -> AnalyzerResult<Address> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.len() != 40 {
        return Err(AnalyzerError::InvalidAddress(input.to_string()));
    }
    let bytes =
        hex::decode(hex_part).map_err(|_| AnalyzerError::InvalidAddress(input.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Last 20 bytes of a 32-byte indexed log topic.
pub fn topic_to_address(topic: &str) -> Option<Address> {
    let hex_part = topic.strip_prefix("0x").unwrap_or(topic);
    if !hex_part.is_ascii() || hex_part.len() < 40 {
        return None;
    }
    let bytes = hex::decode(&hex_part[hex_part.len() - 40..]).ok()?;
    Some(Address::from_slice(&bytes))
}

/// Exact decimal rendering of `amount / 10^decimals`, trailing zeros trimmed.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

/// Nearest f64 to `amount / 10^decimals`.
pub fn to_display_amount(amount: U256, decimals: u8) -> f64 {
    format_amount(amount, decimals).parse().unwrap_or(0.0)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_amount_scaling() {
        let amount = U256::from_dec_str("1500000000000000000").unwrap();
        assert_eq!(to_display_amount(amount, 18), 1.5);
        assert_eq!(format_amount(amount, 18), "1.5");
        assert_eq!(to_display_amount(U256::from(42), 0), 42.0);
        assert_eq!(format_amount(U256::from(5), 6), "0.000005");
        assert_eq!(format_amount(U256::zero(), 18), "0");
    }

    #[test]
    fn test_display_amount_large_decimals() {
        // Beyond what 10^d fits in a U256; rendering stays exact.
        let rendered = format_amount(U256::from(1), 200);
        assert!(rendered.starts_with("0.000"));
        assert!(rendered.ends_with('1'));
        assert_eq!(to_display_amount(U256::from(1), 200), 1e-200);
    }

    #[test]
    fn test_parse_address() {
        let lower = parse_address("0x51f1774249fc2b0c2603542ac6184ae1d048351d").unwrap();
        let mixed = parse_address("0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(checksum(&lower), "0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d");

        assert!(parse_address("51f1774249fc2b0c2603542ac6184ae1d048351d").is_ok());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz f1774249fc2b0c2603542ac6184ae1d0483").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_topic_to_address() {
        let topic = "0x00000000000000000000000051f1774249fc2b0c2603542ac6184ae1d048351d";
        let address = topic_to_address(topic).unwrap();
        assert_eq!(checksum(&address), "0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d");

        let zero = "0x0000000000000000000000000000000000000000000000000000000000000000";
        assert_eq!(topic_to_address(zero), Some(Address::zero()));
        assert_eq!(topic_to_address("0x1234"), None);
    }
}
