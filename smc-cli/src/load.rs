//! OHLCV CSV loading.
//!
//! Expected header: `timestamp,open,high,low,close,volume` with an optional
//! `is_final` column (defaults to true). Timestamps are bar open times, either
//! `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a plain date.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use smc_core::data::canonicalize;
use smc_core::domain::Bar;

#[derive(Debug, Deserialize)]
struct Row {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    is_final: Option<bool>,
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    bail!("unrecognized timestamp '{s}'")
}

pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut bars = Vec::new();
    for (line, row) in reader.deserialize::<Row>().enumerate() {
        let row = row.with_context(|| format!("{}: bad row {}", path.display(), line + 2))?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp)
                .with_context(|| format!("{}: row {}", path.display(), line + 2))?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            is_final: row.is_final.unwrap_or(true),
        });
    }
    if bars.is_empty() {
        bail!("{} contains no bars", path.display());
    }
    Ok(canonicalize(bars))
}
