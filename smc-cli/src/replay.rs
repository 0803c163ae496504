//! `smc replay`: per-instrument batch replay with file outputs.
//!
//! For each instrument writes, under the output directory:
//! - `<name>.ticks.jsonl`: one `TickOutput` per bar
//! - `<name>.trades.csv`: round trips implied by the intents
//! - `<name>.summary.json`: counts, returns and the config fingerprint

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use smc_core::data::align_higher_timeframe;
use smc_core::engine::{replay, ReplaySummary};
use smc_core::StrategyConfig;
use tracing::info;

use crate::load::read_bars;

/// `NAME=BASE_CSV[,HTF_CSV]`
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSpec {
    pub name: String,
    pub base: PathBuf,
    pub higher: Option<PathBuf>,
}

impl FromStr for InstrumentSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((name, files)) = s.split_once('=') else {
            bail!("expected NAME=BASE_CSV[,HTF_CSV], got '{s}'");
        };
        if name.trim().is_empty() {
            bail!("instrument name is empty in '{s}'");
        }
        let mut paths = files.split(',').map(str::trim);
        let base = match paths.next() {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => bail!("missing base CSV in '{s}'"),
        };
        let higher = paths.next().filter(|p| !p.is_empty()).map(PathBuf::from);
        if paths.next().is_some() {
            bail!("too many files in '{s}'");
        }
        Ok(Self {
            name: name.trim().to_string(),
            base,
            higher,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentReport {
    pub instrument: String,
    pub config_fingerprint: String,
    #[serde(flatten)]
    pub summary: ReplaySummary,
}

pub fn run_instrument(
    spec: &InstrumentSpec,
    config: &StrategyConfig,
    output_dir: &Path,
) -> Result<InstrumentReport> {
    let base = read_bars(&spec.base)?;
    let htf = match &spec.higher {
        Some(path) => {
            let higher = read_bars(path)?;
            align_higher_timeframe(
                &base,
                config.timeframes.entry,
                &higher,
                config.timeframes.higher,
            )
        }
        None => vec![None; base.len()],
    };
    info!(instrument = %spec.name, bars = base.len(), "replaying");

    let result = replay(config, &base, &htf)
        .with_context(|| format!("replay failed for {}", spec.name))?;

    let ticks_path = output_dir.join(format!("{}.ticks.jsonl", spec.name));
    let mut out = BufWriter::new(
        File::create(&ticks_path).with_context(|| format!("creating {}", ticks_path.display()))?,
    );
    for tick in &result.ticks {
        serde_json::to_writer(&mut out, tick)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    let trades_path = output_dir.join(format!("{}.trades.csv", spec.name));
    let mut wtr = csv::Writer::from_path(&trades_path)
        .with_context(|| format!("creating {}", trades_path.display()))?;
    for trade in &result.trades {
        wtr.serialize(trade)?;
    }
    wtr.flush()?;

    let report = InstrumentReport {
        instrument: spec.name.clone(),
        config_fingerprint: config.fingerprint()?,
        summary: result.summary,
    };
    let summary_path = output_dir.join(format!("{}.summary.json", spec.name));
    fs::write(&summary_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    Ok(report)
}

pub fn print_summary(reports: &[InstrumentReport]) {
    println!();
    println!(
        "{:<12} {:>8} {:>7} {:>6} {:>6} {:>6} {:>10} {:>7}",
        "instrument", "bars", "warmup", "long", "short", "wins", "return %", "halted"
    );
    for r in reports {
        let s = &r.summary;
        println!(
            "{:<12} {:>8} {:>7} {:>6} {:>6} {:>6} {:>10.2} {:>7}",
            r.instrument,
            s.bars,
            s.warmup_bars,
            s.long_entries,
            s.short_entries,
            s.wins,
            s.total_return_pct,
            s.halted
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instrument_specs() {
        let spec: InstrumentSpec = "BTC=base.csv,htf.csv".parse().unwrap();
        assert_eq!(spec.name, "BTC");
        assert_eq!(spec.base, PathBuf::from("base.csv"));
        assert_eq!(spec.higher, Some(PathBuf::from("htf.csv")));

        let spec: InstrumentSpec = "ETH=eth.csv".parse().unwrap();
        assert_eq!(spec.higher, None);

        assert!("no-equals".parse::<InstrumentSpec>().is_err());
        assert!("=base.csv".parse::<InstrumentSpec>().is_err());
        assert!("X=".parse::<InstrumentSpec>().is_err());
        assert!("X=a,b,c".parse::<InstrumentSpec>().is_err());
    }
}
