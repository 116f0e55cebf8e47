//! Instrument universe: the built in list or a symbol file.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Liquid US and European names. Repeated symbols are intentional and each
/// occurrence is scored on its own.
pub const DEFAULT_UNIVERSE: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "NVDA", "NFLX", "PYPL", "ADBE",
    "INTC", "AMD", "CSCO", "ORCL", "CRM", "IBM", "UBER", "LYFT", "SHOP", "SQ",
    "BA", "NKE", "DIS", "V", "MA", "JPM", "BAC", "GS", "C", "WFC",
    "KO", "PEP", "MCD", "SBUX", "PG", "JNJ", "PFE", "MRK", "ABBV", "GILD",
    "T", "VZ", "XOM", "CVX", "BP", "TOT", "RDS.A", "DOW", "BHP", "RIO",
    "SAP", "SIE", "BMW", "ALV", "DAI", "VOW3", "BAYN", "NESN", "ROG", "ULVR",
    "ZM", "TWTR", "SNAP", "DOCU", "SHOP", "SQ", "UBS", "BN", "DTE", "CVS",
    "COST", "F", "GM", "HD", "LOW", "AMGN", "CSX", "FDX", "CAT", "MMM",
    "ADP", "ACN", "NOW", "LIN", "LMT", "BA", "HON", "RTX", "GE", "SPGI",
    "BLK", "AXP", "GS", "ORCL", "INTU", "ISRG", "AMAT", "MU", "QCOM", "TSM",
    "SHOP", "ZM", "PYPL", "DOCU", "CRM", "TEAM", "TWLO", "OKTA", "SNOW", "ROKU",
];

pub fn default_universe() -> Vec<String> {
    DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect()
}

/// Parse comma separated symbols as given on the command line
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read symbols from CSV or plain text.
///
/// The first column of every record is the symbol. A header row is skipped
/// when its first cell is `symbol` or `ticker`. Blank cells and `#` comments
/// are ignored; order and duplicates are kept.
pub fn read_universe<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut symbols = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("invalid universe record {}", line + 1))?;
        let Some(first) = record.get(0) else {
            continue;
        };
        if first.is_empty() {
            continue;
        }
        if line == 0 && matches!(first.to_lowercase().as_str(), "symbol" | "ticker") {
            continue;
        }
        symbols.push(first.to_uppercase());
    }
    Ok(symbols)
}

/// Load a universe file from disk
pub fn load_universe(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open universe file {}", path.display()))?;
    let symbols = read_universe(file)?;
    if symbols.is_empty() {
        anyhow::bail!("universe file {} contains no symbols", path.display());
    }
    info!("📋 Loaded {} symbols from {}", symbols.len(), path.display());
    Ok(symbols)
}
