//! Exchange-rate table
//!
//! Loaded once per run from a local CSV and read-only thereafter.

use eyre::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Load a `Currency,Rate` CSV into a code -> multiplier map.
pub fn load_exchange_rates(path: impl AsRef<Path>) -> Result<HashMap<String, f64>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open exchange rates {}", path.display()))?;

    let mut rates = HashMap::new();
    for row in reader.deserialize() {
        let row: RateRow =
            row.with_context(|| format!("Malformed rate row in {}", path.display()))?;
        rates.insert(row.currency, row.rate);
    }
    log::debug!("Loaded {} exchange rate(s)", rates.len());
    Ok(rates)
}
