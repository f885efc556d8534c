//! Currency conversion transform
//!
//! Adds derived market-cap columns from an exchange-rate table loaded once
//! per run and read-only during the transform.

use crate::batch::{RecordBatch, Value};
use crate::etl::Transform;
use eyre::{Result, eyre};
use std::collections::HashMap;

/// Adds one derived numeric column per target currency, each equal to the
/// source column multiplied by that currency's rate and rounded to two
/// decimal places.
///
/// # Example
/// ```
/// use etl_pipelines::batch::{RecordBatch, Value};
/// use etl_pipelines::etl::Transform;
/// use etl_pipelines::transform::CurrencyConversion;
/// use std::collections::HashMap;
///
/// let rates = HashMap::from([("GBP".to_string(), 0.8)]);
/// let convert = CurrencyConversion::new("MC_USD_Billion", rates)
///     .with_target("GBP", "MC_GBP_Billion");
///
/// let mut batch = RecordBatch::new(vec!["MC_USD_Billion".into()]);
/// batch.push_row(vec![Value::Number(100.0)]).unwrap();
/// convert.apply(&mut batch).unwrap();
/// assert_eq!(batch.number_column("MC_GBP_Billion").unwrap(), vec![80.0]);
/// ```
pub struct CurrencyConversion {
    source: String,
    rates: HashMap<String, f64>,
    targets: Vec<(String, String)>, // (currency code, new column name)
}

impl CurrencyConversion {
    pub fn new(source: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            source: source.into(),
            rates,
            targets: Vec::new(),
        }
    }

    /// The standard market-cap conversion set: GBP, EUR, and INR billions
    /// derived from `MC_USD_Billion`.
    pub fn market_cap(rates: HashMap<String, f64>) -> Self {
        Self::new("MC_USD_Billion", rates)
            .with_target("GBP", "MC_GBP_Billion")
            .with_target("EUR", "MC_EUR_Billion")
            .with_target("INR", "MC_INR_Billion")
    }

    pub fn with_target(mut self, currency: impl Into<String>, column: impl Into<String>) -> Self {
        self.targets.push((currency.into(), column.into()));
        self
    }

    fn rate(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| eyre!("no exchange rate for currency '{}'", currency))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Transform for CurrencyConversion {
    fn apply(&self, batch: &mut RecordBatch) -> Result<()> {
        let source = batch.number_column(&self.source)?;
        for (currency, column) in &self.targets {
            let rate = self.rate(currency)?;
            let values = source
                .iter()
                .map(|usd| Value::Number(round2(usd * rate)))
                .collect();
            batch.add_column(column, values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> HashMap<String, f64> {
        HashMap::from([
            ("GBP".to_string(), 0.8),
            ("EUR".to_string(), 0.93),
            ("INR".to_string(), 82.5),
        ])
    }

    #[test]
    fn adds_rounded_market_cap_columns() {
        let mut batch = RecordBatch::new(vec!["MC_USD_Billion".into()]);
        batch.push_row(vec![Value::Number(100.0)]).unwrap();

        CurrencyConversion::market_cap(rates())
            .apply(&mut batch)
            .unwrap();

        assert_eq!(batch.number_column("MC_GBP_Billion").unwrap(), vec![80.0]);
        assert_eq!(batch.number_column("MC_EUR_Billion").unwrap(), vec![93.0]);
        assert_eq!(batch.number_column("MC_INR_Billion").unwrap(), vec![8250.0]);
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        let mut batch = RecordBatch::new(vec!["MC_USD_Billion".into()]);
        batch.push_row(vec![Value::Number(432.92)]).unwrap();

        CurrencyConversion::market_cap(rates())
            .apply(&mut batch)
            .unwrap();

        // 432.92 * 0.93 = 402.6156
        assert_eq!(batch.number_column("MC_EUR_Billion").unwrap(), vec![402.62]);
    }

    #[test]
    fn missing_rate_is_an_error() {
        let mut batch = RecordBatch::new(vec!["MC_USD_Billion".into()]);
        batch.push_row(vec![Value::Number(1.0)]).unwrap();

        let convert =
            CurrencyConversion::new("MC_USD_Billion", HashMap::new()).with_target("GBP", "out");
        assert!(convert.apply(&mut batch).is_err());
    }

    #[test]
    fn non_numeric_source_is_an_error() {
        let mut batch = RecordBatch::new(vec!["MC_USD_Billion".into()]);
        batch.push_row(vec![Value::text("n/a")]).unwrap();

        assert!(CurrencyConversion::market_cap(rates()).apply(&mut batch).is_err());
    }
}
