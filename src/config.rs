//! Run configuration
//!
//! Each pipeline gets an explicit configuration value built from environment
//! variables (dotenv-sourced in the binary). Stages receive the config they
//! need instead of reading process-wide constants.

use eyre::{Context, Result};
use std::path::PathBuf;
use url::Url;

const DEFAULT_BANKS_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Configuration for the toll consolidation workflow.
///
/// Environment variables (all optional):
/// - `TOLL_ARCHIVE`: the compressed source archive
/// - `TOLL_STAGING_DIR`: working directory for staged files
/// - `TOLL_RUN_LOG`: stage-completion log file
#[derive(Debug, Clone)]
pub struct TollConfig {
    pub archive: PathBuf,
    pub staging_dir: PathBuf,
    pub run_log: PathBuf,
}

impl TollConfig {
    pub fn from_env() -> Self {
        Self {
            archive: env_or("TOLL_ARCHIVE", "tolldata.tgz").into(),
            staging_dir: env_or("TOLL_STAGING_DIR", "staging").into(),
            run_log: env_or("TOLL_RUN_LOG", "toll_run_log.txt").into(),
        }
    }
}

/// Configuration for the banks pipeline.
///
/// Environment variables (all optional):
/// - `BANKS_URL`: page with the ranked bank table
/// - `EXCHANGE_RATE_CSV`: currency-code/rate mapping file
/// - `BANKS_OUTPUT_CSV`: flat-file sink
/// - `BANKS_DB`: SQLite database path
/// - `BANKS_TABLE`: table sink name
/// - `BANKS_RUN_LOG`: progress log file
#[derive(Debug, Clone)]
pub struct BanksConfig {
    pub url: Url,
    pub exchange_rates: PathBuf,
    pub output_csv: PathBuf,
    pub db_path: PathBuf,
    pub table: String,
    pub run_log: PathBuf,
}

impl BanksConfig {
    pub fn from_env() -> Result<Self> {
        let url_str = env_or("BANKS_URL", DEFAULT_BANKS_URL);
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid BANKS_URL: {}", url_str))?;
        Ok(Self {
            url,
            exchange_rates: env_or("EXCHANGE_RATE_CSV", "exchange_rate.csv").into(),
            output_csv: env_or("BANKS_OUTPUT_CSV", "largest_banks.csv").into(),
            db_path: env_or("BANKS_DB", "Banks.db").into(),
            table: env_or("BANKS_TABLE", "Largest_banks"),
            run_log: env_or("BANKS_RUN_LOG", "code_log.txt").into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn toll_config_defaults() {
        unsafe {
            std::env::remove_var("TOLL_ARCHIVE");
            std::env::remove_var("TOLL_STAGING_DIR");
        }
        let config = TollConfig::from_env();
        assert_eq!(config.archive, PathBuf::from("tolldata.tgz"));
        assert_eq!(config.staging_dir, PathBuf::from("staging"));
    }

    #[test]
    #[serial]
    fn banks_config_env_overrides() {
        unsafe {
            std::env::set_var("BANKS_URL", "https://example.com/banks");
            std::env::set_var("BANKS_TABLE", "banks_test");
        }
        let config = BanksConfig::from_env().unwrap();
        assert_eq!(config.url.as_str(), "https://example.com/banks");
        assert_eq!(config.table, "banks_test");
        unsafe {
            std::env::remove_var("BANKS_URL");
            std::env::remove_var("BANKS_TABLE");
        }
    }

    #[test]
    #[serial]
    fn invalid_banks_url_is_an_error() {
        unsafe {
            std::env::set_var("BANKS_URL", "not a url");
        }
        assert!(BanksConfig::from_env().is_err());
        unsafe {
            std::env::remove_var("BANKS_URL");
        }
    }
}
