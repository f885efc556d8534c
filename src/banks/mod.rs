//! Largest-banks market-cap pipeline
//!
//! One uninterrupted top-to-bottom run: scrape the ranked bank table,
//! convert the USD market-cap column into GBP/EUR/INR columns, persist to a
//! CSV file and a SQLite table, then print three fixed report queries.
//! Progress checkpoints go to the run log.

mod extract;
mod rates;
mod report;

pub use extract::{BankTableReader, parse_bank_table};
pub use rates::load_exchange_rates;
pub use report::run_query;

use crate::config::BanksConfig;
use crate::etl::{TableReader, TableWriter, Transform};
use crate::storage::{CsvFileWriter, RunLog, SqliteTableWriter, connect_sqlite};
use crate::transform::CurrencyConversion;
use crate::workflow::WorkflowSpec;

use eyre::Result;

/// Declarative description of the banks pipeline for `list`/`inspect`.
/// The run itself is a single straight-line script, not a staged workflow.
pub fn banks_spec() -> WorkflowSpec {
    WorkflowSpec {
        id: "etl_banks".to_string(),
        description: "Scrape the largest-banks table and report market caps".to_string(),
        schedule: None,
        owner: None,
        notify: Vec::new(),
        retries: 0,
        retry_delay_secs: 0,
        stages: vec![
            "extract".to_string(),
            "transform".to_string(),
            "load_to_csv".to_string(),
            "load_to_db".to_string(),
            "report".to_string(),
        ],
    }
}

/// Run the full banks pipeline.
///
/// Extract and CSV-load failures abort the run. A table-load failure is
/// logged and the run continues; report-query failures are printed by
/// `run_query` and never abort.
pub async fn run_banks(config: &BanksConfig) -> Result<()> {
    let run_log = RunLog::new(&config.run_log);
    run_log.record("Preliminaries complete. Initiating ETL process")?;

    let mut batch = BankTableReader::new(config.url.clone()).read().await?;
    run_log.record("Data extraction complete. Initiating Transformation process")?;

    let rates = load_exchange_rates(&config.exchange_rates)?;
    CurrencyConversion::market_cap(rates).apply(&mut batch)?;
    run_log.record("Data transformation complete. Initiating Loading process")?;

    CsvFileWriter::new(&config.output_csv)
        .with_headers(true)
        .write(&batch)
        .await?;
    run_log.record("Data saved to CSV file")?;

    let pool = connect_sqlite(&config.db_path).await?;
    run_log.record("SQL Connection initiated")?;

    let writer =
        SqliteTableWriter::new(pool.clone(), config.table.as_str()).with_rename("Bank name", "Name");
    // a table-load failure is surfaced in the log but does not abort the run
    if let Err(error) = writer.write(&batch).await {
        log::error!("{:#}", error);
    }
    run_log.record("Data loaded to Database as table. Running the query")?;

    run_query(&pool, &format!("SELECT * FROM {}", config.table)).await;
    run_query(
        &pool,
        &format!("SELECT AVG(MC_GBP_Billion) FROM {}", config.table),
    )
    .await;
    run_query(&pool, &format!("SELECT Name FROM {} LIMIT 5", config.table)).await;
    run_log.record("Process Complete")?;

    pool.close().await;
    run_log.record("Server Connection closed")?;
    Ok(())
}
