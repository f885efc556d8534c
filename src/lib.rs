//! Staged ETL pipelines
//!
//! Two independent linear pipelines behind one scheduler-style CLI:
//! - `etl_toll_data`: unpack, extract, consolidate, and transform delimited
//!   toll-traffic files through a staging directory
//! - `etl_banks`: scrape the ranked bank table, convert currencies, and
//!   persist to a CSV file and a SQLite table

pub mod banks;
pub mod batch;
pub mod cli;
pub mod config;
pub mod etl;
pub mod storage;
pub mod toll;
pub mod transform;
pub mod workflow;

// Re-exports for convenience
pub use batch::{RecordBatch, Value};
pub use etl::{Pipeline, TableReader, TableWriter, Transform};
pub use storage::{CsvFileReader, CsvFileWriter, FixedWidthReader, RunLog, SqliteTableWriter};
pub use workflow::{Workflow, WorkflowSpec};
