//! Tabular sources, sinks, and the run log
//!
//! This module handles all persistence:
//! - delimited file reading/writing (CSV, TSV, fixed-width)
//! - SQLite table loading
//! - the timestamped run-progress log

mod csv_file;
mod fixed_width;
mod run_log;
mod sqlite;

pub use csv_file::{CsvFileReader, CsvFileWriter};
pub use fixed_width::FixedWidthReader;
pub use run_log::RunLog;
pub use sqlite::{SqliteTableWriter, connect_sqlite};
