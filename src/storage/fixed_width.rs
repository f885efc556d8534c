//! Fixed-column-width file source

use crate::batch::{RecordBatch, Value};
use crate::etl::TableReader;

use eyre::{Context, Result};
use std::path::Path;

/// Read a byte-column range out of a fixed-width text file.
///
/// `start..=end` is 1-based and inclusive, matching `cut -c`. The selected
/// slice is split on spaces into fields, which is how the payment file packs
/// its payment and vehicle codes. Lines shorter than the range yield
/// whatever tail is available.
pub struct FixedWidthReader {
    path: std::path::PathBuf,
    start: usize,
    end: usize,
}

impl FixedWidthReader {
    pub fn new(path: impl AsRef<Path>, start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && start <= end);
        Self {
            path: path.as_ref().to_path_buf(),
            start,
            end,
        }
    }

    fn read_all(&self) -> Result<RecordBatch> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let rows: Vec<Vec<Value>> = content
            .lines()
            .map(|line| {
                let begin = (self.start - 1).min(line.len());
                let finish = self.end.min(line.len());
                let slice = line.get(begin..finish).unwrap_or("");
                slice.split(' ').map(Value::text).collect()
            })
            .collect();

        let mut batch = RecordBatch::positional(rows.first().map_or(0, Vec::len));
        for row in rows {
            batch.push_row(row)?;
        }
        Ok(batch)
    }
}

impl TableReader for FixedWidthReader {
    async fn read(&self) -> Result<RecordBatch> {
        self.read_all()
    }
}
