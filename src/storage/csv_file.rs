//! Delimited file source and sink

use crate::batch::{RecordBatch, Value};
use crate::etl::{TableReader, TableWriter};

use eyre::{Context, Result};
use std::path::Path;

/// Read a delimited file into a record batch.
///
/// Defaults to comma-delimited and headerless (columns are named `f1..fN`,
/// the way `cut` numbers fields). A field projection can be applied during
/// the read, so subset selection happens in the extract stage where it
/// belongs.
///
/// # Example
/// ```no_run
/// use etl_pipelines::storage::CsvFileReader;
///
/// // fields 5-7 of a tab-separated file, normalized to comma form
/// let reader = CsvFileReader::new("staging/tollplaza-data.tsv")
///     .with_delimiter(b'\t')
///     .with_fields(vec![4, 5, 6]);
/// ```
pub struct CsvFileReader {
    path: std::path::PathBuf,
    delimiter: u8,
    has_headers: bool,
    fields: Option<Vec<usize>>,
}

impl CsvFileReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
            has_headers: false,
            fields: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Keep only the given 0-based field indices, in the given order.
    pub fn with_fields(mut self, fields: Vec<usize>) -> Self {
        self.fields = Some(fields);
        self
    }

    fn project(&self, record: &csv::StringRecord) -> Vec<Value> {
        match &self.fields {
            Some(indices) => indices
                .iter()
                .map(|&i| Value::text(record.get(i).unwrap_or("")))
                .collect(),
            None => record.iter().map(Value::text).collect(),
        }
    }

    fn read_all(&self) -> Result<RecordBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let columns = if self.has_headers {
            let headers = reader.headers()?.clone();
            match &self.fields {
                Some(indices) => indices
                    .iter()
                    .map(|&i| headers.get(i).unwrap_or_default().to_string())
                    .collect(),
                None => headers.iter().map(str::to_string).collect(),
            }
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Malformed record in {}", self.path.display()))?;
            rows.push(self.project(&record));
        }

        let mut batch = if self.has_headers {
            RecordBatch::new(columns)
        } else {
            RecordBatch::positional(rows.first().map_or(0, Vec::len))
        };
        for row in rows {
            batch.push_row(row)?;
        }
        Ok(batch)
    }
}

impl TableReader for CsvFileReader {
    async fn read(&self) -> Result<RecordBatch> {
        self.read_all()
    }
}

/// Write a record batch as comma-separated text, overwriting any existing
/// file at the path.
pub struct CsvFileWriter {
    path: std::path::PathBuf,
    headers: bool,
}

impl CsvFileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            headers: false,
        }
    }

    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    fn write_all(&self, batch: &RecordBatch) -> Result<usize> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;

        if self.headers {
            writer.write_record(batch.columns())?;
        }
        for row in batch.rows() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(batch.len())
    }
}

impl TableWriter for CsvFileWriter {
    async fn write(&self, batch: &RecordBatch) -> Result<usize> {
        self.write_all(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn round_trips_headerless_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b,c\nd,e,f\n").unwrap();

        let batch = CsvFileReader::new(&path).read().await.unwrap();
        assert_eq!(batch.columns(), ["f1", "f2", "f3"]);
        assert_eq!(batch.len(), 2);

        let out = dir.path().join("out.csv");
        let written = CsvFileWriter::new(&out).write(&batch).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a,b,c\nd,e,f\n");
    }

    #[tokio::test]
    async fn projects_selected_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.tsv");
        std::fs::write(&path, "a\tb\tc\td\n1\t2\t3\t4\n").unwrap();

        let batch = CsvFileReader::new(&path)
            .with_delimiter(b'\t')
            .with_fields(vec![1, 3])
            .read()
            .await
            .unwrap();
        assert_eq!(batch.columns(), ["f1", "f2"]);
        assert_eq!(batch.rows()[0], vec![Value::text("b"), Value::text("d")]);
        assert_eq!(batch.rows()[1], vec![Value::text("2"), Value::text("4")]);
    }

    #[tokio::test]
    async fn reads_header_row_as_column_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rates.csv");
        std::fs::write(&path, "Currency,Rate\nGBP,0.8\n").unwrap();

        let batch = CsvFileReader::new(&path)
            .with_headers(true)
            .read()
            .await
            .unwrap();
        assert_eq!(batch.columns(), ["Currency", "Rate"]);
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn writer_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,content\nstale,content\nstale,content\n").unwrap();

        let mut batch = RecordBatch::positional(2);
        batch
            .push_row(vec![Value::text("fresh"), Value::text("row")])
            .unwrap();
        CsvFileWriter::new(&path).write(&batch).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh,row\n");
    }
}
