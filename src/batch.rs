//! Record batches
//!
//! A `RecordBatch` is the unit of data handed between pipeline stages: an
//! ordered set of columns and width-checked rows. Extract stages create
//! batches, transforms mutate them in place, and sinks only borrow them.

use eyre::{Result, bail};
use std::fmt;

/// A single cell value: trimmed text or a floating-point number.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    /// Build a text value from anything string-like.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// An ordered collection of uniformly-structured rows.
///
/// The column set is fixed at construction and stable for the lifetime of a
/// pipeline run; columns may be added or rewritten, but every row always has
/// exactly one value per column.
///
/// # Example
/// ```
/// use etl_pipelines::batch::{RecordBatch, Value};
///
/// let mut batch = RecordBatch::new(vec!["Rank".into(), "MC_USD_Billion".into()]);
/// batch.push_row(vec![Value::text("1"), Value::Number(432.92)]).unwrap();
/// assert_eq!(batch.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Positional column names `f1..fN`, for headerless delimited files.
    pub fn positional(width: usize) -> Self {
        Self::new((1..=width).map(|i| format!("f{}", i)).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row. The row width must match the column set.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row has {} fields but batch has {} columns",
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    /// Add a new column, or rewrite an existing one of the same name.
    ///
    /// `values` must hold exactly one value per row.
    pub fn add_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            bail!(
                "column '{}' has {} values but batch has {} rows",
                name,
                values.len(),
                self.rows.len()
            );
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Read a whole column as numbers.
    pub fn number_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| eyre::eyre!("no column named '{}'", name))?;
        self.rows
            .iter()
            .map(|row| {
                row[idx]
                    .as_number()
                    .ok_or_else(|| eyre::eyre!("column '{}' holds non-numeric data", name))
            })
            .collect()
    }

    /// Apply `f` to every value of one column, in place.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self
            .column_index(name)
            .ok_or_else(|| eyre::eyre!("no column named '{}'", name))?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(())
    }

    /// Column-wise concatenation, row-aligned by position.
    ///
    /// Appends every column of `other` to this batch; both batches must have
    /// the same row count. This is the `paste -d','` contract.
    pub fn paste(&mut self, other: RecordBatch) -> Result<()> {
        if other.len() != self.len() {
            bail!(
                "cannot paste batches of different heights: {} vs {} rows",
                self.len(),
                other.len()
            );
        }
        self.columns.extend(other.columns);
        for (row, extra) in self.rows.iter_mut().zip(other.rows) {
            row.extend(extra);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(fields: &[&str]) -> Vec<Value> {
        fields.iter().map(|f| Value::text(*f)).collect()
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut batch = RecordBatch::positional(3);
        assert!(batch.push_row(text_row(&["a", "b"])).is_err());
        assert!(batch.push_row(text_row(&["a", "b", "c"])).is_ok());
    }

    #[test]
    fn add_column_appends_and_rewrites() {
        let mut batch = RecordBatch::new(vec!["name".into()]);
        batch.push_row(text_row(&["hsbc"])).unwrap();
        batch.push_row(text_row(&["citi"])).unwrap();

        batch
            .add_column("cap", vec![Value::Number(1.0), Value::Number(2.0)])
            .unwrap();
        assert_eq!(batch.columns(), ["name", "cap"]);

        batch
            .add_column("cap", vec![Value::Number(3.0), Value::Number(4.0)])
            .unwrap();
        assert_eq!(batch.columns(), ["name", "cap"]);
        assert_eq!(batch.number_column("cap").unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn add_column_rejects_wrong_height() {
        let mut batch = RecordBatch::new(vec!["name".into()]);
        batch.push_row(text_row(&["hsbc"])).unwrap();
        assert!(batch.add_column("cap", vec![]).is_err());
    }

    #[test]
    fn paste_is_fieldwise_concatenation() {
        let mut left = RecordBatch::positional(2);
        left.push_row(text_row(&["a1", "a2"])).unwrap();
        left.push_row(text_row(&["b1", "b2"])).unwrap();

        let mut right = RecordBatch::new(vec!["f3".into()]);
        right.push_row(text_row(&["a3"])).unwrap();
        right.push_row(text_row(&["b3"])).unwrap();

        left.paste(right).unwrap();
        assert_eq!(left.columns(), ["f1", "f2", "f3"]);
        assert_eq!(left.rows()[0], text_row(&["a1", "a2", "a3"]));
        assert_eq!(left.rows()[1], text_row(&["b1", "b2", "b3"]));
    }

    #[test]
    fn paste_rejects_mismatched_heights() {
        let mut left = RecordBatch::positional(1);
        left.push_row(text_row(&["a"])).unwrap();
        let right = RecordBatch::positional(1);
        assert!(left.paste(right).is_err());
    }
}
