//! Uppercase transform for a single text column

use crate::batch::{RecordBatch, Value};
use crate::etl::Transform;
use eyre::Result;

/// Uppercases one text column in place. Numeric cells pass through
/// untouched. Idempotent: an already-uppercase field is unchanged.
///
/// # Example
/// ```
/// use etl_pipelines::batch::{RecordBatch, Value};
/// use etl_pipelines::etl::Transform;
/// use etl_pipelines::transform::FieldUppercase;
///
/// let mut batch = RecordBatch::positional(1);
/// batch.push_row(vec![Value::text("truck")]).unwrap();
/// FieldUppercase::new("f1").apply(&mut batch).unwrap();
/// assert_eq!(batch.rows()[0][0], Value::text("TRUCK"));
/// ```
pub struct FieldUppercase {
    column: String,
}

impl FieldUppercase {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Transform for FieldUppercase {
    fn apply(&self, batch: &mut RecordBatch) -> Result<()> {
        batch.map_column(&self.column, |value| match value {
            Value::Text(s) => Value::Text(s.to_uppercase()),
            other => other.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_designated_column_only() {
        let mut batch = RecordBatch::positional(2);
        batch
            .push_row(vec![Value::text("car"), Value::text("van")])
            .unwrap();

        FieldUppercase::new("f2").apply(&mut batch).unwrap();
        assert_eq!(batch.rows()[0][0], Value::text("car"));
        assert_eq!(batch.rows()[0][1], Value::text("VAN"));
    }

    #[test]
    fn is_idempotent() {
        let mut batch = RecordBatch::positional(1);
        batch.push_row(vec![Value::text("TRUCK")]).unwrap();

        let transform = FieldUppercase::new("f1");
        transform.apply(&mut batch).unwrap();
        let once = batch.clone();
        transform.apply(&mut batch).unwrap();
        assert_eq!(batch, once);
    }

    #[test]
    fn fails_on_unknown_column() {
        let mut batch = RecordBatch::positional(1);
        batch.push_row(vec![Value::text("x")]).unwrap();
        assert!(FieldUppercase::new("f9").apply(&mut batch).is_err());
    }
}
