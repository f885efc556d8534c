//! Transform trait for in-place record batch transformation

use crate::batch::RecordBatch;
use eyre::Result;

/// A deterministic per-field transformation applied to a record batch.
///
/// Transforms mutate the batch in place: columns may be added or rewritten,
/// but the row count must never change. The pipeline runner enforces that
/// invariant after every transform.
///
/// # Example
/// ```
/// use etl_pipelines::batch::{RecordBatch, Value};
/// use etl_pipelines::etl::Transform;
/// use eyre::Result;
///
/// struct TrimColumn(String);
///
/// impl Transform for TrimColumn {
///     fn apply(&self, batch: &mut RecordBatch) -> Result<()> {
///         batch.map_column(&self.0, |v| match v {
///             Value::Text(s) => Value::text(s.trim()),
///             other => other.clone(),
///         })
///     }
/// }
/// ```
pub trait Transform: Send + Sync {
    /// Apply the transformation to the batch.
    ///
    /// # Errors
    /// Returns an error if the transformation fails (missing column, bad
    /// value, unknown currency, etc.)
    fn apply(&self, batch: &mut RecordBatch) -> Result<()>;
}
