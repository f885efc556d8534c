//! TableWriter trait for persisting record batches to sinks

use crate::batch::RecordBatch;
use eyre::Result;

/// A tabular sink writer.
///
/// Implementors define how to persist a record batch to destinations like:
/// - comma-separated files (overwriting any previous output)
/// - relational tables
///
/// Sinks only borrow the batch; a batch is never mutated by loading.
pub trait TableWriter: Send + Sync {
    /// Write the batch to the destination.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if writing fails (I/O, SQL, etc.)
    fn write(&self, batch: &RecordBatch) -> impl std::future::Future<Output = Result<usize>> + Send;
}
