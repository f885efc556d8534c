//! TableReader trait for extracting record batches from tabular sources

use crate::batch::RecordBatch;
use eyre::Result;

/// A tabular source reader.
///
/// Implementors define how to produce a record batch from sources like:
/// - delimited files (CSV, TSV, fixed-width)
/// - HTML data tables fetched over HTTP
///
/// # Example
/// ```no_run
/// use etl_pipelines::batch::RecordBatch;
/// use etl_pipelines::etl::TableReader;
/// use eyre::Result;
///
/// struct EmptyReader;
///
/// impl TableReader for EmptyReader {
///     async fn read(&self) -> Result<RecordBatch> {
///         Ok(RecordBatch::positional(0))
///     }
/// }
/// ```
pub trait TableReader: Send + Sync {
    /// Read the whole source into a record batch.
    ///
    /// # Errors
    /// Returns an error if reading fails (network, I/O, parsing, etc.)
    fn read(&self) -> impl std::future::Future<Output = Result<RecordBatch>> + Send;
}
