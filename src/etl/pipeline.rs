//! Pipeline orchestration for ETL operations

use super::{TableReader, TableWriter, Transform};
use eyre::{Result, bail};

/// A linear ETL pipeline: one reader, an ordered list of transforms, one
/// writer.
///
/// # Example
/// ```no_run
/// use etl_pipelines::etl::Pipeline;
/// use etl_pipelines::storage::{CsvFileReader, CsvFileWriter};
/// use etl_pipelines::transform::FieldUppercase;
///
/// # async fn example() -> eyre::Result<()> {
/// let rows = Pipeline::new(
///     CsvFileReader::new("staging/extracted_data.csv"),
///     CsvFileWriter::new("staging/transformed_data.csv"),
/// )
/// .with_transform(FieldUppercase::new("f4"))
/// .run()
/// .await?;
/// println!("wrote {} rows", rows);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<R, W> {
    reader: R,
    transforms: Vec<Box<dyn Transform>>,
    writer: W,
}

impl<R, W> Pipeline<R, W>
where
    R: TableReader,
    W: TableWriter,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            transforms: Vec::new(),
            writer,
        }
    }

    /// Append a transform to the chain.
    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Run the complete pipeline: read, transform in order, write.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if any stage fails, or if a transform changes the
    /// row count.
    pub async fn run(&self) -> Result<usize> {
        log::debug!("Reading from source...");
        let mut batch = self.reader.read().await?;
        log::info!(
            "Extracted {} row(s), {} column(s)",
            batch.len(),
            batch.columns().len()
        );

        if batch.is_empty() {
            log::warn!("No rows extracted, pipeline complete");
            return Ok(0);
        }

        let height = batch.len();
        for transform in &self.transforms {
            transform.apply(&mut batch)?;
            if batch.len() != height {
                bail!(
                    "transform changed the row count: {} -> {}",
                    height,
                    batch.len()
                );
            }
        }
        log::info!("Transformed batch has {} column(s)", batch.columns().len());

        log::debug!("Writing to sink...");
        let count = self.writer.write(&batch).await?;
        log::info!("Loaded {} row(s)", count);

        Ok(count)
    }
}
