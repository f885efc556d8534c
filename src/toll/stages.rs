//! Toll stage implementations
//!
//! Each stage is a small file-to-file operation inside the staging
//! directory. Staged file names are part of the inter-stage contract.

use crate::config::TollConfig;
use crate::etl::{Pipeline, TableReader, TableWriter};
use crate::storage::{CsvFileReader, CsvFileWriter, FixedWidthReader};
use crate::transform::FieldUppercase;

use eyre::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;

// Source files inside the archive
const VEHICLE_CSV: &str = "vehicle-data.csv";
const TOLLPLAZA_TSV: &str = "tollplaza-data.tsv";
const PAYMENT_TXT: &str = "payment-data.txt";

// Staged intermediates and outputs
const CSV_DATA: &str = "csv_data.csv";
const TSV_DATA: &str = "tsv_data.csv";
const FIXED_WIDTH_DATA: &str = "fixed_width_data.csv";
const EXTRACTED_DATA: &str = "extracted_data.csv";
const TRANSFORMED_DATA: &str = "transformed_data.csv";

// Byte columns of the payment/vehicle codes in the fixed-width file
const PAYMENT_FIELD_START: usize = 59;
const PAYMENT_FIELD_END: usize = 67;

/// Unpack the gzip-compressed tar archive into the staging directory.
pub async fn unzip_data(config: &TollConfig) -> Result<()> {
    std::fs::create_dir_all(&config.staging_dir).with_context(|| {
        format!(
            "Failed to create staging directory {}",
            config.staging_dir.display()
        )
    })?;
    let file = File::open(&config.archive)
        .with_context(|| format!("Failed to open archive {}", config.archive.display()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .unpack(&config.staging_dir)
        .with_context(|| format!("Failed to unpack {}", config.archive.display()))?;
    log::info!(
        "Unpacked {} into {}",
        config.archive.display(),
        config.staging_dir.display()
    );
    Ok(())
}

/// Fields 1-4 of the comma-separated vehicle file.
pub async fn extract_data_from_csv(config: &TollConfig) -> Result<usize> {
    Pipeline::new(
        CsvFileReader::new(config.staging_dir.join(VEHICLE_CSV)).with_fields(vec![0, 1, 2, 3]),
        CsvFileWriter::new(config.staging_dir.join(CSV_DATA)),
    )
    .run()
    .await
}

/// Fields 5-7 of the tab-separated toll plaza file, normalized to commas.
pub async fn extract_data_from_tsv(config: &TollConfig) -> Result<usize> {
    Pipeline::new(
        CsvFileReader::new(config.staging_dir.join(TOLLPLAZA_TSV))
            .with_delimiter(b'\t')
            .with_fields(vec![4, 5, 6]),
        CsvFileWriter::new(config.staging_dir.join(TSV_DATA)),
    )
    .run()
    .await
}

/// Byte columns 59-67 of the fixed-width payment file, space-split into
/// comma fields.
pub async fn extract_data_from_fixed_width(config: &TollConfig) -> Result<usize> {
    Pipeline::new(
        FixedWidthReader::new(
            config.staging_dir.join(PAYMENT_TXT),
            PAYMENT_FIELD_START,
            PAYMENT_FIELD_END,
        ),
        CsvFileWriter::new(config.staging_dir.join(FIXED_WIDTH_DATA)),
    )
    .run()
    .await
}

/// Paste the three staged field subsets side-by-side, row-aligned by
/// position. The three row counts must match.
pub async fn consolidate_data(config: &TollConfig) -> Result<usize> {
    let mut merged = CsvFileReader::new(config.staging_dir.join(CSV_DATA))
        .read()
        .await?;
    let tsv = CsvFileReader::new(config.staging_dir.join(TSV_DATA))
        .read()
        .await?;
    let fixed = CsvFileReader::new(config.staging_dir.join(FIXED_WIDTH_DATA))
        .read()
        .await?;

    merged
        .paste(tsv)
        .context("csv and tsv subsets are misaligned")?;
    merged
        .paste(fixed)
        .context("fixed-width subset is misaligned")?;

    CsvFileWriter::new(config.staging_dir.join(EXTRACTED_DATA))
        .write(&merged)
        .await
}

/// Uppercase the vehicle-type field (field 4) of the consolidated file.
pub async fn transform_data(config: &TollConfig) -> Result<usize> {
    Pipeline::new(
        CsvFileReader::new(config.staging_dir.join(EXTRACTED_DATA)),
        CsvFileWriter::new(config.staging_dir.join(TRANSFORMED_DATA)),
    )
    .with_transform(FieldUppercase::new("f4"))
    .run()
    .await
}
