//! Toll-data consolidation workflow
//!
//! A fixed, linear chain of staged file operations over a staging
//! directory: unpack the source archive, normalize field subsets from three
//! differently-delimited files into comma-separated form, paste them
//! side-by-side, and uppercase the vehicle-type field. Every stage reads
//! and writes files, so a failed run restarts from the beginning with no
//! partial state to reconcile.

mod stages;

pub use stages::{
    consolidate_data, extract_data_from_csv, extract_data_from_fixed_width, extract_data_from_tsv,
    transform_data, unzip_data,
};

use crate::config::TollConfig;
use crate::workflow::Workflow;
use std::time::Duration;

/// Build the `etl_toll_data` workflow over the given configuration.
///
/// Stage order is total: unzip -> csv extract -> tsv extract -> fixed-width
/// extract -> consolidate -> transform. Metadata mirrors the production
/// schedule: daily, one retry five minutes after a failure, owner notified
/// when a stage gives up.
pub fn toll_workflow(config: &TollConfig) -> Workflow {
    let cfg = config.clone();
    Workflow::new("etl_toll_data")
        .description("Extract, consolidate, and transform toll traffic data")
        .schedule("@daily")
        .owner("data-eng")
        .notify_on_failure("data-eng@example.com")
        .retries(1, Duration::from_secs(300))
        .stage("unzip_data", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { unzip_data(&cfg).await }
            }
        })
        .stage("extract_data_from_csv", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { extract_data_from_csv(&cfg).await.map(|_| ()) }
            }
        })
        .stage("extract_data_from_tsv", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { extract_data_from_tsv(&cfg).await.map(|_| ()) }
            }
        })
        .stage("extract_data_from_fixed_width", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { extract_data_from_fixed_width(&cfg).await.map(|_| ()) }
            }
        })
        .stage("consolidate_data", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { consolidate_data(&cfg).await.map(|_| ()) }
            }
        })
        .stage("transform_data", {
            let cfg = cfg.clone();
            move || {
                let cfg = cfg.clone();
                async move { transform_data(&cfg).await.map(|_| ()) }
            }
        })
}
