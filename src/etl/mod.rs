//! Core ETL (Extract, Transform, Load) seams
//!
//! Trait definitions for building linear data pipelines that read a record
//! batch from a tabular source, rework it in place, and write it to a sink.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::TableReader;
pub use load::TableWriter;
pub use pipeline::Pipeline;
pub use transform::Transform;
