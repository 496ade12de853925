//! Columnar persistence of the aggregated dataset.

pub mod schema;
pub mod writer;

pub use schema::{dataset_schema, rows_to_batch};
pub use writer::ParquetWriter;

use arrow::error::ArrowError;
use ingest::Row;
use parquet::errors::ParquetError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output path {0:?} does not name a file")]
    InvalidPath(PathBuf),

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Parquet(#[from] ParquetError),
}

/// Write rows to a Parquet file with the default writer settings
pub fn write_parquet(rows: &[Row], path: &Path) -> Result<(), ExportError> {
    ParquetWriter::default().write(rows, path)
}
