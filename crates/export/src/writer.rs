use ingest::Row;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::ExportError;
use crate::schema::{dataset_schema, rows_to_batch};

const ROWS_PER_BATCH: usize = 8192;

pub struct ParquetWriter {
    properties: WriterProperties,
}

impl ParquetWriter {
    pub fn new(properties: WriterProperties) -> Self {
        Self { properties }
    }

    /// Write `rows` to `path`, replacing any existing file.
    ///
    /// The table is written to a sibling `.tmp` file first and renamed into
    /// place once complete.
    pub fn write(&self, rows: &[Row], path: &Path) -> Result<(), ExportError> {
        let tmp = temporary_path(path)?;

        if let Err(e) = self.write_file(rows, &tmp) {
            if tmp.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    warn!(
                        path = %tmp.display(),
                        error = %cleanup,
                        "Failed to remove temporary file"
                    );
                }
            }
            return Err(e);
        }

        fs::rename(&tmp, path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), rows = rows.len(), "Dataset written");
        Ok(())
    }

    fn write_file(&self, rows: &[Row], path: &Path) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = dataset_schema();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(self.properties.clone()))?;

        for chunk in rows.chunks(ROWS_PER_BATCH) {
            let batch = rows_to_batch(schema.clone(), chunk)?;
            writer.write(&batch)?;
            debug!(rows = batch.num_rows(), "Wrote record batch");
        }

        writer.close()?;
        Ok(())
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        let properties = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .build();
        Self::new(properties)
    }
}

fn temporary_path(path: &Path) -> Result<PathBuf, ExportError> {
    let Some(name) = path.file_name() else {
        return Err(ExportError::InvalidPath(path.to_path_buf()));
    };
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_path() {
        assert_eq!(
            temporary_path(Path::new("/out/data.parquet")).unwrap(),
            PathBuf::from("/out/data.parquet.tmp")
        );
        assert!(matches!(
            temporary_path(Path::new("/")),
            Err(ExportError::InvalidPath(_))
        ));
    }
}
