//! Machine-readable JSON report.

use std::path::{Path, PathBuf};

use kvconform_domain::RunReport;
use thiserror::Error;
use tracing::info;

use crate::serialization::{SerializationError, to_json_stable};

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum ReportWriteError {
    /// The report could not be serialized.
    #[error(transparent)]
    Serialize(#[from] SerializationError),

    /// The file could not be written.
    #[error("failed to write report to {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Writes `report` as stable JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_json_report(report: &RunReport, path: &Path) -> Result<(), ReportWriteError> {
    let json = to_json_stable(report)?;
    let io_error = |source: std::io::Error| ReportWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, json).await.map_err(io_error)?;

    info!(path = %path.display(), "Wrote JSON report");
    Ok(())
}
