//! Error types for the export pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by errors whose origin is caller code
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while exporting records to a workbook
///
/// Each variant names the stage that failed, so callers can tell unreadable
/// data apart from an unwritable destination.
#[derive(Error, Debug)]
pub enum ExcelError {
    /// A column accessor could not read its value from a record
    #[error("Failed to access field: {field}")]
    ReflectionAccess {
        field: String,
        #[source]
        source: BoxError,
    },

    /// Serializing the table into the XLSX package failed
    #[error("There was a problem creating the Excel workbook")]
    WorkbookGeneration(#[source] BoxError),

    /// The file destination could not be opened or written
    #[error("Failed to write Excel file to disk: {}", path.display())]
    FileDelivery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A caller-owned channel (stream or HTTP response) rejected the bytes
    #[error("Failed to write Excel to output stream")]
    StreamDelivery(#[source] io::Error),

    /// The API was used in a way that can never succeed
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ExcelError {
    /// Wrap any error raised by the workbook encoder
    pub fn generation<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ExcelError::WorkbookGeneration(err.into())
    }

    /// True when the destination failed rather than the data
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self,
            ExcelError::FileDelivery { .. } | ExcelError::StreamDelivery(_)
        )
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ExcelError>;
