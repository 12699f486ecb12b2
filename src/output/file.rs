//! Workbook delivery to a file on disk

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{ChannelPolicy, OutputSink, WorkbookWrite, XLSX_EXTENSION};
use crate::error::{ExcelError, Result};

/// Writes the workbook to a path, creating or truncating the file
///
/// The file is opened inside [`write`](OutputSink::write) and dropped before
/// it returns, on success and on failure alike. Nothing touches the
/// filesystem before that call.
///
/// # Examples
///
/// ```
/// use xlsx_export::output::{FileSink, OutputSink};
///
/// let sink = FileSink::new("out/report");
/// assert!(sink.path().ends_with("out/report.xlsx"));
/// assert_eq!(sink.file_name(), "report.xlsx");
/// ```
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    file_name: String,
}

impl FileSink {
    const POLICY: ChannelPolicy = ChannelPolicy {
        flush: true,
        close: true,
    };

    /// Bind to `path`, appending `.xlsx` when missing
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = normalize_path(path.as_ref());
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| super::ensure_xlsx_extension(super::DEFAULT_FILE_NAME));

        FileSink { path, file_name }
    }

    /// Resolved output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    if path.as_os_str().to_string_lossy().ends_with(XLSX_EXTENSION) {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(XLSX_EXTENSION);
    PathBuf::from(raw)
}

impl OutputSink for FileSink {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn channel_policy(&self) -> ChannelPolicy {
        Self::POLICY
    }

    fn write(&mut self, workbook: &mut WorkbookWrite<'_>) -> Result<()> {
        let delivery_error = |source: std::io::Error| ExcelError::FileDelivery {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(delivery_error)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);

        workbook(&mut writer).map_err(delivery_error)?;
        if self.channel_policy().flush {
            writer.flush().map_err(delivery_error)?;
        }

        tracing::trace!(path = %self.path.display(), "workbook written to file");
        Ok(())
    }
}
