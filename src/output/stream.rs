//! Workbook delivery to a caller-owned byte stream

use std::io::Write;

use super::{ensure_xlsx_extension, ChannelPolicy, OutputSink, WorkbookWrite, DEFAULT_FILE_NAME};
use crate::error::{ExcelError, Result};

/// Writes the workbook into any [`Write`] and flushes it afterwards
///
/// The stream is never closed: its lifetime belongs to the caller, who can
/// take it back with [`into_inner`](StreamSink::into_inner) or simply pass
/// `&mut W`.
///
/// # Examples
///
/// ```
/// use xlsx_export::output::{OutputSink, StreamSink};
///
/// let mut buffer = Vec::new();
/// StreamSink::new(&mut buffer).write_bytes(b"PK")?;
/// assert_eq!(buffer, b"PK");
/// # Ok::<(), xlsx_export::ExcelError>(())
/// ```
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    stream: W,
    file_name: String,
}

impl<W: Write> StreamSink<W> {
    const POLICY: ChannelPolicy = ChannelPolicy {
        flush: true,
        close: false,
    };

    pub fn new(stream: W) -> Self {
        Self::with_file_name(stream, DEFAULT_FILE_NAME)
    }

    /// Wrap `stream`, recording `file_name` (normalized) for the caller
    pub fn with_file_name(stream: W, file_name: &str) -> Self {
        StreamSink {
            stream,
            file_name: ensure_xlsx_extension(file_name),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    /// Give the stream back to the caller, still open
    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> OutputSink for StreamSink<W> {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn channel_policy(&self) -> ChannelPolicy {
        Self::POLICY
    }

    fn write(&mut self, workbook: &mut WorkbookWrite<'_>) -> Result<()> {
        workbook(&mut self.stream).map_err(ExcelError::StreamDelivery)?;
        if self.channel_policy().flush {
            self.stream.flush().map_err(ExcelError::StreamDelivery)?;
        }
        tracing::trace!(file_name = %self.file_name, "workbook written to stream");
        Ok(())
    }
}
