//! Output destinations for serialized workbooks
//!
//! An [`OutputSink`] is bound to one destination and one resolved file name,
//! and is used for exactly one delivery. The sink supplies the byte channel;
//! the caller pours the workbook into it. Who flushes and who closes that
//! channel is stated by each sink's [`ChannelPolicy`].
//!
//! | Sink | Channel | Flush | Close |
//! |------|---------|-------|-------|
//! | [`FileSink`] | opened per write | yes | yes |
//! | [`StreamSink`] | borrowed from caller | yes | no |
//! | [`HttpResponseSink`] | response body | no | no |

mod factory;
mod file;
mod http;
mod stream;

use crate::error::Result;
use std::io::Write;

pub use factory::{Destination, SinkFactory, SinkKind};
pub use file::FileSink;
pub use http::{HttpResponse, HttpResponseSink, ResponseBuffer};
pub use stream::StreamSink;

/// Extension every delivered workbook name carries
pub const XLSX_EXTENSION: &str = ".xlsx";

/// MIME type of an OOXML spreadsheet
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name used when the caller does not give one
pub const DEFAULT_FILE_NAME: &str = "export";

/// Append [`XLSX_EXTENSION`] unless `name` already ends with it
///
/// The check is a literal, case-sensitive suffix match, so applying it twice
/// is the same as applying it once.
///
/// # Examples
///
/// ```
/// use xlsx_export::output::ensure_xlsx_extension;
///
/// assert_eq!(ensure_xlsx_extension("report"), "report.xlsx");
/// assert_eq!(ensure_xlsx_extension("report.xlsx"), "report.xlsx");
/// assert_eq!(ensure_xlsx_extension("report.XLSX"), "report.XLSX.xlsx");
/// ```
pub fn ensure_xlsx_extension(name: &str) -> String {
    if name.ends_with(XLSX_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, XLSX_EXTENSION)
    }
}

/// Responsibilities a sink takes for its channel after writing
///
/// Each sink's [`write`](OutputSink::write) follows its own policy: it
/// flushes only when `flush` is set, and drops the channel before returning
/// only when `close` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    /// The sink flushes the channel once the workbook is written
    pub flush: bool,
    /// The sink closes (drops) the channel on every exit path
    pub close: bool,
}

/// Callback that pours serialized workbook bytes into a channel
pub type WorkbookWrite<'w> = dyn FnMut(&mut dyn Write) -> std::io::Result<()> + 'w;

/// A destination for one serialized workbook
pub trait OutputSink {
    /// Resolved file name, always ending with [`XLSX_EXTENSION`]
    fn file_name(&self) -> &str;

    /// Flush/close responsibilities of this sink
    fn channel_policy(&self) -> ChannelPolicy;

    /// Supply the channel to `workbook` and finish the delivery
    fn write(&mut self, workbook: &mut WorkbookWrite<'_>) -> Result<()>;

    /// Deliver already serialized bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write(&mut |channel: &mut dyn Write| channel.write_all(bytes))
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn file_name(&self) -> &str {
        (**self).file_name()
    }

    fn channel_policy(&self) -> ChannelPolicy {
        (**self).channel_policy()
    }

    fn write(&mut self, workbook: &mut WorkbookWrite<'_>) -> Result<()> {
        (**self).write(workbook)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}
