//! Selection of the sink implementation for a destination

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use super::{FileSink, HttpResponse, HttpResponseSink, OutputSink, StreamSink, DEFAULT_FILE_NAME};
use crate::error::{ExcelError, Result};

/// Kind of destination a sink delivers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SinkKind {
    File,
    Stream,
    HttpResponse,
}

/// Destination handle passed to [`SinkFactory::create`]
pub enum Destination<'a> {
    /// Filesystem path (normalized to end with `.xlsx`)
    Path(PathBuf),
    /// Caller-owned byte stream
    Stream(&'a mut dyn Write),
    /// HTTP response receiving headers and body
    Response(&'a mut dyn HttpResponse),
}

impl Destination<'_> {
    /// The sink kind this handle is shaped for
    pub fn kind(&self) -> SinkKind {
        match self {
            Destination::Path(_) => SinkKind::File,
            Destination::Stream(_) => SinkKind::Stream,
            Destination::Response(_) => SinkKind::HttpResponse,
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Destination::Stream(_) => f.write_str("Stream(..)"),
            Destination::Response(_) => f.write_str("Response(..)"),
        }
    }
}

/// Builds output sinks
///
/// # Examples
///
/// ```
/// use xlsx_export::output::{Destination, OutputSink, SinkFactory, SinkKind};
///
/// let mut buffer = Vec::new();
/// let sink = SinkFactory::create(
///     SinkKind::Stream,
///     Destination::Stream(&mut buffer),
///     Some("daily"),
/// )?;
/// assert_eq!(sink.file_name(), "daily.xlsx");
/// # Ok::<(), xlsx_export::ExcelError>(())
/// ```
pub struct SinkFactory;

impl SinkFactory {
    /// Construct the sink for `kind`
    ///
    /// `file_name` is the download or display name; for [`SinkKind::File`]
    /// the path alone decides where bytes go. A destination whose shape does
    /// not match `kind` is rejected before any I/O happens.
    pub fn create<'a>(
        kind: SinkKind,
        destination: Destination<'a>,
        file_name: Option<&str>,
    ) -> Result<Box<dyn OutputSink + 'a>> {
        let name = file_name.unwrap_or(DEFAULT_FILE_NAME);

        let sink: Box<dyn OutputSink + 'a> = match (kind, destination) {
            (SinkKind::File, Destination::Path(path)) => Box::new(FileSink::new(path)),
            (SinkKind::Stream, Destination::Stream(stream)) => {
                Box::new(StreamSink::with_file_name(stream, name))
            }
            (SinkKind::HttpResponse, Destination::Response(response)) => {
                Box::new(HttpResponseSink::new(response, name))
            }
            (kind, destination) => {
                return Err(ExcelError::InvalidState(format!(
                    "{:?} sink cannot deliver to a {:?} destination",
                    kind,
                    destination.kind()
                )))
            }
        };

        tracing::debug!(?kind, file_name = sink.file_name(), "created output sink");
        Ok(sink)
    }

    /// Sink writing to `path` (`.xlsx` appended when missing)
    pub fn for_file_output<P: Into<PathBuf>>(path: P) -> FileSink {
        FileSink::new(path.into())
    }

    /// Sink writing to `stream`; flushes it after writing, never closes it
    pub fn for_stream_output<W: Write>(stream: W) -> StreamSink<W> {
        StreamSink::new(stream)
    }

    /// Sink sending an attachment named `file_name` through `response`
    pub fn for_http_response<'a>(
        response: &'a mut dyn HttpResponse,
        file_name: &str,
    ) -> HttpResponseSink<'a> {
        HttpResponseSink::new(response, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ResponseBuffer, XLSX_CONTENT_TYPE};

    #[test]
    fn test_dispatch_on_kind() {
        let sink = SinkFactory::create(
            SinkKind::File,
            Destination::Path(PathBuf::from("out/report")),
            None,
        )
        .unwrap();
        assert_eq!(sink.file_name(), "report.xlsx");
        assert!(sink.channel_policy().close);

        let mut buffer = Vec::new();
        let mut sink =
            SinkFactory::create(SinkKind::Stream, Destination::Stream(&mut buffer), None).unwrap();
        assert_eq!(sink.file_name(), "export.xlsx");
        sink.write_bytes(b"abc").unwrap();
        drop(sink);
        assert_eq!(buffer, b"abc");

        let mut response = ResponseBuffer::new();
        let mut sink = SinkFactory::create(
            SinkKind::HttpResponse,
            Destination::Response(&mut response),
            Some("q1"),
        )
        .unwrap();
        sink.write_bytes(b"xyz").unwrap();
        drop(sink);
        assert_eq!(response.header("Content-Type"), Some(XLSX_CONTENT_TYPE));
        assert_eq!(response.body(), b"xyz");
    }

    #[test]
    fn test_mismatched_destination_fails_fast() {
        let mut buffer = Vec::new();
        match SinkFactory::create(SinkKind::File, Destination::Stream(&mut buffer), None) {
            Err(ExcelError::InvalidState(message)) => {
                assert_eq!(message, "File sink cannot deliver to a Stream destination")
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("mismatched destination was accepted"),
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_destination_kind() {
        let mut response = ResponseBuffer::new();
        assert_eq!(Destination::Path("a".into()).kind(), SinkKind::File);
        assert_eq!(
            Destination::Response(&mut response).kind(),
            SinkKind::HttpResponse
        );
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(
            SinkFactory::for_file_output("out/report.xlsx").path(),
            std::path::Path::new("out/report.xlsx")
        );
        assert_eq!(SinkFactory::for_stream_output(Vec::new()).file_name(), "export.xlsx");

        let mut response = ResponseBuffer::new();
        let sink = SinkFactory::for_http_response(&mut response, "월간보고서");
        assert_eq!(sink.file_name(), "월간보고서.xlsx");
    }
}
