//! Workbook delivery as an HTTP file download
//!
//! [`HttpResponseSink`] sets the download headers on any [`HttpResponse`] and
//! writes the workbook into its body. [`ResponseBuffer`] is a ready-made
//! response; with the `cloud-http` feature it converts into an axum response.
//!
//! # Example with Axum
//!
//! ```ignore
//! use axum::response::IntoResponse;
//! use xlsx_export::output::{HttpResponseSink, OutputSink, ResponseBuffer};
//!
//! async fn download(bytes: Vec<u8>) -> impl IntoResponse {
//!     let mut response = ResponseBuffer::new();
//!     HttpResponseSink::new(&mut response, "report").write_bytes(&bytes).ok();
//!     response
//! }
//! ```

use indexmap::IndexMap;
use std::io::Write;

use super::{
    ensure_xlsx_extension, ChannelPolicy, OutputSink, WorkbookWrite, DEFAULT_FILE_NAME,
    XLSX_CONTENT_TYPE,
};
use crate::error::{ExcelError, Result};

/// An HTTP response that accepts headers and exposes its body as a channel
pub trait HttpResponse {
    fn set_content_type(&mut self, content_type: &str);

    /// Set `name` to `value`, replacing any earlier value
    fn set_header(&mut self, name: &str, value: &str);

    /// Body channel; owned by the response, never closed by sinks
    fn output(&mut self) -> &mut dyn Write;
}

/// In-memory HTTP response: ordered headers plus a body buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    headers: IndexMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header value, matching the name case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers in the order they were first set
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl HttpResponse for ResponseBuffer {
    fn set_content_type(&mut self, content_type: &str) {
        self.set_header("Content-Type", content_type);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        let existing = self
            .headers
            .keys()
            .position(|key| key.eq_ignore_ascii_case(name));
        match existing.and_then(|index| self.headers.get_index_mut(index)) {
            Some((_, slot)) => *slot = value.to_string(),
            None => {
                self.headers.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn output(&mut self) -> &mut dyn Write {
        &mut self.body
    }
}

#[cfg(feature = "cloud-http")]
impl axum::response::IntoResponse for ResponseBuffer {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{HeaderName, HeaderValue, StatusCode};

        let mut response = axum::response::Response::new(axum::body::Body::from(self.body));
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
        response
    }
}

/// Sends the workbook as a named attachment in an HTTP response
///
/// The file name is percent-encoded (UTF-8) into
/// `Content-Disposition: attachment; filename="..."`. The body is neither
/// flushed nor closed; the response lifecycle stays with the caller.
pub struct HttpResponseSink<'a> {
    response: &'a mut dyn HttpResponse,
    file_name: String,
}

impl<'a> HttpResponseSink<'a> {
    const POLICY: ChannelPolicy = ChannelPolicy {
        flush: false,
        close: false,
    };

    /// Bind to `response`, appending `.xlsx` to `file_name` when missing
    pub fn new(response: &'a mut dyn HttpResponse, file_name: &str) -> Self {
        HttpResponseSink {
            response,
            file_name: ensure_xlsx_extension(file_name),
        }
    }

    /// Bind to `response` with the default download name
    pub fn with_default_name(response: &'a mut dyn HttpResponse) -> Self {
        Self::new(response, DEFAULT_FILE_NAME)
    }

    /// Value written to the `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"",
            urlencoding::encode(&self.file_name)
        )
    }
}

impl OutputSink for HttpResponseSink<'_> {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn channel_policy(&self) -> ChannelPolicy {
        Self::POLICY
    }

    fn write(&mut self, workbook: &mut WorkbookWrite<'_>) -> Result<()> {
        let disposition = self.content_disposition();
        self.response.set_content_type(XLSX_CONTENT_TYPE);
        self.response.set_header("Content-Disposition", &disposition);

        workbook(self.response.output()).map_err(ExcelError::StreamDelivery)?;
        if self.channel_policy().flush {
            self.response
                .output()
                .flush()
                .map_err(ExcelError::StreamDelivery)?;
        }
        tracing::trace!(file_name = %self.file_name, "workbook written to response body");
        Ok(())
    }
}
