//! # xlsx-export
//!
//! Export lists of records to XLSX and deliver the workbook to a file, a
//! byte stream or an HTTP response.
//!
//! ## Features
//!
//! - **Declarative columns**: mark struct fields with `#[column]` and they
//!   become worksheet columns, in declaration order
//! - **Manual mappings**: build an ordered header to accessor map by hand
//! - **Pluggable destinations**: file, any `Write`, or an HTTP response with
//!   download headers set for you
//! - **All-or-nothing**: the workbook is fully built before the destination is
//!   touched, so failures never leave partial output behind
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xlsx_export::{excel_record, ExcelExporter, SinkParams};
//!
//! excel_record! {
//!     #[derive(Debug, Clone)]
//!     pub struct Member {
//!         #[column(header = "번호")]
//!         pub no: u32,
//!         #[column(header = "이름")]
//!         pub name: String,
//!         pub password: String,
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let members = vec![
//!     Member { no: 1, name: "Alice".into(), password: "secret".into() },
//!     Member { no: 2, name: "Bob".into(), password: "hunter2".into() },
//! ];
//!
//! // Writes out/members.xlsx
//! ExcelExporter::new()
//!     .with_sheet_name("회원")
//!     .generate_automatic(&members, SinkParams::file("out/members"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Manual column mapping
//!
//! ```rust
//! use xlsx_export::columns::ColumnSet;
//! use xlsx_export::output::StreamSink;
//! use xlsx_export::ExcelExporter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let columns = ColumnSet::new()
//!     .column("City", |c: &(&str, u32)| c.0.to_string())
//!     .column("Population", |c: &(&str, u32)| c.1.to_string());
//!
//! let mut sink = StreamSink::new(Vec::new());
//! ExcelExporter::new().generate_manual(&columns, &[("Seoul", 9_400_000)], &mut sink)?;
//! assert!(!sink.into_inner().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod error;
pub mod exporter;
pub mod fast_writer;
pub mod output;
pub mod table;
pub mod types;

pub use columns::{extract, ColumnRegistry, ColumnSet, ExcelRecord};
pub use error::{ExcelError, Result};
pub use exporter::{ExcelExporter, ExportOptions, SinkParams};
pub use output::{
    Destination, FileSink, HttpResponse, HttpResponseSink, OutputSink, ResponseBuffer,
    SinkFactory, SinkKind, StreamSink,
};
pub use table::{Table, TableRow};
pub use types::CellText;
