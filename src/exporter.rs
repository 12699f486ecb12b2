//! Export orchestration: columns, table, workbook, sink

use std::io::Write;
use std::path::PathBuf;

use crate::columns::{extract, ColumnSet, ExcelRecord};
use crate::error::Result;
use crate::fast_writer::{
    SheetWorkbook, DEFAULT_COLUMN_WIDTH, DEFAULT_COMPRESSION_LEVEL, DEFAULT_SHEET_NAME,
};
use crate::output::{Destination, HttpResponse, OutputSink, SinkFactory, SinkKind};
use crate::table::Table;

/// Workbook settings applied to every export
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    /// Name of the single worksheet
    pub sheet_name: String,
    /// Default width of every column, in characters
    pub column_width: f64,
    /// ZIP compression level (0-9)
    pub compression_level: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Where an automatic export goes: kind tag, handle and file name
#[derive(Debug)]
pub struct SinkParams<'a> {
    pub kind: SinkKind,
    pub destination: Destination<'a>,
    pub file_name: Option<String>,
}

impl<'a> SinkParams<'a> {
    /// Write to a file at `path`
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        SinkParams {
            kind: SinkKind::File,
            destination: Destination::Path(path.into()),
            file_name: None,
        }
    }

    /// Write into a caller-owned stream
    pub fn stream(stream: &'a mut dyn Write) -> Self {
        SinkParams {
            kind: SinkKind::Stream,
            destination: Destination::Stream(stream),
            file_name: None,
        }
    }

    /// Send as an attachment called `file_name`
    pub fn http_response(response: &'a mut dyn HttpResponse, file_name: &str) -> Self {
        SinkParams {
            kind: SinkKind::HttpResponse,
            destination: Destination::Response(response),
            file_name: Some(file_name.to_string()),
        }
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = Some(file_name.to_string());
        self
    }
}

/// Exports record lists to XLSX
///
/// The table is fully materialized and serialized before the sink is
/// touched, so a record that cannot be read never leaves a partial file or
/// half-sent response behind.
///
/// # Examples
///
/// ```
/// use xlsx_export::{excel_record, ExcelExporter, SinkParams};
///
/// excel_record! {
///     pub struct Sale {
///         #[column(header = "Month")]
///         pub month: String,
///         #[column(header = "Amount")]
///         pub amount: u64,
///     }
/// }
///
/// let sales = vec![
///     Sale { month: "January".into(), amount: 50_000 },
///     Sale { month: "February".into(), amount: 55_000 },
/// ];
///
/// let mut bytes = Vec::new();
/// ExcelExporter::new()
///     .with_sheet_name("Sales")
///     .generate_automatic(&sales, SinkParams::stream(&mut bytes))?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), xlsx_export::ExcelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExcelExporter {
    options: ExportOptions,
}

impl ExcelExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        ExcelExporter { options }
    }

    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.options.sheet_name = name.to_string();
        self
    }

    pub fn with_column_width(mut self, width: f64) -> Self {
        self.options.column_width = width;
        self
    }

    pub fn with_compression(mut self, level: u32) -> Self {
        self.options.compression_level = level.min(9);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export `records` using the columns declared by `T`
    pub fn generate_automatic<T: ExcelRecord>(
        &self,
        records: &[T],
        params: SinkParams<'_>,
    ) -> Result<()> {
        let mut sink = SinkFactory::create(
            params.kind,
            params.destination,
            params.file_name.as_deref(),
        )?;
        let columns = extract::<T>();
        self.generate_manual(&columns, records, sink.as_mut())
    }

    /// Export `records` using an explicit header to accessor mapping
    pub fn generate_manual<T>(
        &self,
        columns: &ColumnSet<T>,
        records: &[T],
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let bytes = self.render(columns, records)?;
        sink.write_bytes(&bytes)?;

        tracing::debug!(
            file_name = sink.file_name(),
            bytes = bytes.len(),
            "export delivered"
        );
        Ok(())
    }

    /// Materialize and serialize without delivering
    pub fn render<T>(&self, columns: &ColumnSet<T>, records: &[T]) -> Result<Vec<u8>> {
        let workbook = SheetWorkbook::new(&self.options.sheet_name)?
            .with_column_width(self.options.column_width)
            .with_compression(self.options.compression_level);
        let table = Table::materialize(columns, records, workbook.sheet_name())?;
        workbook.write_table(&table)
    }
}
