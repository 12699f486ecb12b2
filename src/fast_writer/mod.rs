//! Workbook encoding
//!
//! Turns a materialized [`Table`](crate::table::Table) into the bytes of an
//! XLSX package. The package is assembled in memory with `s-zip` so a failed
//! encode never leaves partial output at the destination.

mod workbook;
mod xml_writer;

pub use s_zip::StreamingZipWriter;
pub use workbook::{
    SheetWorkbook, DEFAULT_COLUMN_WIDTH, DEFAULT_COMPRESSION_LEVEL, DEFAULT_SHEET_NAME,
};
