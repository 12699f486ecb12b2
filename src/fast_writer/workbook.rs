//! Single-sheet XLSX package written in memory

use std::io::Cursor;

use super::xml_writer::XmlWriter;
use super::StreamingZipWriter;
use crate::error::{ExcelError, Result};
use crate::table::Table;

/// Sheet name used when the table title is blank
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Default width of every column, in characters
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

/// Deflate level used unless configured otherwise
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

const MAX_SHEET_NAME_LEN: usize = 31;
const MAX_COLUMN_WIDTH: f64 = 255.0;
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Encodes one [`Table`] as a complete XLSX workbook
///
/// The workbook has a single sheet named after the table title. Row 0 holds
/// the headers and every body row follows in order, each cell as an inline
/// string.
///
/// # Examples
///
/// ```
/// use xlsx_export::columns::ColumnSet;
/// use xlsx_export::fast_writer::SheetWorkbook;
/// use xlsx_export::table::Table;
///
/// let columns = ColumnSet::new().column("Name", |s: &&str| s.to_string());
/// let table = Table::materialize(&columns, &["Alice", "Bob"], "People")?;
///
/// let bytes = SheetWorkbook::new(table.title())?
///     .with_column_width(30.0)
///     .write_table(&table)?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), xlsx_export::ExcelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SheetWorkbook {
    sheet_name: String,
    column_width: f64,
    compression_level: u32,
}

impl SheetWorkbook {
    /// Create a workbook writer for a sheet called `sheet_name`
    ///
    /// A blank name falls back to [`DEFAULT_SHEET_NAME`]. Names Excel would
    /// reject (too long, or containing `[ ] : * ? / \`) are an error.
    pub fn new(sheet_name: &str) -> Result<Self> {
        let sheet_name = if sheet_name.trim().is_empty() {
            DEFAULT_SHEET_NAME
        } else {
            sheet_name
        };

        if sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(ExcelError::generation(format!(
                "sheet name '{}' is longer than {} characters",
                sheet_name, MAX_SHEET_NAME_LEN
            )));
        }
        if let Some(c) = sheet_name.chars().find(|c| INVALID_SHEET_CHARS.contains(c)) {
            return Err(ExcelError::generation(format!(
                "sheet name '{}' contains invalid character '{}'",
                sheet_name, c
            )));
        }

        Ok(SheetWorkbook {
            sheet_name: sheet_name.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        })
    }

    /// Set the uniform default column width (characters)
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// Set the compression level (0-9, clamped)
    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Serialize `table` into XLSX bytes
    pub fn write_table(&self, table: &Table) -> Result<Vec<u8>> {
        if !self.column_width.is_finite()
            || self.column_width <= 0.0
            || self.column_width > MAX_COLUMN_WIDTH
        {
            return Err(ExcelError::generation(format!(
                "column width {} is outside 0..={}",
                self.column_width, MAX_COLUMN_WIDTH
            )));
        }

        let mut zip = StreamingZipWriter::from_writer_with_compression(
            Cursor::new(Vec::new()),
            self.compression_level,
        )
        .map_err(ExcelError::generation)?;

        let entries: [(&str, Vec<u8>); 7] = [
            ("[Content_Types].xml", Self::content_types().into_bytes()),
            ("_rels/.rels", Self::root_rels().into_bytes()),
            ("docProps/app.xml", Self::app_props().into_bytes()),
            ("docProps/core.xml", Self::core_props().into_bytes()),
            ("xl/workbook.xml", self.workbook_xml()),
            ("xl/_rels/workbook.xml.rels", Self::workbook_rels().into_bytes()),
            ("xl/styles.xml", Self::styles().into_bytes()),
        ];

        for (name, data) in entries.iter() {
            zip.start_entry(name).map_err(ExcelError::generation)?;
            zip.write_data(data).map_err(ExcelError::generation)?;
        }

        zip.start_entry("xl/worksheets/sheet1.xml")
            .map_err(ExcelError::generation)?;
        zip.write_data(&self.sheet_xml(table))
            .map_err(ExcelError::generation)?;

        let buffer = zip.finish().map_err(ExcelError::generation)?;
        let bytes = buffer.into_inner();

        tracing::debug!(
            sheet = %self.sheet_name,
            rows = table.row_count() + 1,
            bytes = bytes.len(),
            "serialized workbook"
        );

        Ok(bytes)
    }

    /// Worksheet XML: header row at `r="1"`, body rows after it
    pub(crate) fn sheet_xml(&self, table: &Table) -> Vec<u8> {
        let columns: Vec<String> = (0..table.headers().len())
            .map(|col| column_letter(col as u32 + 1))
            .collect();

        let mut xml = XmlWriter::with_capacity(4096 + table.row_count() * 64);
        xml.write_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.write_raw(b"\n");
        xml.start_element("worksheet");
        xml.attribute("xmlns", NS_MAIN);
        xml.attribute("xmlns:r", NS_REL);
        xml.close_start_tag();

        xml.start_element("sheetFormatPr");
        xml.attribute("defaultColWidth", &self.column_width.to_string());
        xml.attribute("defaultRowHeight", "15");
        xml.close_empty();

        xml.start_element("sheetData");
        xml.close_start_tag();

        let header = table.headers().iter().map(String::as_str);
        Self::write_row(&mut xml, &columns, 1, header);

        for (index, row) in table.rows().iter().enumerate() {
            let values = row.values().map(String::as_str);
            Self::write_row(&mut xml, &columns, index as u64 + 2, values);
        }

        xml.end_element("sheetData");
        xml.end_element("worksheet");
        xml.into_bytes()
    }

    fn write_row<'a>(
        xml: &mut XmlWriter,
        columns: &[String],
        row_number: u64,
        values: impl Iterator<Item = &'a str>,
    ) {
        let number = row_number.to_string();

        xml.start_element("row");
        xml.attribute_int("r", row_number);
        xml.close_start_tag();

        for (column, value) in columns.iter().zip(values) {
            xml.start_element("c");
            xml.write_raw(b" r=\"");
            xml.write_str(column);
            xml.write_str(&number);
            xml.write_raw(b"\"");

            if value.is_empty() {
                xml.close_empty();
                continue;
            }

            xml.attribute("t", "inlineStr");
            xml.write_raw(b"><is>");
            if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
                xml.write_raw(b"<t xml:space=\"preserve\">");
            } else {
                xml.write_raw(b"<t>");
            }
            xml.write_escaped(value);
            xml.write_raw(b"</t></is></c>");
        }

        xml.end_element("row");
    }

    fn workbook_xml(&self) -> Vec<u8> {
        let mut xml = XmlWriter::with_capacity(512);
        xml.write_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.write_raw(b"\n");
        xml.start_element("workbook");
        xml.attribute("xmlns", NS_MAIN);
        xml.attribute("xmlns:r", NS_REL);
        xml.close_start_tag();
        xml.write_raw(b"<sheets>");
        xml.start_element("sheet");
        xml.attribute("name", &self.sheet_name);
        xml.attribute_int("sheetId", 1);
        xml.attribute("r:id", "rId1");
        xml.close_empty();
        xml.write_raw(b"</sheets>");
        xml.end_element("workbook");
        xml.into_bytes()
    }

    fn content_types() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#
            .to_string()
    }

    fn root_rels() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
            .to_string()
    }

    fn workbook_rels() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
            .to_string()
    }

    fn styles() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#
            .to_string()
    }

    fn app_props() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>xlsx-export</Application>
</Properties>"#
            .to_string()
    }

    fn core_props() -> String {
        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>xlsx-export</dc:creator>
<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>
</cp:coreProperties>"#
        )
    }
}

/// Convert a 1-based column number to its letter (1 -> A, 27 -> AA)
fn column_letter(n: u32) -> String {
    let mut result = String::new();
    let mut n = n;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnSet;

    fn sample_table() -> Table {
        let columns = ColumnSet::new()
            .column("번호", |r: &(&str, &str)| r.0.to_string())
            .column("이름", |r: &(&str, &str)| r.1.to_string());
        Table::materialize(&columns, &[("1", "A"), ("2", "")], "회원").unwrap()
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_sheet_layout() {
        let table = sample_table();
        let workbook = SheetWorkbook::new(table.title()).unwrap();
        let xml = String::from_utf8(workbook.sheet_xml(&table)).unwrap();

        assert!(xml.contains(r#"<sheetFormatPr defaultColWidth="20" defaultRowHeight="15"/>"#));
        assert!(xml.contains(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>번호</t></is></c><c r="B1" t="inlineStr"><is><t>이름</t></is></c></row>"#
        ));
        assert!(xml.contains(
            r#"<row r="2"><c r="A2" t="inlineStr"><is><t>1</t></is></c><c r="B2" t="inlineStr"><is><t>A</t></is></c></row>"#
        ));
        assert!(xml.contains(r#"<row r="3"><c r="A3" t="inlineStr"><is><t>2</t></is></c><c r="B3"/></row>"#));
        assert!(!xml.contains(r#"<row r="4""#));
    }

    #[test]
    fn test_whitespace_and_escaping() {
        let columns = ColumnSet::new().column("v", |s: &&str| s.to_string());
        let table = Table::materialize(&columns, &[" a<b "], "t").unwrap();
        let xml = String::from_utf8(SheetWorkbook::new("t").unwrap().sheet_xml(&table)).unwrap();

        assert!(xml.contains(r#"<t xml:space="preserve"> a&lt;b </t>"#));
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(SheetWorkbook::new("  ").unwrap().sheet_name(), DEFAULT_SHEET_NAME);
        assert_eq!(SheetWorkbook::new("월간보고서").unwrap().sheet_name(), "월간보고서");
        assert!(matches!(
            SheetWorkbook::new("a/b"),
            Err(ExcelError::WorkbookGeneration(_))
        ));
        assert!(SheetWorkbook::new(&"x".repeat(32)).is_err());
        assert!(SheetWorkbook::new(&"x".repeat(31)).is_ok());
    }

    #[test]
    fn test_workbook_xml_escapes_sheet_name() {
        let workbook = SheetWorkbook::new("R&D").unwrap();
        let xml = String::from_utf8(workbook.workbook_xml()).unwrap();
        assert!(xml.contains(r#"<sheet name="R&amp;D" sheetId="1" r:id="rId1"/>"#));
    }

    #[test]
    fn test_write_table_produces_zip() {
        let table = sample_table();
        let bytes = SheetWorkbook::new(table.title())
            .unwrap()
            .with_compression(42)
            .write_table(&table)
            .unwrap();

        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_invalid_column_width() {
        let table = sample_table();
        let err = SheetWorkbook::new("t")
            .unwrap()
            .with_column_width(-1.0)
            .write_table(&table)
            .unwrap_err();
        assert!(matches!(err, ExcelError::WorkbookGeneration(_)));
    }
}
