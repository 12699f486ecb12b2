//! Integration tests for xlsx-export

use std::io::{self, Write};

use tempfile::tempdir;
use xlsx_export::columns::{extract, ColumnRegistry, ColumnSet, ExcelRecord};
use xlsx_export::output::{
    Destination, OutputSink, ResponseBuffer, SinkFactory, SinkKind, StreamSink,
    XLSX_CONTENT_TYPE,
};
use xlsx_export::{excel_record, ExcelError, ExcelExporter, ExportOptions, SinkParams, Table};

excel_record! {
    #[derive(Debug, Clone)]
    pub struct Member {
        #[column(header = "번호")]
        pub no: String,
        #[column(header = "이름")]
        pub name: String,
        pub password: String,
        #[column]
        pub email: Option<String>,
    }
}

fn members() -> Vec<Member> {
    vec![
        Member {
            no: "1".to_string(),
            name: "A".to_string(),
            password: "pw1".to_string(),
            email: Some("a@example.com".to_string()),
        },
        Member {
            no: "2".to_string(),
            name: "B".to_string(),
            password: "pw2".to_string(),
            email: None,
        },
    ]
}

#[test]
fn test_automatic_export_to_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("report");

    ExcelExporter::new()
        .with_sheet_name("회원")
        .generate_automatic(&members(), SinkParams::file(&target))
        .unwrap();

    let written = std::fs::read(dir.path().join("report.xlsx")).unwrap();
    assert_eq!(&written[..4], b"PK\x03\x04");
    assert!(!target.exists());
}

#[test]
fn test_existing_extension_is_kept() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("report.xlsx");

    ExcelExporter::new()
        .generate_automatic(&members(), SinkParams::file(&target))
        .unwrap();

    assert!(target.exists());
    assert!(!dir.path().join("report.xlsx.xlsx").exists());
}

#[test]
fn test_table_matches_declared_columns() {
    let columns = extract::<Member>();
    let table = Table::materialize(&columns, &members(), "회원").unwrap();

    assert_eq!(table.headers(), ["번호", "이름", "email"]);
    assert_eq!(
        table.row_values(0).unwrap().collect::<Vec<_>>(),
        ["1", "A", "a@example.com"]
    );
    assert_eq!(table.row_values(1).unwrap().collect::<Vec<_>>(), ["2", "B", ""]);
    assert!(members().iter().all(|m| !m.password.is_empty()));
}

#[test]
fn test_http_download_of_korean_file_name() {
    let mut response = ResponseBuffer::new();

    ExcelExporter::new()
        .generate_automatic(
            &members(),
            SinkParams::http_response(&mut response, "월간보고서"),
        )
        .unwrap();

    assert_eq!(response.header("Content-Type"), Some(XLSX_CONTENT_TYPE));
    assert_eq!(
        response.header("Content-Disposition"),
        Some("attachment; filename=\"%EC%9B%94%EA%B0%84%EB%B3%B4%EA%B3%A0%EC%84%9C.xlsx\"")
    );
    assert!(response.body().starts_with(b"PK"));
}

struct Audited {
    id: u32,
    readable: bool,
}

impl ExcelRecord for Audited {
    fn register_columns(columns: &mut ColumnRegistry<Self>) {
        columns
            .field("id", "ID", |a| &a.id)
            .try_field("checksum", "Checksum", |a| {
                if a.readable {
                    Ok(format!("{:08x}", a.id))
                } else {
                    Err(io::Error::new(io::ErrorKind::InvalidData, "checksum unavailable"))
                }
            });
    }
}

#[test]
fn test_failed_record_leaves_no_file() {
    let dir = tempdir().unwrap();
    let records = [
        Audited { id: 1, readable: true },
        Audited { id: 2, readable: false },
        Audited { id: 3, readable: true },
    ];

    let err = ExcelExporter::new()
        .generate_automatic(&records, SinkParams::file(dir.path().join("audit")))
        .unwrap_err();

    match &err {
        ExcelError::ReflectionAccess { field, .. } => assert_eq!(field, "checksum"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.is_delivery_failure());
    assert!(!dir.path().join("audit.xlsx").exists());
}

#[test]
fn test_unwritable_destination_is_delivery_failure() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("no-such-dir").join("report");

    let err = ExcelExporter::new()
        .generate_automatic(&members(), SinkParams::file(&target))
        .unwrap_err();

    assert!(err.is_delivery_failure());
    assert!(matches!(err, ExcelError::FileDelivery { .. }));
}

struct TrackedStream {
    bytes: Vec<u8>,
    flushed: bool,
}

impl Write for TrackedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed = true;
        Ok(())
    }
}

#[test]
fn test_manual_export_to_borrowed_stream() {
    let columns = ColumnSet::new()
        .column("Month", |s: &(&str, u32)| s.0.to_string())
        .column("Sales", |s: &(&str, u32)| s.1.to_string());

    let mut stream = TrackedStream {
        bytes: Vec::new(),
        flushed: false,
    };
    {
        let mut sink = StreamSink::with_file_name(&mut stream, "sales");
        ExcelExporter::new()
            .generate_manual(&columns, &[("January", 50_000), ("February", 55_000)], &mut sink)
            .unwrap();
    }

    assert!(stream.flushed);
    assert!(stream.bytes.starts_with(b"PK"));

    // caller still owns the stream
    stream.write_all(b"trailer").unwrap();
    assert!(stream.bytes.ends_with(b"trailer"));
}

#[test]
fn test_factory_sink_with_options() {
    let dir = tempdir().unwrap();
    let options = ExportOptions {
        sheet_name: "Members".to_string(),
        column_width: 32.5,
        compression_level: 0,
    };

    let mut sink = SinkFactory::create(
        SinkKind::File,
        Destination::Path(dir.path().join("members")),
        None,
    )
    .unwrap();
    ExcelExporter::with_options(options)
        .generate_manual(&extract::<Member>(), &members(), sink.as_mut())
        .unwrap();

    assert_eq!(sink.file_name(), "members.xlsx");
    assert!(dir.path().join("members.xlsx").exists());
}
