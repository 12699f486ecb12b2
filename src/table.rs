//! Materialization of records into an ordered table of cell text

use crate::columns::ColumnSet;
use crate::error::Result;
use indexmap::IndexMap;

/// One body row: header to rendered value, in column order
pub type TableRow = IndexMap<String, String>;

/// Header and body data ready for the workbook, independent of any destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: String,
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

impl Table {
    /// Apply every column of `columns` to every record, in input order
    ///
    /// Records are neither filtered, sorted nor deduplicated. The first
    /// accessor failure aborts the whole table; no partial rows are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use xlsx_export::columns::ColumnSet;
    /// use xlsx_export::table::Table;
    ///
    /// let columns = ColumnSet::new().column("Doubled", |n: &u32| (n * 2).to_string());
    /// let table = Table::materialize(&columns, &[1, 2, 3], "Numbers")?;
    ///
    /// assert_eq!(table.row_count(), 3);
    /// assert_eq!(table.rows()[2]["Doubled"], "6");
    /// # Ok::<(), xlsx_export::ExcelError>(())
    /// ```
    pub fn materialize<T>(columns: &ColumnSet<T>, records: &[T], title: &str) -> Result<Self> {
        let headers: Vec<String> = columns.headers().map(str::to_string).collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| {
                        column
                            .read(record)
                            .map(|value| (column.header().to_string(), value))
                    })
                    .collect::<Result<TableRow>>()
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            title,
            columns = headers.len(),
            rows = rows.len(),
            "materialized export table"
        );

        Ok(Table {
            title: title.to_string(),
            headers,
            rows,
        })
    }

    /// Sheet title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Column headers in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Body rows in input order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Body values of one row in header order
    pub fn row_values(&self, index: usize) -> Option<impl Iterator<Item = &str>> {
        self.rows
            .get(index)
            .map(|row| row.values().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{extract, ColumnRegistry, ExcelRecord};
    use crate::error::ExcelError;
    use proptest::prelude::*;

    crate::excel_record! {
        struct Member {
            #[column(header = "번호")]
            no: String,
            #[column(header = "이름")]
            name: Option<String>,
        }
    }

    fn member(no: &str, name: Option<&str>) -> Member {
        Member {
            no: no.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_korean_headers_scenario() {
        let columns = extract::<Member>();
        let records = [member("1", Some("A")), member("2", Some("B"))];

        let table = Table::materialize(&columns, &records, "회원").unwrap();

        assert_eq!(table.title(), "회원");
        assert_eq!(table.headers(), ["번호", "이름"]);
        assert_eq!(table.row_count(), 2);

        let first: Vec<(&str, &str)> = table.rows()[0]
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
            .collect();
        assert_eq!(first, [("번호", "1"), ("이름", "A")]);
        assert_eq!(table.row_values(1).unwrap().collect::<Vec<_>>(), ["2", "B"]);
        assert!(table.row_values(2).is_none());
    }

    #[test]
    fn test_absent_value_is_empty_string() {
        let columns = extract::<Member>();
        let table = Table::materialize(&columns, &[member("3", None)], "t").unwrap();

        assert_eq!(table.rows()[0]["이름"], "");
        assert_eq!(table.rows()[0].len(), 2);
    }

    #[test]
    fn test_no_records_keeps_headers() {
        let columns = extract::<Member>();
        let table = Table::materialize(&columns, &[], "empty").unwrap();

        assert_eq!(table.headers(), ["번호", "이름"]);
        assert_eq!(table.row_count(), 0);
    }

    struct Reading {
        sensor: &'static str,
        ok: bool,
    }

    impl ExcelRecord for Reading {
        fn register_columns(columns: &mut ColumnRegistry<Self>) {
            columns
                .field("sensor", "Sensor", |r| r.sensor)
                .try_field("ok", "Status", |r| {
                    if r.ok {
                        Ok("ok".to_string())
                    } else {
                        Err(std::io::Error::other("sensor offline"))
                    }
                });
        }
    }

    #[test]
    fn test_failing_record_aborts_materialization() {
        let columns = extract::<Reading>();
        let records = [
            Reading { sensor: "a", ok: true },
            Reading { sensor: "b", ok: false },
            Reading { sensor: "c", ok: true },
        ];

        let err = Table::materialize(&columns, &records, "readings").unwrap_err();
        match err {
            ExcelError::ReflectionAccess { field, .. } => assert_eq!(field, "ok"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_rows_match_records_and_headers(
            records in proptest::collection::vec(any::<(i32, Option<u8>)>(), 0..40)
        ) {
            let columns = ColumnSet::new()
                .column("left", |r: &(i32, Option<u8>)| r.0.to_string())
                .column("right", |r: &(i32, Option<u8>)| crate::types::CellText::cell_text(&r.1));

            let table = Table::materialize(&columns, &records, "p").unwrap();

            prop_assert_eq!(table.row_count(), records.len());
            for (row, record) in table.rows().iter().zip(&records) {
                let keys: Vec<_> = row.keys().map(String::as_str).collect();
                prop_assert_eq!(keys, vec!["left", "right"]);
                prop_assert_eq!(&row["left"], &record.0.to_string());
                if record.1.is_none() {
                    prop_assert_eq!(row["right"].as_str(), "");
                }
            }
        }
    }
}
