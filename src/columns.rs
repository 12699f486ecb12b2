//! Column discovery for exportable record types
//!
//! A record type opts into export by implementing [`ExcelRecord`], usually via
//! the [`excel_record!`](crate::excel_record) macro. Registration order is the
//! column order, and it is preserved all the way into the worksheet.

use crate::error::{BoxError, ExcelError, Result};
use crate::types::CellText;
use indexmap::IndexMap;
use std::fmt;

type Accessor<T> = Box<dyn Fn(&T) -> std::result::Result<String, BoxError> + Send + Sync>;

/// One column: its header text and how to read the cell value off a record
pub struct ColumnDescriptor<T> {
    field: String,
    header: String,
    accessor: Accessor<T>,
}

impl<T> ColumnDescriptor<T> {
    /// Create a descriptor from a fallible accessor
    pub fn new<F, E>(field: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        ColumnDescriptor {
            field: field.into(),
            header: header.into(),
            accessor: Box::new(move |record: &T| {
                accessor(record).map_err(|err| -> BoxError { err.into() })
            }),
        }
    }

    /// Name of the field this column reads
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Header text written in row 0
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Read this column's cell text from `record`
    pub fn read(&self, record: &T) -> Result<String> {
        (self.accessor)(record).map_err(|source| ExcelError::ReflectionAccess {
            field: self.field.clone(),
            source,
        })
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("field", &self.field)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Ordered mapping from header to column descriptor
///
/// Iteration order is insertion order. Inserting a header that is already
/// present replaces its accessor but keeps the column where it was first
/// introduced.
///
/// # Examples
///
/// ```
/// use xlsx_export::columns::ColumnSet;
///
/// struct Sale { month: &'static str, amount: u32 }
///
/// let columns = ColumnSet::new()
///     .column("Month", |s: &Sale| s.month.to_string())
///     .column("Amount", |s: &Sale| s.amount.to_string());
///
/// assert_eq!(columns.headers().collect::<Vec<_>>(), ["Month", "Amount"]);
/// ```
pub struct ColumnSet<T> {
    columns: IndexMap<String, ColumnDescriptor<T>>,
}

impl<T> ColumnSet<T> {
    /// Create an empty column set
    pub fn new() -> Self {
        ColumnSet {
            columns: IndexMap::new(),
        }
    }

    /// Insert a descriptor keyed by its header
    ///
    /// Returns the descriptor it replaced, if any.
    pub fn insert(&mut self, descriptor: ColumnDescriptor<T>) -> Option<ColumnDescriptor<T>> {
        self.columns.insert(descriptor.header.clone(), descriptor)
    }

    /// Append an infallible column (builder style)
    pub fn column<F>(mut self, header: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.insert(ColumnDescriptor::new(header, header, move |record: &T| {
            Ok::<_, BoxError>(accessor(record))
        }));
        self
    }

    /// Append a column whose accessor can fail (builder style)
    pub fn try_column<F, E>(mut self, header: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.insert(ColumnDescriptor::new(header, header, accessor));
        self
    }

    /// Headers in column order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Descriptors in column order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.values()
    }

    /// Look up a column by header
    pub fn get(&self, header: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.get(header)
    }

    /// Zero-based column index of `header`
    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.get_index_of(header)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Default for ColumnSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.values()).finish()
    }
}

/// Collects the exported fields of a record type, in declaration order
pub struct ColumnRegistry<T> {
    columns: ColumnSet<T>,
}

impl<T> ColumnRegistry<T> {
    fn new() -> Self {
        ColumnRegistry {
            columns: ColumnSet::new(),
        }
    }

    /// Export a field by reference
    ///
    /// A blank `header` falls back to the field name.
    pub fn field<V, F>(&mut self, name: &str, header: &str, get: F) -> &mut Self
    where
        V: CellText + ?Sized,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.try_field(name, header, move |record: &T| {
            Ok::<_, BoxError>(get(record).cell_text())
        })
    }

    /// Export a field whose value can only be read fallibly
    pub fn try_field<F, E>(&mut self, name: &str, header: &str, get: F) -> &mut Self
    where
        F: Fn(&T) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let header = resolve_header(name, header);
        self.columns.insert(ColumnDescriptor::new(name, header, get));
        self
    }
}

/// Explicit header unless blank, otherwise the field name
fn resolve_header<'a>(name: &'a str, header: &'a str) -> &'a str {
    if header.trim().is_empty() {
        name
    } else {
        header
    }
}

/// A record type whose fields can be exported as worksheet columns
///
/// Implement by hand to register accessors explicitly, or declare the struct
/// through [`excel_record!`](crate::excel_record).
///
/// # Examples
///
/// ```
/// use xlsx_export::columns::{extract, ColumnRegistry, ExcelRecord};
///
/// struct Member {
///     no: u32,
///     name: Option<String>,
///     password: String,
/// }
///
/// impl ExcelRecord for Member {
///     fn register_columns(columns: &mut ColumnRegistry<Self>) {
///         columns
///             .field("no", "No.", |m| &m.no)
///             .field("name", "", |m| &m.name);
///     }
/// }
///
/// let columns = extract::<Member>();
/// assert_eq!(columns.headers().collect::<Vec<_>>(), ["No.", "name"]);
/// ```
pub trait ExcelRecord: Sized {
    /// Register the exported fields in declaration order
    fn register_columns(columns: &mut ColumnRegistry<Self>);
}

/// Resolve the column descriptors of `T`
pub fn extract<T: ExcelRecord>() -> ColumnSet<T> {
    let mut registry = ColumnRegistry::new();
    T::register_columns(&mut registry);
    tracing::debug!(
        record = std::any::type_name::<T>(),
        columns = registry.columns.len(),
        "resolved export columns"
    );
    registry.columns
}

/// Declare a struct and export its `#[column]` fields
///
/// Fields marked `#[column]` export under their own name, fields marked
/// `#[column(header = "...")]` under the given header. Unmarked fields are
/// not exported. The marker may sit anywhere among the field's attributes;
/// the other attributes and doc comments are kept on the field.
///
/// # Examples
///
/// ```
/// use xlsx_export::excel_record;
/// use xlsx_export::columns::extract;
///
/// excel_record! {
///     #[derive(Debug, Clone)]
///     pub struct Member {
///         #[column(header = "번호")]
///         pub no: String,
///         /// Display name
///         #[column(header = "이름")]
///         pub name: String,
///         pub password: String,
///         #[column]
///         pub email: Option<String>,
///     }
/// }
///
/// let columns = extract::<Member>();
/// assert_eq!(columns.headers().collect::<Vec<_>>(), ["번호", "이름", "email"]);
/// ```
#[macro_export]
macro_rules! excel_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident { $($body:tt)* }
    ) => {
        $crate::excel_record!(@field
            meta [$(#[$meta])*] vis [$vis] name [$name]
            fields [] columns [] attrs [] marker []
            rest [$($body)*]
        );
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*]
        columns [$(($cfield:ident, $cheader:tt))*] attrs [] marker []
        rest []
    ) => {
        $($m)*
        $v struct $n {
            $($f)*
        }

        impl $crate::columns::ExcelRecord for $n {
            fn register_columns(columns: &mut $crate::columns::ColumnRegistry<Self>) {
                $(
                    columns.field(stringify!($cfield), $cheader, |record| &record.$cfield);
                )*
            }
        }
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*] columns [$($c:tt)*]
        attrs [$($a:tt)*] marker [$($mk:tt)*]
        rest [#[column(header = $header:literal)] $($rest:tt)*]
    ) => {
        $crate::excel_record!(@field
            meta [$($m)*] vis [$v] name [$n] fields [$($f)*] columns [$($c)*]
            attrs [$($a)*] marker [$header]
            rest [$($rest)*]
        );
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*] columns [$($c:tt)*]
        attrs [$($a:tt)*] marker [$($mk:tt)*]
        rest [#[column] $($rest:tt)*]
    ) => {
        $crate::excel_record!(@field
            meta [$($m)*] vis [$v] name [$n] fields [$($f)*] columns [$($c)*]
            attrs [$($a)*] marker [""]
            rest [$($rest)*]
        );
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*] columns [$($c:tt)*]
        attrs [$($a:tt)*] marker [$($mk:tt)*]
        rest [#[$fmeta:meta] $($rest:tt)*]
    ) => {
        $crate::excel_record!(@field
            meta [$($m)*] vis [$v] name [$n] fields [$($f)*] columns [$($c)*]
            attrs [$($a)* #[$fmeta]] marker [$($mk)*]
            rest [$($rest)*]
        );
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*] columns [$($c:tt)*]
        attrs [$($a:tt)*] marker [$header:tt]
        rest [$fvis:vis $field:ident : $fty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::excel_record!(@field
            meta [$($m)*] vis [$v] name [$n]
            fields [$($f)* $($a)* $fvis $field : $fty,]
            columns [$($c)* ($field, $header)]
            attrs [] marker []
            rest [$($($rest)*)?]
        );
    };

    (@field meta [$($m:tt)*] vis [$v:vis] name [$n:ident] fields [$($f:tt)*] columns [$($c:tt)*]
        attrs [$($a:tt)*] marker []
        rest [$fvis:vis $field:ident : $fty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::excel_record!(@field
            meta [$($m)*] vis [$v] name [$n]
            fields [$($f)* $($a)* $fvis $field : $fty,]
            columns [$($c)*]
            attrs [] marker []
            rest [$($($rest)*)?]
        );
    };
}
