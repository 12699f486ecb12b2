//! Rendering of record field values into cell text

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A value that can be placed in a worksheet cell
///
/// Every exported value is written as text. Absent values (`None`) render as
/// an empty string, never as a `"None"` or `"null"` token.
///
/// # Examples
///
/// ```
/// use xlsx_export::types::CellText;
///
/// assert_eq!(42_i64.cell_text(), "42");
/// assert_eq!(Some("Alice").cell_text(), "Alice");
/// assert_eq!(None::<String>.cell_text(), "");
/// ```
pub trait CellText {
    /// Render the value as it should appear in the cell
    fn cell_text(&self) -> String;
}

macro_rules! impl_cell_text_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellText for $ty {
                #[inline]
                fn cell_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_cell_text_display!(
    String, str, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64, NaiveDate, NaiveDateTime, NaiveTime,
);

impl<Tz> CellText for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn cell_text(&self) -> String {
        self.to_string()
    }
}

impl<T: CellText> CellText for Option<T> {
    fn cell_text(&self) -> String {
        match self {
            Some(value) => value.cell_text(),
            None => String::new(),
        }
    }
}

impl<T: CellText + ?Sized> CellText for &T {
    #[inline]
    fn cell_text(&self) -> String {
        (**self).cell_text()
    }
}

impl<T: CellText + ?Sized> CellText for Box<T> {
    fn cell_text(&self) -> String {
        (**self).cell_text()
    }
}

impl<T: CellText + ?Sized> CellText for Rc<T> {
    fn cell_text(&self) -> String {
        (**self).cell_text()
    }
}

impl<T: CellText + ?Sized> CellText for Arc<T> {
    fn cell_text(&self) -> String {
        (**self).cell_text()
    }
}

impl CellText for Cow<'_, str> {
    fn cell_text(&self) -> String {
        self.to_string()
    }
}
