//! Cell value types

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Represents the value stored in a cell
///
/// This is a closed set: every source value kind maps onto exactly one
/// variant, and anything without a dedicated variant is rendered to text
/// through [`CellValue::display`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Bool(bool),

    /// Integer-family value
    Integer(i64),

    /// Floating-point value
    Float(f64),

    /// Exact decimal value
    Decimal(Decimal),

    /// Date (with optional time-of-day)
    Date(NaiveDateTime),

    /// Elapsed time, may exceed 24h
    Time(Duration),

    /// String value (also holds formula text for formula cells)
    Text(String),
}

impl CellValue {
    /// Create a new string value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Fallback for any other value kind: its `Display` rendering as text
    pub fn display<T: fmt::Display>(value: T) -> Self {
        CellValue::Text(value.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the value belongs to the numeric family
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_)
        )
    }

    /// Try to get the value as a floating-point number
    ///
    /// Booleans count as 1/0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Float(n) => Some(*n),
            CellValue::Decimal(d) => d.to_f64(),
            CellValue::Bool(true) => Some(1.0),
            CellValue::Bool(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a date
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get the value as a duration
    pub fn as_time(&self) -> Option<Duration> {
        match self {
            CellValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Bool(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Decimal(_) => "decimal",
            CellValue::Date(_) => "date",
            CellValue::Time(_) => "time",
            CellValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Decimal(d) => write!(f, "{}", d),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Time(t) => {
                let secs = t.num_seconds();
                let sign = if secs < 0 { "-" } else { "" };
                let secs = secs.abs();
                write!(
                    f,
                    "{}{:02}:{:02}:{:02}",
                    sign,
                    secs / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            }
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellValue {
                fn from(n: $t) -> Self {
                    CellValue::Integer(n as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => CellValue::Integer(n),
            Err(_) => CellValue::Decimal(Decimal::from(n)),
        }
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::from(n as u64)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Decimal(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<Duration> for CellValue {
    fn from(t: Duration) -> Self {
        CellValue::Time(t)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Integer(42));
        assert_eq!(CellValue::from(42u8), CellValue::Integer(42));
        assert_eq!(CellValue::from(3.5), CellValue::Float(3.5));
        assert_eq!(CellValue::from(1.5f32), CellValue::Float(1.5));
        assert_eq!(CellValue::from(true), CellValue::Bool(true));
        assert_eq!(CellValue::from("hello").as_str(), Some("hello"));
        assert_eq!(CellValue::from(None::<i32>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("x")), CellValue::text("x"));
    }

    #[test]
    fn test_large_unsigned_becomes_decimal() {
        assert_eq!(CellValue::from(7u64), CellValue::Integer(7));
        assert_eq!(
            CellValue::from(u64::MAX),
            CellValue::Decimal(Decimal::from(u64::MAX))
        );
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(CellValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::Bool(false).as_f64(), Some(0.0));
        assert_eq!(CellValue::Decimal(Decimal::new(25, 1)).as_f64(), Some(2.5));
        assert_eq!(CellValue::text("hello").as_f64(), None);
        assert_eq!(CellValue::Empty.as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Time(Duration::seconds(90061)).to_string(), "25:01:01");
        assert_eq!(CellValue::display('c'), CellValue::text("c"));
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(CellValue::from(d).to_string(), "2024-02-29 00:00:00");
    }
}
