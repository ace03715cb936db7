//! Type coercion of decoded values
//!
//! Precedence: a global strategy other than `Default` wins over the column
//! type, a column type wins over the natural type. Nothing is enforced
//! before the enforcing start row. Conversions are best effort: a value
//! that cannot be converted is kept as it is.

use std::fmt::Write;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use gridbook_core::units::{date_from_oa, time_from_oa};
use gridbook_core::{CellType, CellValue};
use log::trace;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ImportResult;
use crate::options::{ColumnType, GlobalStrategy, ImportOptions};

/// Applies an [`ImportOptions`] policy to decoded values
#[derive(Debug, Clone, Copy)]
pub struct CoercionEngine<'a> {
    options: &'a ImportOptions,
}

impl<'a> CoercionEngine<'a> {
    /// Create an engine; fails when the options carry unusable patterns
    pub fn new(options: &'a ImportOptions) -> ImportResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Resolve the final value and type of the cell at `(column, row)`
    ///
    /// Formula cells are never converted.
    pub fn coerce(
        &self,
        value: CellValue,
        cell_type: CellType,
        column: u32,
        row: u32,
    ) -> (CellValue, CellType) {
        if cell_type == CellType::Formula || !self.options.enforces(column, row) {
            return (value, cell_type);
        }

        let converted = match self.options.global_strategy {
            GlobalStrategy::Default => match self.options.column_types.get(&column) {
                Some(&column_type) => self.apply_column_type(value, column_type),
                None => return (value, cell_type),
            },
            GlobalStrategy::AllNumbersToDouble => to_double(value),
            GlobalStrategy::AllNumbersToDecimal => to_decimal(value),
            GlobalStrategy::AllNumbersToInt => to_int(value),
            GlobalStrategy::EverythingToString => self.to_text(value),
        };

        let converted = match converted {
            CellValue::Empty if self.options.empty_as_string => CellValue::text(""),
            other => other,
        };
        let resolved = CellType::resolve(&converted);
        (converted, resolved)
    }

    fn apply_column_type(&self, value: CellValue, column_type: ColumnType) -> CellValue {
        match column_type {
            ColumnType::Numeric => to_numeric(value),
            ColumnType::Double => to_double(value),
            ColumnType::Decimal => to_decimal(value),
            ColumnType::Date => self.to_date(value),
            ColumnType::Time => to_time(value),
            ColumnType::Bool => to_bool(value),
            ColumnType::String => self.to_text(value),
        }
    }

    fn to_date(&self, value: CellValue) -> CellValue {
        let converted = match &value {
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => value
                .as_f64()
                .and_then(|serial| date_from_oa(serial).ok()),
            CellValue::Text(s) => {
                let s = s.trim();
                let pattern = self.options.date_time_format.as_str();
                NaiveDateTime::parse_from_str(s, pattern)
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(s, pattern)
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                    })
            }
            _ => return value,
        };
        match converted {
            Some(date) => CellValue::Date(date),
            None => unconverted(value, "date"),
        }
    }

    /// Render a value as text using the configured patterns
    pub fn to_text(&self, value: CellValue) -> CellValue {
        match value {
            CellValue::Empty | CellValue::Text(_) => value,
            CellValue::Date(date) => {
                let formatted = Utc
                    .from_utc_datetime(&date)
                    .format_localized(&self.options.date_time_format, self.options.locale);
                let mut out = String::new();
                match write!(out, "{}", formatted) {
                    Ok(()) => CellValue::Text(out),
                    Err(_) => CellValue::Text(value.to_string()),
                }
            }
            CellValue::Time(duration) => {
                CellValue::Text(render_duration(duration, &self.options.time_format))
            }
            other => CellValue::Text(other.to_string()),
        }
    }
}

fn unconverted(value: CellValue, target: &str) -> CellValue {
    trace!("kept {} value, not convertible to {}", value.type_name(), target);
    value
}

/// Numeric reading of numbers, booleans and numeric text
fn numeric_source(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) | CellValue::Bool(_) => {
            value.as_f64()
        }
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn to_double(value: CellValue) -> CellValue {
    match numeric_source(&value) {
        Some(f) => CellValue::Float(f),
        None => unconverted(value, "double"),
    }
}

fn to_decimal(value: CellValue) -> CellValue {
    let converted = match &value {
        CellValue::Decimal(_) => return value,
        CellValue::Integer(n) => Some(Decimal::from(*n)),
        CellValue::Float(f) => Decimal::try_from(*f).ok(),
        CellValue::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        CellValue::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    };
    match converted {
        Some(d) => CellValue::Decimal(d),
        None => unconverted(value, "decimal"),
    }
}

/// Round half to even; `None` when the result does not fit an `i64`
fn float_to_int(f: f64) -> Option<i64> {
    let rounded = f.round_ties_even();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

fn to_int(value: CellValue) -> CellValue {
    let converted = match &value {
        CellValue::Integer(_) => return value,
        CellValue::Float(f) => float_to_int(*f),
        CellValue::Decimal(d) => d
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64(),
        CellValue::Bool(b) => Some(i64::from(*b)),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    };
    match converted {
        Some(n) => CellValue::Integer(n),
        None => unconverted(value, "integer"),
    }
}

fn to_numeric(value: CellValue) -> CellValue {
    match &value {
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => value,
        CellValue::Bool(b) => CellValue::Integer(i64::from(*b)),
        CellValue::Text(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                CellValue::Integer(n)
            } else if let Some(f) = s.parse::<f64>().ok().filter(|f| f.is_finite()) {
                CellValue::Float(f)
            } else {
                unconverted(value, "number")
            }
        }
        _ => unconverted(value, "number"),
    }
}

fn to_time(value: CellValue) -> CellValue {
    let converted = match &value {
        CellValue::Time(_) => return value,
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => value
            .as_f64()
            .and_then(|serial| time_from_oa(serial).ok()),
        CellValue::Date(date) => Some(Duration::seconds(
            date.time().num_seconds_from_midnight() as i64,
        )),
        CellValue::Text(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
            .ok()
            .map(|t| Duration::seconds(t.num_seconds_from_midnight() as i64)),
        _ => None,
    };
    match converted {
        Some(duration) => CellValue::Time(duration),
        None => unconverted(value, "time"),
    }
}

fn to_bool(value: CellValue) -> CellValue {
    let converted = match &value {
        CellValue::Bool(_) => return value,
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => {
            match value.as_f64() {
                Some(f) if f == 1.0 => Some(true),
                Some(f) if f == 0.0 => Some(false),
                _ => None,
            }
        }
        CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    match converted {
        Some(b) => CellValue::Bool(b),
        None => unconverted(value, "bool"),
    }
}

/// Render a duration with `%d` (days), `%H`, `%M`, `%S` and `%%`
///
/// Without `%d` the hour count is the total number of hours.
fn render_duration(duration: Duration, pattern: &str) -> String {
    let total = duration.num_seconds();
    let mut out = String::with_capacity(pattern.len() + 4);
    if total < 0 {
        out.push('-');
    }
    let total = total.abs();
    let days = total / 86_400;
    let hours = if pattern.contains("%d") {
        (total % 86_400) / 3_600
    } else {
        total / 3_600
    };
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str(&days.to_string()),
            Some('H') => out.push_str(&format!("{:02}", hours)),
            Some('M') => out.push_str(&format!("{:02}", minutes)),
            Some('S') => out.push_str(&format!("{:02}", seconds)),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Locale;
    use pretty_assertions::assert_eq;

    fn engine_coerce(options: &ImportOptions, value: CellValue) -> (CellValue, CellType) {
        let cell_type = CellType::resolve(&value);
        CoercionEngine::new(options).unwrap().coerce(value, cell_type, 0, 0)
    }

    fn date(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_natural_type_without_policy() {
        let options = ImportOptions::default();
        let (value, ty) = engine_coerce(&options, CellValue::text("12"));
        assert_eq!((value, ty), (CellValue::text("12"), CellType::String));
    }

    #[test]
    fn test_all_numbers_to_double() {
        let options = ImportOptions::new().with_global_strategy(GlobalStrategy::AllNumbersToDouble);
        assert_eq!(engine_coerce(&options, CellValue::Integer(3)).0, CellValue::Float(3.0));
        assert_eq!(engine_coerce(&options, CellValue::text(" 2.5 ")).0, CellValue::Float(2.5));
        assert_eq!(engine_coerce(&options, CellValue::Bool(true)).0, CellValue::Float(1.0));

        // Best effort: left untouched
        let (value, ty) = engine_coerce(&options, CellValue::text("abc"));
        assert_eq!((value, ty), (CellValue::text("abc"), CellType::String));
        let when = CellValue::Date(date(2021, 6, 1, 0));
        assert_eq!(engine_coerce(&options, when.clone()).0, when);
    }

    #[test]
    fn test_all_numbers_to_int_rounds_half_even() {
        let options = ImportOptions::new().with_global_strategy(GlobalStrategy::AllNumbersToInt);
        assert_eq!(engine_coerce(&options, CellValue::Float(2.5)).0, CellValue::Integer(2));
        assert_eq!(engine_coerce(&options, CellValue::Float(3.5)).0, CellValue::Integer(4));
        assert_eq!(engine_coerce(&options, CellValue::text("7.5")).0, CellValue::Integer(8));
        assert_eq!(
            engine_coerce(&options, CellValue::Decimal(Decimal::new(-25, 1))).0,
            CellValue::Integer(-2)
        );
        assert_eq!(engine_coerce(&options, CellValue::Float(1e300)).0, CellValue::Float(1e300));
    }

    #[test]
    fn test_all_numbers_to_decimal() {
        let options = ImportOptions::new().with_global_strategy(GlobalStrategy::AllNumbersToDecimal);
        let (value, ty) = engine_coerce(&options, CellValue::text("1.25"));
        assert_eq!(value, CellValue::Decimal(Decimal::new(125, 2)));
        assert_eq!(ty, CellType::Number);
        assert_eq!(
            engine_coerce(&options, CellValue::Integer(4)).0,
            CellValue::Decimal(Decimal::from(4))
        );
    }

    #[test]
    fn test_everything_to_string() {
        let options = ImportOptions::new()
            .with_global_strategy(GlobalStrategy::EverythingToString)
            .with_date_time_format("%d %B %Y")
            .with_locale(Locale::de_DE);

        let (value, ty) = engine_coerce(&options, CellValue::Date(date(2021, 6, 1, 12)));
        assert_eq!((value, ty), (CellValue::text("01 Juni 2021"), CellType::String));
        assert_eq!(engine_coerce(&options, CellValue::Bool(false)).0, CellValue::text("FALSE"));
        assert_eq!(engine_coerce(&options, CellValue::Float(1.5)).0, CellValue::text("1.5"));
        assert_eq!(engine_coerce(&options, CellValue::Empty).0, CellValue::Empty);
    }

    #[test]
    fn test_duration_rendering() {
        let long = Duration::seconds(26 * 3600 + 3 * 60 + 4);
        assert_eq!(render_duration(long, "%H:%M:%S"), "26:03:04");
        assert_eq!(render_duration(long, "%d %H:%M"), "1 02:03");
        assert_eq!(render_duration(-Duration::seconds(61), "%M:%S (100%%)"), "-01:01 (100%)");
    }

    #[test]
    fn test_column_types() {
        let options = ImportOptions::new()
            .with_column_type(0, ColumnType::Numeric)
            .with_column_type(1, ColumnType::Date)
            .with_column_type(2, ColumnType::Bool)
            .with_column_type(3, ColumnType::Time);
        let engine = CoercionEngine::new(&options).unwrap();
        let coerce = |value: CellValue, column: u32| {
            let ty = CellType::resolve(&value);
            engine.coerce(value, ty, column, 0)
        };

        assert_eq!(coerce(CellValue::text("42"), 0), (CellValue::Integer(42), CellType::Number));
        assert_eq!(coerce(CellValue::text("4.5"), 0).0, CellValue::Float(4.5));

        assert_eq!(
            coerce(CellValue::Float(44348.5), 1),
            (CellValue::Date(date(2021, 6, 1, 12)), CellType::Date)
        );
        assert_eq!(
            coerce(CellValue::text("2021-06-01 12:00:00"), 1).0,
            CellValue::Date(date(2021, 6, 1, 12))
        );

        assert_eq!(coerce(CellValue::text("TRUE"), 2).0, CellValue::Bool(true));
        assert_eq!(coerce(CellValue::Integer(0), 2).0, CellValue::Bool(false));
        assert_eq!(coerce(CellValue::Integer(2), 2).0, CellValue::Integer(2));

        assert_eq!(
            coerce(CellValue::Float(0.5), 3),
            (CellValue::Time(Duration::hours(12)), CellType::Time)
        );
        assert_eq!(coerce(CellValue::text("01:30:00"), 3).0, CellValue::Time(Duration::minutes(90)));

        // No policy for this column
        assert_eq!(coerce(CellValue::text("42"), 9).0, CellValue::text("42"));
    }

    #[test]
    fn test_global_overrides_column() {
        let options = ImportOptions::new()
            .with_global_strategy(GlobalStrategy::EverythingToString)
            .with_column_type(0, ColumnType::Bool);
        assert_eq!(engine_coerce(&options, CellValue::Integer(1)).0, CellValue::text("1"));
    }

    #[test]
    fn test_start_row_and_formulas() {
        let options = ImportOptions::new()
            .with_global_strategy(GlobalStrategy::AllNumbersToDouble)
            .with_enforcing_start_row(2);
        let engine = CoercionEngine::new(&options).unwrap();

        let header = engine.coerce(CellValue::text("1"), CellType::String, 0, 1);
        assert_eq!(header.0, CellValue::text("1"));
        let body = engine.coerce(CellValue::text("1"), CellType::String, 0, 2);
        assert_eq!(body.0, CellValue::Float(1.0));

        let formula = engine.coerce(CellValue::text("A1+1"), CellType::Formula, 0, 5);
        assert_eq!(formula, (CellValue::text("A1+1"), CellType::Formula));
    }

    #[test]
    fn test_empty_as_string() {
        let options = ImportOptions::new()
            .with_column_type(0, ColumnType::String)
            .with_empty_as_string(true);
        let engine = CoercionEngine::new(&options).unwrap();

        let enforced = engine.coerce(CellValue::Empty, CellType::Empty, 0, 0);
        assert_eq!(enforced, (CellValue::text(""), CellType::String));
        let free = engine.coerce(CellValue::Empty, CellType::Empty, 1, 0);
        assert_eq!(free, (CellValue::Empty, CellType::Empty));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ImportOptions::new().with_date_time_format("%Q");
        assert!(CoercionEngine::new(&options).is_err());
    }
}
