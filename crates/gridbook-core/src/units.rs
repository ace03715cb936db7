//! Numeric conversions between user-facing values and their stored form
//!
//! Dates and times are stored as OA-date serials: fractional days since
//! 1899-12-30, with the historical 1900 leap-year bug (a phantom 1900-02-29 at
//! serial 60). Column widths, row heights and pane splits are stored in
//! pixel-snapped internal units.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// `num_days_from_ce` of 1899-12-30, the serial epoch
const EPOCH_DAYS_FROM_CE: i64 = 693_594;
/// Serial of 1900-03-01, the first date after the phantom leap day
const FIRST_SERIAL_AFTER_LEAP_BUG: i64 = 61;
/// Serial of 1900-01-01
const MIN_SERIAL: i64 = 2;
/// Serial of 9999-12-31
const MAX_SERIAL: i64 = 2_958_465;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default maximum digit width of the default font, in pixels
pub const DEFAULT_MAX_DIGIT_WIDTH: f32 = 7.0;
/// Default cell text padding, in pixels
pub const DEFAULT_TEXT_PADDING: f32 = 5.0;
/// Widest allowed column, in characters
pub const MAX_COLUMN_WIDTH: f32 = 255.0;
/// Tallest allowed row, in points
pub const MAX_ROW_HEIGHT: f32 = 409.5;

/// Points per pixel
const ROW_HEIGHT_POINT_RATIO: f32 = 0.75;
const SPLIT_WIDTH_MULTIPLIER: f32 = 12.0;
const SPLIT_WIDTH_OFFSET: f32 = 0.5;
const SPLIT_POINT_RATIO: f32 = 0.75;
const SPLIT_DIVIDER: f32 = 20.0;
const SPLIT_WIDTH_POINT_OFFSET: f32 = 390.0;
const SPLIT_HEIGHT_POINT_OFFSET: f32 = 300.0;

/// Convert a date to its serial value
///
/// Fails with a format error outside 1900-01-01 ..= 9999-12-31 23:59:59.999.
/// Sub-second precision is dropped.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use gridbook_core::units::oa_date;
///
/// let date = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(oa_date(date).unwrap(), 61.5);
/// ```
pub fn oa_date(date: NaiveDateTime) -> Result<f64> {
    let raw = raw_serial_days(&date);
    if !(MIN_SERIAL..=MAX_SERIAL).contains(&raw) {
        return Err(Error::DateOutOfRange(date.to_string()));
    }
    Ok(oa_date_unchecked(date))
}

/// [`oa_date`] without the range check, for values that were already validated
pub fn oa_date_unchecked(date: NaiveDateTime) -> f64 {
    let mut days = raw_serial_days(&date);
    if days < FIRST_SERIAL_AFTER_LEAP_BUG {
        days -= 1;
    }
    days as f64 + date.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY
}

fn raw_serial_days(date: &NaiveDateTime) -> i64 {
    date.date().num_days_from_ce() as i64 - EPOCH_DAYS_FROM_CE
}

/// Convert a serial value back to a date
///
/// Values below 60 are shifted by one day to undo the forward correction,
/// so serial 60 (the phantom 1900-02-29) reads back as 1900-02-28. The
/// time of day is rounded to the nearest second, halves away from zero.
pub fn date_from_oa(value: f64) -> Result<NaiveDateTime> {
    if !value.is_finite() || value < 0.0 || value >= (MAX_SERIAL + 1) as f64 {
        return Err(Error::InvalidEpoch(value));
    }

    let value = if value < 60.0 { value + 1.0 } else { value };
    let mut days = value.floor() as i64;
    let mut seconds = ((value - value.floor()) * SECONDS_PER_DAY).round() as i64;
    if seconds >= SECONDS_PER_DAY as i64 {
        days += 1;
        seconds -= SECONDS_PER_DAY as i64;
    }
    if days > MAX_SERIAL {
        return Err(Error::InvalidEpoch(value));
    }

    let date = NaiveDate::from_num_days_from_ce_opt((days + EPOCH_DAYS_FROM_CE) as i32)
        .ok_or(Error::InvalidEpoch(value))?;
    let secs = seconds as u32;
    date.and_hms_opt(secs / 3600, (secs % 3600) / 60, secs % 60)
        .ok_or(Error::InvalidEpoch(value))
}

/// Convert elapsed time to fractional days
///
/// Durations longer than a day produce values of 1 or more. Negative
/// durations cannot be stored and fail with a format error.
pub fn oa_time(duration: Duration) -> Result<f64> {
    if duration < Duration::zero() {
        return Err(Error::InvalidDuration(format!(
            "negative duration of {} seconds",
            duration.num_seconds()
        )));
    }
    Ok(duration.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY)
}

/// Convert fractional days back to elapsed time, rounded to the second
///
/// Half seconds round up.
pub fn time_from_oa(value: f64) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 || value > MAX_SERIAL as f64 {
        return Err(Error::InvalidEpoch(value));
    }
    Ok(Duration::seconds(
        (value * SECONDS_PER_DAY).round() as i64,
    ))
}

/// Stored width of a column that is `width` characters wide
///
/// Snaps to whole pixels of the given font metrics, in 1/256 steps.
///
/// # Examples
/// ```
/// use gridbook_core::units::{internal_column_width, DEFAULT_MAX_DIGIT_WIDTH, DEFAULT_TEXT_PADDING};
///
/// let w = internal_column_width(10.0, DEFAULT_MAX_DIGIT_WIDTH, DEFAULT_TEXT_PADDING).unwrap();
/// assert_eq!(w, 10.7109375);
/// ```
pub fn internal_column_width(width: f32, max_digit_width: f32, text_padding: f32) -> Result<f32> {
    if !(0.0..=MAX_COLUMN_WIDTH).contains(&width) {
        return Err(Error::unconvertible(
            "Column width",
            width as f64,
            0.0,
            MAX_COLUMN_WIDTH as f64,
        ));
    }
    if width <= 0.0 || max_digit_width <= 0.0 {
        return Ok(0.0);
    }

    let snapped = if width <= 1.0 {
        (width * (max_digit_width + text_padding) / max_digit_width * 256.0).floor() / 256.0
    } else {
        ((width * max_digit_width + text_padding) / max_digit_width * 256.0).floor() / 256.0
    };
    Ok(snapped)
}

/// Stored height of a row that is `height` points tall, snapped to whole pixels
pub fn internal_row_height(height: f32) -> Result<f32> {
    if !(0.0..=MAX_ROW_HEIGHT).contains(&height) {
        return Err(Error::unconvertible(
            "Row height",
            height as f64,
            0.0,
            MAX_ROW_HEIGHT as f64,
        ));
    }
    if height == 0.0 {
        return Ok(0.0);
    }
    Ok((height / ROW_HEIGHT_POINT_RATIO).round() * ROW_HEIGHT_POINT_RATIO)
}

/// Stored position of a vertical split `width` characters from the left edge
///
/// Negative widths are treated as 0.
pub fn internal_pane_split_width(width: f32, max_digit_width: f32, text_padding: f32) -> f32 {
    let width = width.max(0.0);
    let pixels = if width <= 1.0 {
        (width * SPLIT_WIDTH_MULTIPLIER + SPLIT_WIDTH_OFFSET).floor()
    } else {
        (width * max_digit_width + SPLIT_WIDTH_OFFSET).floor() + text_padding
    };
    let points = pixels * SPLIT_POINT_RATIO;
    points * SPLIT_DIVIDER + SPLIT_WIDTH_POINT_OFFSET
}

/// Stored position of a horizontal split `height` points from the top edge
///
/// Negative heights are treated as 0.
pub fn internal_pane_split_height(height: f32) -> f32 {
    (height.max(0.0) * SPLIT_DIVIDER + SPLIT_HEIGHT_POINT_OFFSET).floor()
}

/// Approximate inverse of [`internal_pane_split_width`]
///
/// Lossy: the forward conversion snaps to whole pixels.
pub fn pane_split_width_from_internal(
    internal: f32,
    max_digit_width: f32,
    text_padding: f32,
) -> f32 {
    if internal < SPLIT_WIDTH_POINT_OFFSET {
        return 0.0;
    }
    let points = (internal - SPLIT_WIDTH_POINT_OFFSET) / SPLIT_DIVIDER;
    let pixels = points / SPLIT_POINT_RATIO;
    if pixels <= SPLIT_WIDTH_MULTIPLIER {
        pixels / SPLIT_WIDTH_MULTIPLIER
    } else {
        (pixels - text_padding) / max_digit_width
    }
}

/// Inverse of [`internal_pane_split_height`], exact up to the floor
pub fn pane_split_height_from_internal(internal: f32) -> f32 {
    if internal < SPLIT_HEIGHT_POINT_OFFSET {
        return 0.0;
    }
    (internal - SPLIT_HEIGHT_POINT_OFFSET) / SPLIT_DIVIDER
}

/// Legacy 16-bit protection hash of a password, as uppercase hex
///
/// This is a structural marker understood by spreadsheet applications, not
/// a cryptographic protection. An empty password yields an empty string.
pub fn password_hash(password: &str) -> String {
    if password.is_empty() {
        return String::new();
    }

    fn rotate(hash: u32) -> u32 {
        ((hash >> 14) & 0x01) | ((hash << 1) & 0x7fff)
    }

    // Characters outside the BMP hash as their two surrogate units
    let units: Vec<u16> = password.encode_utf16().collect();
    let mut hash: u32 = 0;
    for &unit in units.iter().rev() {
        hash = rotate(hash) ^ u32::from(unit);
    }
    hash = rotate(hash);
    hash ^= 0xCE4B;
    hash ^= units.len() as u32;

    format!("{:X}", hash)
}
