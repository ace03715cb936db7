//! Error types for gridbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// The four families every [`Error`] belongs to.
///
/// Callers usually branch on the kind rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed textual input or a value outside a conversion domain
    Format,
    /// A numeric value outside its documented bound
    Range,
    /// A well-formed operation that violates a cross-sheet/workbook invariant
    Worksheet,
    /// The style repository could not be used
    Style,
}

/// Errors that can occur in gridbook-core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Text does not match the cell address grammar
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Text does not match the `start:end` range grammar
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(i64, u32),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(i64, u32),

    /// A numeric setting outside its allowed interval
    #[error("{what} {value} out of range ({min} to {max})")]
    ValueOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Date outside the representable epoch window
    #[error("Date {0} is outside the supported range (1900-01-01 to 9999-12-31)")]
    DateOutOfRange(String),

    /// Epoch value that cannot be turned back into a date
    #[error("Epoch value {0} cannot be converted to a date")]
    InvalidEpoch(f64),

    /// Duration that cannot be encoded as fractional days
    #[error("Duration cannot be converted: {0}")]
    InvalidDuration(String),

    /// Input outside the domain of a unit conversion
    #[error("{what} {value} cannot be converted (allowed {min} to {max})")]
    ConversionOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Malformed color string
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Malformed version string
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    /// Version string component is too long
    #[error("Version component '{0}' is too long (max {1} digits)")]
    VersionComponentTooLong(String, usize),

    /// Merge range shares cells with an existing merge
    #[error("Range {0} overlaps the merged range {1}")]
    MergeOverlap(String, String),

    /// Merge range is not registered on the worksheet
    #[error("Merged range {0} does not exist")]
    MergeNotFound(String),

    /// Number of values does not match the number of target cells
    #[error("Expected {expected} values for the range, got {actual}")]
    RangeSizeMismatch { expected: usize, actual: usize },

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Removing the sheet would leave the workbook empty
    #[error("A workbook must contain at least one worksheet")]
    NoWorksheets,

    /// Every worksheet would be hidden
    #[error("At least one worksheet must be visible")]
    NoVisibleWorksheet,

    /// The selected worksheet is (or would become) hidden
    #[error("The selected worksheet '{0}' cannot be hidden")]
    SelectedWorksheetHidden(String),

    /// The workbook has no current worksheet to write to
    #[error("The workbook has no current worksheet")]
    NoCurrentWorksheet,

    /// Frozen split with a top-left cell inside the frozen region
    #[error("Invalid frozen split: {0}")]
    InvalidFreezeSplit(String),

    /// The style repository lock was poisoned
    #[error("Style repository is not reachable")]
    StyleRepositoryUnavailable,
}

impl Error {
    /// The family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAddress(_)
            | Error::InvalidRange(_)
            | Error::DateOutOfRange(_)
            | Error::InvalidEpoch(_)
            | Error::InvalidDuration(_)
            | Error::ConversionOutOfRange { .. }
            | Error::InvalidColor(_)
            | Error::InvalidVersion(_) => ErrorKind::Format,

            Error::ColumnOutOfBounds(..)
            | Error::RowOutOfBounds(..)
            | Error::ValueOutOfRange { .. }
            | Error::VersionComponentTooLong(..)
            | Error::MergeOverlap(..)
            | Error::MergeNotFound(_)
            | Error::RangeSizeMismatch { .. }
            | Error::SheetOutOfBounds(..) => ErrorKind::Range,

            Error::SheetNotFound(_)
            | Error::InvalidSheetName(_)
            | Error::DuplicateSheetName(_)
            | Error::NoWorksheets
            | Error::NoVisibleWorksheet
            | Error::SelectedWorksheetHidden(_)
            | Error::NoCurrentWorksheet
            | Error::InvalidFreezeSplit(_) => ErrorKind::Worksheet,

            Error::StyleRepositoryUnavailable => ErrorKind::Style,
        }
    }

    pub(crate) fn unconvertible(what: &'static str, value: f64, min: f64, max: f64) -> Self {
        Error::ConversionOutOfRange {
            what,
            value,
            min,
            max,
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: f64, min: f64, max: f64) -> Self {
        Error::ValueOutOfRange {
            what,
            value,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::InvalidAddress("1A".into()).kind(), ErrorKind::Format);
        assert_eq!(Error::ColumnOutOfBounds(16384, 16383).kind(), ErrorKind::Range);
        assert_eq!(
            Error::MergeOverlap("B2:C3".into(), "A1:B2".into()).kind(),
            ErrorKind::Range
        );
        assert_eq!(Error::DuplicateSheetName("a".into()).kind(), ErrorKind::Worksheet);
        assert_eq!(Error::StyleRepositoryUnavailable.kind(), ErrorKind::Style);
    }

    #[test]
    fn test_messages() {
        let err = Error::out_of_range("Column width", 300.0, 0.0, 255.0);
        assert_eq!(err.to_string(), "Column width 300 out of range (0 to 255)");
    }
}
