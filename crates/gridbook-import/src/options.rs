//! Import options

use std::collections::BTreeMap;

use chrono::format::{Item, StrftimeItems};
use chrono::Locale;
use gridbook_core::Address;

use crate::error::{ImportError, ImportResult};

/// Default pattern for dates rendered as text
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Default pattern for durations rendered as text
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Tokens understood in duration patterns
const TIME_TOKENS: [char; 5] = ['d', 'H', 'M', 'S', '%'];

/// Conversion applied to every cell, overriding per-column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlobalStrategy {
    /// Keep natural types, apply per-column types
    #[default]
    Default,
    AllNumbersToDouble,
    AllNumbersToDecimal,
    /// Numbers are rounded half to even
    AllNumbersToInt,
    EverythingToString,
}

/// Type enforced on one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Integer when the value is integral, float otherwise
    Numeric,
    Double,
    Decimal,
    Date,
    Time,
    Bool,
    String,
}

/// Options for loading decoded content
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Conversion for all cells (default: none)
    pub global_strategy: GlobalStrategy,
    /// Enforced types by zero-based column index
    pub column_types: BTreeMap<u32, ColumnType>,
    /// Zero-based row from which enforcement applies (default: 0)
    pub enforcing_start_row: u32,
    /// Enforced empty cells become empty strings instead of staying empty
    pub empty_as_string: bool,
    /// Keep date and time values as serial numbers
    pub enforce_date_time_as_number: bool,
    /// strftime pattern for dates rendered as text
    pub date_time_format: String,
    /// Pattern for durations rendered as text (`%d %H %M %S %%`)
    pub time_format: String,
    /// Locale for month and day names in rendered dates
    pub locale: Locale,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            global_strategy: GlobalStrategy::Default,
            column_types: BTreeMap::new(),
            enforcing_start_row: 0,
            empty_as_string: false,
            enforce_date_time_as_number: false,
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            locale: Locale::en_US,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_strategy(mut self, strategy: GlobalStrategy) -> Self {
        self.global_strategy = strategy;
        self
    }

    /// Enforce a type on a column given by zero-based index
    pub fn with_column_type(mut self, column: u32, column_type: ColumnType) -> Self {
        self.column_types.insert(column, column_type);
        self
    }

    /// Enforce a type on a column given by letters, e.g. `"C"`
    pub fn with_column_type_for(self, letters: &str, column_type: ColumnType) -> ImportResult<Self> {
        let column = Address::letters_to_column(letters)?;
        Ok(self.with_column_type(column, column_type))
    }

    pub fn with_enforcing_start_row(mut self, row: u32) -> Self {
        self.enforcing_start_row = row;
        self
    }

    pub fn with_empty_as_string(mut self, enabled: bool) -> Self {
        self.empty_as_string = enabled;
        self
    }

    pub fn with_date_time_as_number(mut self, enabled: bool) -> Self {
        self.enforce_date_time_as_number = enabled;
        self
    }

    pub fn with_date_time_format<S: Into<String>>(mut self, pattern: S) -> Self {
        self.date_time_format = pattern.into();
        self
    }

    pub fn with_time_format<S: Into<String>>(mut self, pattern: S) -> Self {
        self.time_format = pattern.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Check whether any enforcement can apply at `(column, row)`
    pub fn enforces(&self, column: u32, row: u32) -> bool {
        row >= self.enforcing_start_row
            && (self.global_strategy != GlobalStrategy::Default
                || self.column_types.contains_key(&column))
    }

    /// Reject unusable patterns
    pub fn validate(&self) -> ImportResult<()> {
        let date_ok = !self.date_time_format.is_empty()
            && !StrftimeItems::new(&self.date_time_format).any(|item| matches!(item, Item::Error));
        if !date_ok {
            return Err(ImportError::InvalidPattern {
                what: "date",
                pattern: self.date_time_format.clone(),
            });
        }

        if !time_pattern_is_valid(&self.time_format) {
            return Err(ImportError::InvalidPattern {
                what: "time",
                pattern: self.time_format.clone(),
            });
        }
        Ok(())
    }
}

fn time_pattern_is_valid(pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some(token) if TIME_TOKENS.contains(&token) => {}
                _ => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbook_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.global_strategy, GlobalStrategy::Default);
        assert_eq!(options.date_time_format, "%Y-%m-%d %H:%M:%S");
        assert!(options.validate().is_ok());
        assert!(!options.enforces(0, 0));
    }

    #[test]
    fn test_builders() {
        let options = ImportOptions::new()
            .with_column_type(1, ColumnType::Bool)
            .with_column_type_for("c", ColumnType::Date)
            .unwrap()
            .with_enforcing_start_row(1);

        assert_eq!(options.column_types.get(&2), Some(&ColumnType::Date));
        assert!(options.enforces(1, 1));
        assert!(!options.enforces(1, 0));
        assert!(!options.enforces(0, 5));

        let err = ImportOptions::new()
            .with_column_type_for("1", ColumnType::Date)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_validate_patterns() {
        let bad_date = ImportOptions::new().with_date_time_format("%Y-%Q");
        assert!(matches!(
            bad_date.validate(),
            Err(ImportError::InvalidPattern { what: "date", .. })
        ));

        let bad_time = ImportOptions::new().with_time_format("%H:%Y");
        assert!(matches!(
            bad_time.validate(),
            Err(ImportError::InvalidPattern { what: "time", .. })
        ));

        let dangling = ImportOptions::new().with_time_format("%H:%");
        assert!(dangling.validate().is_err());

        let ok = ImportOptions::new()
            .with_date_time_format("%d %B %Y")
            .with_time_format("%d days %H:%M");
        assert!(ok.validate().is_ok());
    }
}
