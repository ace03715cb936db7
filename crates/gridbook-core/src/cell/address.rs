//! Cell address and range types
//!
//! Addresses use the A1 grammar: column letters (`A`..=`XFD`) followed by a
//! 1-based row number. Either part may carry a `$` marker that fixes it when
//! a reference is copied.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_regex::regex_captures;

use crate::error::{Error, Result};
use crate::{MAX_COLUMN, MAX_ROW};

/// Which parts of an address are fixed (`$`-prefixed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceType {
    /// `A1`
    #[default]
    Default,
    /// `A$1`
    FixedRow,
    /// `$A1`
    FixedColumn,
    /// `$A$1`
    FixedRowAndColumn,
}

impl ReferenceType {
    /// Build the variant from the two independent `$` markers.
    pub fn from_flags(fixed_column: bool, fixed_row: bool) -> Self {
        match (fixed_column, fixed_row) {
            (false, false) => ReferenceType::Default,
            (false, true) => ReferenceType::FixedRow,
            (true, false) => ReferenceType::FixedColumn,
            (true, true) => ReferenceType::FixedRowAndColumn,
        }
    }

    /// Whether the column part carries a `$`
    pub fn is_column_fixed(self) -> bool {
        matches!(
            self,
            ReferenceType::FixedColumn | ReferenceType::FixedRowAndColumn
        )
    }

    /// Whether the row part carries a `$`
    pub fn is_row_fixed(self) -> bool {
        matches!(
            self,
            ReferenceType::FixedRow | ReferenceType::FixedRowAndColumn
        )
    }
}

/// A cell address (e.g., "A1", "$B$2")
///
/// Both indices are zero-based. Addresses are validated on construction and
/// immutable afterwards. Ordering is column-major (`column * (MAX_ROW + 1) + row`),
/// which is what range normalization relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    column: u32,
    row: u32,
    reference_type: ReferenceType,
}

impl Address {
    /// Create a relative address, validating both indices
    pub fn new(column: u32, row: u32) -> Result<Self> {
        Self::with_reference(column, row, ReferenceType::Default)
    }

    /// Create an address with the given reference type
    pub fn with_reference(column: u32, row: u32, reference_type: ReferenceType) -> Result<Self> {
        validate_column(column as i64)?;
        validate_row(row as i64)?;
        Ok(Self {
            column,
            row,
            reference_type,
        })
    }

    /// Construct without validation. Callers guarantee the bounds.
    pub(crate) const fn unchecked(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            reference_type: ReferenceType::Default,
        }
    }

    /// Zero-based column index
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Reference type (`$` markers)
    pub fn reference_type(&self) -> ReferenceType {
        self.reference_type
    }

    /// The same position with a different reference type
    pub fn with_reference_type(&self, reference_type: ReferenceType) -> Self {
        Self {
            reference_type,
            ..*self
        }
    }

    /// The same position as a plain relative address
    pub fn relative(&self) -> Self {
        self.with_reference_type(ReferenceType::Default)
    }

    /// Column-major sort key
    pub fn sort_key(&self) -> u64 {
        self.column as u64 * (MAX_ROW as u64 + 1) + self.row as u64
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The grammar is `(\$?)([A-Z]{1,3})(\$?)([0-9]{1,7})`, case-insensitive.
    /// Text that does not match fails with a format error; a match whose row
    /// or column is out of bounds fails with a range error.
    ///
    /// # Examples
    /// ```
    /// use gridbook_core::{Address, ReferenceType};
    ///
    /// let addr = Address::parse("$B$2").unwrap();
    /// assert_eq!(addr.column(), 1);
    /// assert_eq!(addr.row(), 1);
    /// assert_eq!(addr.reference_type(), ReferenceType::FixedRowAndColumn);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (_, col_fixed, letters, row_fixed, digits) =
            regex_captures!(r"^(\$?)([A-Za-z]{1,3})(\$?)([0-9]{1,7})$", s)
                .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;

        let column = Self::letters_to_column(letters)?;
        let row_number: i64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;
        let row = row_number - 1;
        validate_row(row)?;

        Ok(Self {
            column,
            row: row as u32,
            reference_type: ReferenceType::from_flags(!col_fixed.is_empty(), !row_fixed.is_empty()),
        })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    ///
    /// Bijective base 26: there is no zero digit.
    pub fn column_to_letters(column: u32) -> Result<String> {
        validate_column(column as i64)?;
        let mut result = String::new();
        let mut n = column + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        Ok(result)
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: i64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as i64 - 'A' as i64 + 1);
            if col > MAX_COLUMN as i64 + 1 {
                return Err(Error::ColumnOutOfBounds(col - 1, MAX_COLUMN));
            }
        }

        let col = col - 1;
        validate_column(col)?;
        Ok(col as u32)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();

        if self.reference_type.is_column_fixed() {
            result.push('$');
        }
        // Bounds were checked at construction
        let mut n = self.column + 1;
        let mut letters = Vec::with_capacity(3);
        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }
        letters.reverse();
        result.extend(letters.into_iter().map(char::from));

        if self.reference_type.is_row_fixed() {
            result.push('$');
        }
        result.push_str(&(self.row + 1).to_string());

        result
    }

    /// Create a range from this address to another
    pub fn to(&self, other: Address) -> Range {
        Range::new(*self, other)
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then(self.reference_type.cmp(&other.reference_type))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Encode zero-based indices as an address string
pub fn encode_address(column: u32, row: u32, reference_type: ReferenceType) -> Result<String> {
    Address::with_reference(column, row, reference_type).map(|a| a.to_a1_string())
}

/// A rectangular range of cells (e.g., "A1:B10")
///
/// The two corners are normalized so that `start <= end` under [`Address`]
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    start: Address,
    end: Address,
}

impl Range {
    /// Create a new range; the corners may be given in either order
    pub fn new(a: Address, b: Address) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create a range from zero-based indices
    pub fn from_indices(
        start_column: u32,
        start_row: u32,
        end_column: u32,
        end_row: u32,
    ) -> Result<Self> {
        Ok(Self::new(
            Address::new(start_column, start_row)?,
            Address::new(end_column, end_row)?,
        ))
    }

    /// Create a single-cell range
    pub fn single(addr: Address) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from `A1:B10` notation
    ///
    /// Exactly one `:` is required.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidRange(s.to_string()));
        }
        let start = Address::parse(parts[0])?;
        let end = Address::parse(parts[1])?;
        Ok(Self::new(start, end))
    }

    /// The smaller corner
    pub fn start(&self) -> Address {
        self.start
    }

    /// The larger corner
    pub fn end(&self) -> Address {
        self.end
    }

    pub fn min_column(&self) -> u32 {
        self.start.column.min(self.end.column)
    }

    pub fn max_column(&self) -> u32 {
        self.start.column.max(self.end.column)
    }

    pub fn min_row(&self) -> u32 {
        self.start.row.min(self.end.row)
    }

    pub fn max_row(&self) -> u32 {
        self.start.row.max(self.end.row)
    }

    /// Number of columns spanned
    pub fn column_count(&self) -> u32 {
        self.max_column() - self.min_column() + 1
    }

    /// Number of rows spanned
    pub fn row_count(&self) -> u32 {
        self.max_row() - self.min_row() + 1
    }

    /// Total number of cells
    pub fn cell_count(&self) -> u64 {
        self.column_count() as u64 * self.row_count() as u64
    }

    /// Check if a position is within this range (reference type ignored)
    pub fn contains(&self, addr: &Address) -> bool {
        (self.min_column()..=self.max_column()).contains(&addr.column)
            && (self.min_row()..=self.max_row()).contains(&addr.row)
    }

    /// Check whether the two ranges share at least one cell
    pub fn overlaps(&self, other: &Range) -> bool {
        self.min_row() <= other.max_row()
            && self.max_row() >= other.min_row()
            && self.min_column() <= other.max_column()
            && self.max_column() >= other.min_column()
    }

    /// All enclosed addresses, column by column, top to bottom within a column
    ///
    /// The result is materialized so it can be traversed any number of times.
    pub fn enclosed_addresses(&self) -> Vec<Address> {
        let mut result = Vec::with_capacity(self.cell_count().min(1 << 20) as usize);
        for column in self.min_column()..=self.max_column() {
            for row in self.min_row()..=self.max_row() {
                result.push(Address::unchecked(column, row));
            }
        }
        result
    }

    /// Format as `A1:B10`
    pub fn to_a1_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// What kind of expression an "address or range" argument holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    SingleAddress,
    Range,
    Invalid,
}

/// Classify text as a single address, a range, or neither
pub fn address_scope(text: &str) -> AddressScope {
    if Address::parse(text).is_ok() {
        AddressScope::SingleAddress
    } else if Range::parse(text).is_ok() {
        AddressScope::Range
    } else {
        AddressScope::Invalid
    }
}

fn validate_column(column: i64) -> Result<()> {
    if !(0..=MAX_COLUMN as i64).contains(&column) {
        return Err(Error::ColumnOutOfBounds(column, MAX_COLUMN));
    }
    Ok(())
}

fn validate_row(row: i64) -> Result<()> {
    if !(0..=MAX_ROW as i64).contains(&row) {
        return Err(Error::RowOutOfBounds(row, MAX_ROW));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Address::column_to_letters(0).unwrap(), "A");
        assert_eq!(Address::column_to_letters(1).unwrap(), "B");
        assert_eq!(Address::column_to_letters(25).unwrap(), "Z");
        assert_eq!(Address::column_to_letters(26).unwrap(), "AA");
        assert_eq!(Address::column_to_letters(27).unwrap(), "AB");
        assert_eq!(Address::column_to_letters(701).unwrap(), "ZZ");
        assert_eq!(Address::column_to_letters(702).unwrap(), "AAA");
        assert_eq!(Address::column_to_letters(16383).unwrap(), "XFD");

        let err = Address::column_to_letters(16384).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Address::letters_to_column("A").unwrap(), 0);
        assert_eq!(Address::letters_to_column("Z").unwrap(), 25);
        assert_eq!(Address::letters_to_column("AA").unwrap(), 26);
        assert_eq!(Address::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(Address::letters_to_column("XFD").unwrap(), 16383);

        // Case insensitive
        assert_eq!(Address::letters_to_column("a").unwrap(), 0);
        assert_eq!(Address::letters_to_column("xfd").unwrap(), 16383);

        assert_eq!(
            Address::letters_to_column("XFE").unwrap_err().kind(),
            ErrorKind::Range
        );
        assert_eq!(
            Address::letters_to_column("ZZZZZZZZZZ").unwrap_err().kind(),
            ErrorKind::Range
        );
        assert_eq!(
            Address::letters_to_column("A1").unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Address::letters_to_column("").unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_address_parse() {
        let a = addr("A1");
        assert_eq!((a.column(), a.row()), (0, 0));
        assert_eq!(a.reference_type(), ReferenceType::Default);

        assert_eq!(addr("$A1").reference_type(), ReferenceType::FixedColumn);
        assert_eq!(addr("A$1").reference_type(), ReferenceType::FixedRow);
        assert_eq!(addr("$A$1").reference_type(), ReferenceType::FixedRowAndColumn);

        let a = addr("xfd1048576");
        assert_eq!((a.column(), a.row()), (16383, 1048575));
    }

    #[test]
    fn test_address_parse_errors() {
        for text in ["", "A", "1", "A1:B2", " A1", "AAAA1", "A12345678", "$$A1", "A-1"] {
            let err = Address::parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{text}");
        }
        for text in ["A0", "A1048577", "XFE1", "ZZZ1"] {
            let err = Address::parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{text}");
        }
    }

    #[test]
    fn test_construction_bounds() {
        assert!(Address::new(16383, 1048575).is_ok());
        assert_eq!(Address::new(16384, 0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Address::new(0, 1048576).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_equality_includes_reference_type() {
        assert_ne!(addr("A1"), addr("$A$1"));
        assert_eq!(addr("A1"), addr("a1"));
    }

    #[test]
    fn test_ordering_is_column_major() {
        assert!(addr("A1048576") < addr("B1"));
        assert!(addr("A1") < addr("A2"));
        assert_eq!(addr("B1").sort_key(), 1_048_576);
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_address(0, 0, ReferenceType::Default).unwrap(), "A1");
        assert_eq!(
            encode_address(2, 99, ReferenceType::FixedRowAndColumn).unwrap(),
            "$C$100"
        );
        assert_eq!(encode_address(27, 4, ReferenceType::FixedRow).unwrap(), "AB$5");
        assert_eq!(encode_address(27, 4, ReferenceType::FixedColumn).unwrap(), "$AB5");
    }

    #[test]
    fn test_range_normalization() {
        let range = Range::parse("B5:A1").unwrap();
        assert_eq!(range.start(), addr("A1"));
        assert_eq!(range.end(), addr("B5"));
        assert_eq!(range, Range::parse("A1:B5").unwrap());
        assert_eq!(range.to_string(), "A1:B5");
    }

    #[test]
    fn test_range_parse_errors() {
        assert_eq!(Range::parse("A1").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(Range::parse("A1:B2:C3").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(Range::parse("A1:").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(Range::parse("A1:B0").unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_enclosed_addresses_are_rectangular() {
        // Corners that are not top-left/bottom-right still cover the full rectangle
        let range = Range::parse("A2:B1").unwrap();
        let cells: Vec<String> = range
            .enclosed_addresses()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(cells, vec!["A1", "A2", "B1", "B2"]);
        assert_eq!(range.enclosed_addresses().len(), 4);
    }

    #[test]
    fn test_range_contains_and_overlaps() {
        let range = Range::parse("B2:D4").unwrap();
        assert!(range.contains(&addr("C3")));
        assert!(range.contains(&addr("$D$4")));
        assert!(!range.contains(&addr("A1")));
        assert!(!range.contains(&addr("B5")));

        assert!(range.overlaps(&Range::parse("D4:E5").unwrap()));
        assert!(!range.overlaps(&Range::parse("E1:F9").unwrap()));
    }

    #[test]
    fn test_address_scope() {
        assert_eq!(address_scope("C7"), AddressScope::SingleAddress);
        assert_eq!(address_scope("C7:$D$9"), AddressScope::Range);
        assert_eq!(address_scope("C7:"), AddressScope::Invalid);
        assert_eq!(address_scope("hello"), AddressScope::Invalid);
    }

    fn reference_types() -> impl Strategy<Value = ReferenceType> {
        prop_oneof![
            Just(ReferenceType::Default),
            Just(ReferenceType::FixedRow),
            Just(ReferenceType::FixedColumn),
            Just(ReferenceType::FixedRowAndColumn),
        ]
    }

    proptest! {
        #[test]
        fn prop_address_round_trip(
            column in 0u32..=MAX_COLUMN,
            row in 0u32..=MAX_ROW,
            reference_type in reference_types(),
        ) {
            let text = encode_address(column, row, reference_type).unwrap();
            let parsed = Address::parse(&text).unwrap();
            prop_assert_eq!(parsed.column(), column);
            prop_assert_eq!(parsed.row(), row);
            prop_assert_eq!(parsed.reference_type(), reference_type);
        }

        #[test]
        fn prop_column_bijection(column in 0u32..=MAX_COLUMN) {
            let letters = Address::column_to_letters(column).unwrap();
            prop_assert_eq!(Address::letters_to_column(&letters).unwrap(), column);
        }
    }
}
