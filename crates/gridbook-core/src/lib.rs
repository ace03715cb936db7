//! # gridbook-core
//!
//! Core document model for the gridbook spreadsheet engine.
//!
//! This crate provides the in-memory model an encoder serializes and a
//! decoder fills:
//! - [`Address`] and [`Range`] - A1-style addressing
//! - [`units`] - Date serials, width/height units and the legacy password hash
//! - [`Style`] and [`StyleRepository`] - Formatting with one canonical instance per distinct value
//! - [`Workbook`], [`Worksheet`] - The main document structures
//!
//! ## Example
//!
//! ```rust
//! use gridbook_core::{CellType, Range, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.current_worksheet_mut().unwrap();
//!
//! sheet.add_next(42).unwrap();
//! sheet.add_next("x").unwrap();
//! assert_eq!(sheet.current_column(), 2);
//!
//! sheet.merge(Range::parse("A2:B2").unwrap()).unwrap();
//! sheet.resolve_merges().unwrap();
//! assert_eq!(sheet.cell("B2").unwrap().unwrap().cell_type(), CellType::Empty);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod metadata;
pub mod shortener;
pub mod style;
pub mod units;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    address_scope, encode_address, Address, AddressScope, Cell, CellType, CellValue, Range,
    ReferenceType,
};
pub use column::Column;
pub use error::{Error, ErrorKind, Result};
pub use metadata::Metadata;
pub use shortener::Shortener;
pub use workbook::{Workbook, WorkbookProtection};
pub use worksheet::{
    CellDirection, PaneMode, PaneSplit, PaneValue, SheetProtection, SheetProtectionValue,
    SheetView, ViewType, Worksheet,
};

// Re-export all style types for convenience
pub use style::{
    BasicStyle, Border, BorderEdge, BorderLineStyle, CellFormat, Color, Fill, Font,
    HorizontalAlignment, NumberFormat, PatternType, SharedStyles, Style, StyleRepository,
    VerticalAlignment,
};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u32 = 16_384;

/// Largest zero-based row index
pub const MAX_ROW: u32 = MAX_ROWS - 1;

/// Largest zero-based column index
pub const MAX_COLUMN: u32 = MAX_COLS - 1;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
