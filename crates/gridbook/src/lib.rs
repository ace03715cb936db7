//! # gridbook
//!
//! A Rust library for building spreadsheet workbooks in memory and handing
//! them to a container encoder.
//!
//! ## Features
//!
//! - A1-style addressing and spreadsheet date serials
//! - Worksheets with a write cursor, merges, auto-filters, panes and protection
//! - Styles with one canonical instance per distinct value
//! - Loading decoded workbook content with type coercion (`import` feature)
//!
//! ## Example
//!
//! ```rust
//! use gridbook::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.current_worksheet_mut().unwrap();
//!
//! sheet.add_next("Hello").unwrap();
//! sheet.add_next_styled(42, &BasicStyle::Bold.style()).unwrap();
//! sheet.merge_range("A2:B2").unwrap();
//!
//! let styles = StyleTable::prepare(&mut workbook).unwrap();
//! let sheet = workbook.worksheet(0).unwrap();
//! let b1 = sheet.cell("B1").unwrap().unwrap();
//! assert!(styles.cell_style_index(b1).unwrap() > 0);
//! ```

pub mod encode;
pub mod prelude;

pub use encode::StyleTable;

// Re-export core types
pub use gridbook_core::{
    address_scope,
    encode_address,
    units,
    Address,
    AddressScope,
    // Style types
    BasicStyle,
    Border,
    BorderEdge,
    BorderLineStyle,
    // Cell types
    Cell,
    CellDirection,
    CellFormat,
    CellType,
    CellValue,
    Color,
    Column,
    // Error types
    Error,
    ErrorKind,
    Fill,
    Font,
    HorizontalAlignment,
    Metadata,
    NumberFormat,
    PaneMode,
    PaneSplit,
    PaneValue,
    PatternType,
    Range,
    ReferenceType,
    Result,
    SharedStyles,
    SheetProtection,
    SheetProtectionValue,
    SheetView,
    Shortener,
    Style,
    StyleRepository,
    VerticalAlignment,
    ViewType,
    // Main types
    Workbook,
    WorkbookProtection,
    Worksheet,

    // Constants
    MAX_COLS,
    MAX_COLUMN,
    MAX_ROW,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export import types
#[cfg(feature = "import")]
pub use gridbook_import::{
    ColumnType, DecodedSheet, DecodedWorkbook, GlobalStrategy, ImportError, ImportOptions,
    ImportResult, RawCell, RawTypeHint, WorkbookLoader,
};
