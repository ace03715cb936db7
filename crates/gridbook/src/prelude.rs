//! Prelude module - common imports for gridbook users
//!
//! ```rust
//! use gridbook::prelude::*;
//! ```

pub use crate::{
    Address,
    // Style types
    BasicStyle,
    Border,
    BorderLineStyle,
    // Cell types
    CellDirection,
    CellType,
    CellValue,
    Color,

    // Error types
    Error,
    ErrorKind,
    Fill,
    Font,
    HorizontalAlignment,
    NumberFormat,
    Range,
    Result,
    Shortener,
    Style,
    StyleTable,
    VerticalAlignment,
    // Main types
    Workbook,
    Worksheet,
};

#[cfg(feature = "import")]
pub use crate::{ColumnType, GlobalStrategy, ImportOptions, WorkbookLoader};
