//! # gridbook-import
//!
//! Turns decoded file content into a [`gridbook_core::Workbook`].
//!
//! A container decoder (out of scope here) hands over a [`DecodedWorkbook`]:
//! the style table plus, per sheet, raw cell records and sheet metadata.
//! [`WorkbookLoader`] threads every value through the [`CoercionEngine`]
//! according to the [`ImportOptions`] policy and builds the workbook.

mod coercion;
mod error;
mod loader;
mod options;

pub use coercion::CoercionEngine;
pub use error::{ImportError, ImportResult};
pub use loader::{DecodedSheet, DecodedWorkbook, RawCell, RawTypeHint, WorkbookLoader};
pub use options::{ColumnType, GlobalStrategy, ImportOptions};
