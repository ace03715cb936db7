//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`Address`] - A cell's location (e.g., "A1")
//! - [`Range`] - A range of cells (e.g., "A1:B10")
//! - [`Cell`] - Value, resolved type, address and style

mod address;
mod value;

use std::sync::Arc;

pub use address::{address_scope, encode_address, Address, AddressScope, Range, ReferenceType};
pub use value::CellValue;

use log::debug;

use crate::style::{BasicStyle, Style};

/// Type tag of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    String,
    Number,
    Date,
    Time,
    Bool,
    /// Opaque formula text, never evaluated
    Formula,
    Empty,
    /// Resolved from the value when the cell is created
    #[default]
    Default,
}

impl CellType {
    /// Infer the concrete type from a value
    pub fn resolve(value: &CellValue) -> CellType {
        match value {
            CellValue::Empty => CellType::Empty,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Decimal(_) => {
                CellType::Number
            }
            CellValue::Date(_) => CellType::Date,
            CellValue::Time(_) => CellType::Time,
            CellValue::Text(_) => CellType::String,
        }
    }
}

/// A single cell as held in a worksheet's cell table
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    value: CellValue,
    cell_type: CellType,
    address: Address,
    style: Option<Arc<Style>>,
}

impl Cell {
    /// Create a cell; `CellType::Default` is resolved from the value
    ///
    /// `CellType::Empty` discards the value. `CellType::Formula` keeps the
    /// value as formula text without a leading `=`. `CellType::String`
    /// renders any other non-empty value as text. Any other type that does
    /// not fit the value is replaced by the resolved one.
    pub fn new(value: impl Into<CellValue>, cell_type: CellType, address: Address) -> Self {
        let value = value.into();
        let (value, cell_type) = match cell_type {
            CellType::Default => {
                let resolved = CellType::resolve(&value);
                (value, resolved)
            }
            CellType::Empty => (CellValue::Empty, CellType::Empty),
            CellType::Formula => {
                let text = value.to_string();
                let text = text.strip_prefix('=').map(str::to_string).unwrap_or(text);
                (CellValue::Text(text), CellType::Formula)
            }
            CellType::String if !matches!(value, CellValue::Empty | CellValue::Text(_)) => {
                (CellValue::Text(value.to_string()), CellType::String)
            }
            other => {
                let resolved = CellType::resolve(&value);
                if resolved != other {
                    debug!(
                        "{:?} does not fit a {} value, using {:?}",
                        other,
                        value.type_name(),
                        resolved
                    );
                }
                (value, resolved)
            }
        };

        Self {
            value,
            cell_type,
            address: address.relative(),
            style: None,
        }
    }

    /// Create a formula cell
    pub fn formula(text: impl Into<String>, address: Address) -> Self {
        Self::new(CellValue::Text(text.into()), CellType::Formula, address)
    }

    /// Create an empty cell
    pub fn empty(address: Address) -> Self {
        Self::new(CellValue::Empty, CellType::Empty, address)
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn column(&self) -> u32 {
        self.address.column()
    }

    pub fn row(&self) -> u32 {
        self.address.row()
    }

    /// The canonical style, if any
    pub fn style(&self) -> Option<&Arc<Style>> {
        self.style.as_ref()
    }

    /// Formula text of a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self.cell_type {
            CellType::Formula => self.value.as_str(),
            _ => None,
        }
    }

    /// The style the value kind implies: date cells get a date format,
    /// time cells a time format
    pub fn implicit_style(&self) -> Option<Style> {
        match self.cell_type {
            CellType::Date => Some(BasicStyle::DateFormat.style()),
            CellType::Time => Some(BasicStyle::TimeFormat.style()),
            _ => None,
        }
    }

    /// Turn this cell into an empty placeholder, keeping address and style
    pub(crate) fn clear_value(&mut self) {
        self.value = CellValue::Empty;
        self.cell_type = CellType::Empty;
    }

    /// Attach a canonical style; callers resolve it through the repository
    pub(crate) fn set_style(&mut self, style: Option<Arc<Style>>) {
        self.style = style;
    }
}
