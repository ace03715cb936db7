//! Column types

use std::sync::Arc;

use crate::style::Style;

/// Default column width, in characters
pub const DEFAULT_COLUMN_WIDTH: f32 = 10.0;

/// Widths closer than this to the default count as default
const WIDTH_TOLERANCE: f32 = 0.0001;

/// Column metadata
///
/// Only materialized for columns that differ from the defaults in some way.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column index (0-based)
    index: u32,
    /// Width in characters
    pub width: f32,
    /// Column is hidden
    pub hidden: bool,
    /// Column lies within the sheet's auto-filter range
    pub has_auto_filter: bool,
    /// Canonical style applied to empty cells of the column
    pub(crate) default_style: Option<Arc<Style>>,
}

impl Column {
    /// Create a new column with default settings
    pub fn new(index: u32) -> Self {
        Self {
            index,
            width: DEFAULT_COLUMN_WIDTH,
            hidden: false,
            has_auto_filter: false,
            default_style: None,
        }
    }

    /// Column index (0-based)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The column's canonical default style
    pub fn default_style(&self) -> Option<&Arc<Style>> {
        self.default_style.as_ref()
    }

    /// Check if the entry carries nothing worth storing
    pub fn is_default(&self) -> bool {
        !self.hidden
            && !self.has_auto_filter
            && self.default_style.is_none()
            && (self.width - DEFAULT_COLUMN_WIDTH).abs() < WIDTH_TOLERANCE
    }
}
