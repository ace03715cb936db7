//! Columns, rows, auto-filter and boundary queries

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use log::debug;

use super::Worksheet;
use crate::cell::{Address, Range};
use crate::column::{Column, DEFAULT_COLUMN_WIDTH};
use crate::error::{Error, Result};
use crate::style::Style;
use crate::units::{MAX_COLUMN_WIDTH, MAX_ROW_HEIGHT};
use crate::{MAX_COLUMN, MAX_ROW};

fn check_column(column: u32) -> Result<()> {
    if column > MAX_COLUMN {
        return Err(Error::ColumnOutOfBounds(column as i64, MAX_COLUMN));
    }
    Ok(())
}

fn check_row(row: u32) -> Result<()> {
    if row > MAX_ROW {
        return Err(Error::RowOutOfBounds(row as i64, MAX_ROW));
    }
    Ok(())
}

fn check_width(width: f32) -> Result<()> {
    if !(0.0..=MAX_COLUMN_WIDTH).contains(&width) {
        return Err(Error::out_of_range(
            "Column width",
            width as f64,
            0.0,
            MAX_COLUMN_WIDTH as f64,
        ));
    }
    Ok(())
}

fn check_height(height: f32) -> Result<()> {
    if !(0.0..=MAX_ROW_HEIGHT).contains(&height) {
        return Err(Error::out_of_range(
            "Row height",
            height as f64,
            0.0,
            MAX_ROW_HEIGHT as f64,
        ));
    }
    Ok(())
}

impl Worksheet {
    // === Defaults ===

    /// Width of columns without an entry, in characters
    pub fn default_column_width(&self) -> f32 {
        self.default_column_width
    }

    pub fn set_default_column_width(&mut self, width: f32) -> Result<()> {
        check_width(width)?;
        self.default_column_width = width;
        Ok(())
    }

    /// Height of rows without an entry, in points
    pub fn default_row_height(&self) -> f32 {
        self.default_row_height
    }

    pub fn set_default_row_height(&mut self, height: f32) -> Result<()> {
        check_height(height)?;
        self.default_row_height = height;
        Ok(())
    }

    // === Columns ===

    /// Sparse column entries
    pub fn columns(&self) -> &BTreeMap<u32, Column> {
        &self.columns
    }

    /// Get the entry for a column, if one is stored
    pub fn column(&self, column: u32) -> Option<&Column> {
        self.columns.get(&column)
    }

    /// Effective column width
    pub fn column_width(&self, column: u32) -> f32 {
        self.columns
            .get(&column)
            .map(|c| c.width)
            .unwrap_or(self.default_column_width)
    }

    /// Set column width, in characters (0 to 255)
    pub fn set_column_width(&mut self, column: u32, width: f32) -> Result<()> {
        check_column(column)?;
        check_width(width)?;
        self.column_entry(column).width = width;
        Ok(())
    }

    /// Check if column is hidden
    pub fn is_column_hidden(&self, column: u32) -> bool {
        self.columns.get(&column).is_some_and(|c| c.hidden)
    }

    pub fn add_hidden_column(&mut self, column: u32) -> Result<()> {
        self.set_column_hidden(column, true)
    }

    pub fn remove_hidden_column(&mut self, column: u32) -> Result<()> {
        self.set_column_hidden(column, false)
    }

    /// Set column hidden state
    ///
    /// Unhiding drops the entry when nothing else about the column differs
    /// from the defaults.
    pub fn set_column_hidden(&mut self, column: u32, hidden: bool) -> Result<()> {
        check_column(column)?;
        if hidden {
            self.column_entry(column).hidden = true;
        } else if let Some(entry) = self.columns.get_mut(&column) {
            entry.hidden = false;
            if entry.is_default() {
                self.columns.remove(&column);
            }
        }
        Ok(())
    }

    /// Set the style of empty cells in a column; returns the canonical instance
    pub fn set_column_default_style(&mut self, column: u32, style: Style) -> Result<Arc<Style>> {
        check_column(column)?;
        let canonical = self.styles.intern(style)?;
        self.column_entry(column).default_style = Some(Arc::clone(&canonical));
        Ok(canonical)
    }

    /// Drop the stored settings of a column
    ///
    /// Columns inside the auto-filter keep their entry and only return to
    /// default width and visibility.
    pub fn reset_column(&mut self, column: u32) -> Result<()> {
        check_column(column)?;
        let default_width = DEFAULT_COLUMN_WIDTH;
        match self.columns.get_mut(&column) {
            Some(entry) if entry.has_auto_filter => {
                entry.width = default_width;
                entry.hidden = false;
            }
            Some(_) => {
                self.columns.remove(&column);
            }
            None => {}
        }
        Ok(())
    }

    fn column_entry(&mut self, column: u32) -> &mut Column {
        self.columns
            .entry(column)
            .or_insert_with(|| Column::new(column))
    }

    /// Remove every column entry that only carries defaults
    pub fn recalculate_columns(&mut self) {
        let before = self.columns.len();
        self.columns.retain(|_, column| !column.is_default());
        let pruned = before - self.columns.len();
        if pruned > 0 {
            debug!("sheet '{}': pruned {} default column entries", self.name, pruned);
        }
    }

    // === Auto-filter ===

    /// The auto-filter range, if any
    pub fn auto_filter(&self) -> Option<&Range> {
        self.auto_filter.as_ref()
    }

    /// Put an auto-filter over a span of columns
    ///
    /// The filter starts at row 1 and extends to the last row holding a cell
    /// within the span. The columns may be given in either order.
    pub fn set_auto_filter(&mut self, start_column: u32, end_column: u32) -> Result<()> {
        check_column(start_column)?;
        check_column(end_column)?;
        let (start, end) = if start_column <= end_column {
            (start_column, end_column)
        } else {
            (end_column, start_column)
        };

        let end_row = self.last_row_in_columns(start, end);
        self.auto_filter = Some(Range::new(
            Address::unchecked(start, 0),
            Address::unchecked(end, end_row),
        ));
        self.recalculate_auto_filter();
        Ok(())
    }

    /// Put an auto-filter over the columns of a range such as `"B1:D20"`
    ///
    /// Only the column span of the range is used.
    pub fn set_auto_filter_range(&mut self, range: &str) -> Result<()> {
        let range = Range::parse(range)?;
        self.set_auto_filter(range.min_column(), range.max_column())
    }

    /// Remove the auto-filter and any column entry it was keeping alive
    pub fn remove_auto_filter(&mut self) {
        self.auto_filter = None;
        for column in self.columns.values_mut() {
            column.has_auto_filter = false;
        }
        self.recalculate_columns();
    }

    /// Re-derive the filter's end row and flag the filter columns
    pub fn recalculate_auto_filter(&mut self) {
        let Some(filter) = self.auto_filter else {
            return;
        };
        let (start, end) = (filter.min_column(), filter.max_column());
        let end_row = self.last_row_in_columns(start, end);
        self.auto_filter = Some(Range::new(
            Address::unchecked(start, 0),
            Address::unchecked(end, end_row),
        ));

        for column in self.columns.values_mut() {
            column.has_auto_filter = false;
        }
        for index in start..=end {
            self.column_entry(index).has_auto_filter = true;
        }
    }

    fn last_row_in_columns(&self, start: u32, end: u32) -> u32 {
        self.cells
            .values()
            .filter(|c| (start..=end).contains(&c.column()))
            .map(|c| c.row())
            .max()
            .unwrap_or(0)
    }

    // === Rows ===

    /// Custom row heights, in points
    pub fn row_heights(&self) -> &BTreeMap<u32, f32> {
        &self.row_heights
    }

    /// Effective row height
    pub fn row_height(&self, row: u32) -> f32 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    /// Set row height, in points (0 to 409.5)
    pub fn set_row_height(&mut self, row: u32, height: f32) -> Result<()> {
        check_row(row)?;
        check_height(height)?;
        self.row_heights.insert(row, height);
        Ok(())
    }

    /// Drop a custom row height; returns whether one was stored
    pub fn remove_row_height(&mut self, row: u32) -> bool {
        self.row_heights.remove(&row).is_some()
    }

    /// Hidden rows
    pub fn hidden_rows(&self) -> &BTreeSet<u32> {
        &self.hidden_rows
    }

    /// Check if row is hidden
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.contains(&row)
    }

    pub fn add_hidden_row(&mut self, row: u32) -> Result<()> {
        self.set_row_hidden(row, true)
    }

    pub fn remove_hidden_row(&mut self, row: u32) -> Result<()> {
        self.set_row_hidden(row, false)
    }

    /// Set row hidden state; only hidden rows are stored
    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) -> Result<()> {
        check_row(row)?;
        if hidden {
            self.hidden_rows.insert(row);
        } else {
            self.hidden_rows.remove(&row);
        }
        Ok(())
    }

    // === Bounds ===

    fn cell_columns(&self, data_only: bool) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .values()
            .filter(move |c| !data_only || !c.value().is_empty())
            .map(|c| c.column())
    }

    fn cell_rows(&self, data_only: bool) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .values()
            .filter(move |c| !data_only || !c.value().is_empty())
            .map(|c| c.row())
    }

    /// First defined column: any cell or column entry
    pub fn first_column(&self) -> Option<u32> {
        self.cell_columns(false)
            .chain(self.columns.keys().copied())
            .min()
    }

    /// Last defined column: any cell or column entry
    pub fn last_column(&self) -> Option<u32> {
        self.cell_columns(false)
            .chain(self.columns.keys().copied())
            .max()
    }

    /// First column holding a value
    pub fn first_data_column(&self) -> Option<u32> {
        self.cell_columns(true).min()
    }

    /// Last column holding a value
    pub fn last_data_column(&self) -> Option<u32> {
        self.cell_columns(true).max()
    }

    /// First defined row: any cell, custom height or hidden row
    pub fn first_row(&self) -> Option<u32> {
        self.cell_rows(false)
            .chain(self.row_heights.keys().copied())
            .chain(self.hidden_rows.iter().copied())
            .min()
    }

    /// Last defined row: any cell, custom height or hidden row
    pub fn last_row(&self) -> Option<u32> {
        self.cell_rows(false)
            .chain(self.row_heights.keys().copied())
            .chain(self.hidden_rows.iter().copied())
            .max()
    }

    /// First row holding a value
    pub fn first_data_row(&self) -> Option<u32> {
        self.cell_rows(true).min()
    }

    /// Last row holding a value
    pub fn last_data_row(&self) -> Option<u32> {
        self.cell_rows(true).max()
    }

    /// Top-left corner of the defined area
    pub fn first_cell_address(&self) -> Option<Address> {
        Some(Address::unchecked(self.first_column()?, self.first_row()?))
    }

    /// Bottom-right corner of the defined area
    pub fn last_cell_address(&self) -> Option<Address> {
        Some(Address::unchecked(self.last_column()?, self.last_row()?))
    }

    /// Top-left corner of the area holding values
    pub fn first_data_cell_address(&self) -> Option<Address> {
        Some(Address::unchecked(
            self.first_data_column()?,
            self.first_data_row()?,
        ))
    }

    /// Bottom-right corner of the area holding values
    pub fn last_data_cell_address(&self) -> Option<Address> {
        Some(Address::unchecked(
            self.last_data_column()?,
            self.last_data_row()?,
        ))
    }
}
