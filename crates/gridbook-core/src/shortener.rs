//! Sequential-write helper bound to a workbook's current worksheet

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::style::Style;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;

/// Terse cursor-driven writing into the current worksheet
///
/// Every call goes to whichever sheet is current at that moment, so
/// switching the current sheet retargets the shortener.
///
/// # Example
///
/// ```rust
/// use gridbook_core::Workbook;
///
/// let mut wb = Workbook::new();
/// let mut sh = wb.shortener();
/// sh.value("Name").unwrap();
/// sh.value("Score").unwrap();
/// sh.down().unwrap();
/// sh.value("Ada").unwrap();
/// sh.value(97).unwrap();
///
/// let ws = wb.current_worksheet().unwrap();
/// assert_eq!(ws.cell("B2").unwrap().unwrap().value().as_f64(), Some(97.0));
/// ```
#[derive(Debug)]
pub struct Shortener<'a> {
    workbook: &'a mut Workbook,
}

impl<'a> Shortener<'a> {
    pub fn new(workbook: &'a mut Workbook) -> Self {
        Self { workbook }
    }

    fn sheet(&mut self) -> Result<&mut Worksheet> {
        self.workbook
            .current_worksheet_mut()
            .ok_or(Error::NoCurrentWorksheet)
    }

    /// Make another sheet current
    pub fn set_worksheet(&mut self, name: &str) -> Result<()> {
        self.workbook.set_current_worksheet_by_name(name)?;
        Ok(())
    }

    /// Write a value at the cursor and advance it
    pub fn value<V: Into<CellValue>>(&mut self, value: V) -> Result<()> {
        self.sheet()?.add_next(value)
    }

    /// Write a styled value at the cursor and advance it
    pub fn value_styled<V: Into<CellValue>>(&mut self, value: V, style: &Style) -> Result<()> {
        self.sheet()?.add_next_styled(value, style)
    }

    /// Write a formula at the cursor and advance it
    pub fn formula(&mut self, formula: &str) -> Result<()> {
        self.sheet()?.add_next_formula(formula)
    }

    /// Move to the first column of the next row
    pub fn down(&mut self) -> Result<()> {
        self.down_by(1, false)
    }

    pub fn down_by(&mut self, rows: u32, keep_column: bool) -> Result<()> {
        self.sheet()?.go_to_next_row(rows, keep_column)
    }

    /// Move to the first row of the next column
    pub fn right(&mut self) -> Result<()> {
        self.right_by(1, false)
    }

    pub fn right_by(&mut self, columns: u32, keep_row: bool) -> Result<()> {
        self.sheet()?.go_to_next_column(columns, keep_row)
    }

    /// Move up `rows` rows; the column resets to 0 unless `keep_column`
    pub fn up(&mut self, rows: u32, keep_column: bool) -> Result<()> {
        let sheet = self.sheet()?;
        let row = sheet.current_row() as i64 - rows as i64;
        if row < 0 {
            return Err(Error::RowOutOfBounds(row, crate::MAX_ROW));
        }
        sheet.set_current_row_number(row as u32)?;
        if !keep_column {
            sheet.set_current_column_number(0)?;
        }
        Ok(())
    }

    /// Move left `columns` columns; the row resets to 0 unless `keep_row`
    pub fn left(&mut self, columns: u32, keep_row: bool) -> Result<()> {
        let sheet = self.sheet()?;
        let column = sheet.current_column() as i64 - columns as i64;
        if column < 0 {
            return Err(Error::ColumnOutOfBounds(column, crate::MAX_COLUMN));
        }
        sheet.set_current_column_number(column as u32)?;
        if !keep_row {
            sheet.set_current_row_number(0)?;
        }
        Ok(())
    }
}
