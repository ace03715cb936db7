//! Worksheet type
//!
//! A worksheet owns its cells by value, keyed by canonical address string,
//! together with the structural metadata that has to stay consistent with
//! them: columns, rows, merges, the auto-filter, panes, protection and the
//! sequential-write cursor.

mod layout;
mod merge;
mod protection;
mod view;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ahash::AHashMap;
use lazy_regex::regex_captures;

use crate::cell::{address_scope, Address, AddressScope, Cell, CellType, CellValue, Range};
use crate::column::{Column, DEFAULT_COLUMN_WIDTH};
use crate::error::{Error, Result};
use crate::style::{SharedStyles, Style};
use crate::{MAX_COLUMN, MAX_ROW, MAX_SHEET_NAME_LEN};

pub use protection::{SheetProtection, SheetProtectionValue};
pub use view::{PaneMode, PaneSplit, PaneValue, SheetView, ViewType};

/// Default row height, in points
pub const DEFAULT_ROW_HEIGHT: f32 = 15.0;

/// Characters a sheet name may not contain
const INVALID_NAME_CHARS: [char; 6] = ['[', ']', '*', '?', '/', '\\'];

/// Where the cursor moves after a sequential write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellDirection {
    /// Next cell is in the next column, same row
    #[default]
    ColumnToColumn,
    /// Next cell is in the next row, same column
    RowToRow,
    /// The cursor does not move
    Disabled,
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    /// Position-derived id assigned by the owning workbook (0 when detached)
    id: u32,
    name: String,
    hidden: bool,
    /// Handle to the workbook-scoped style repository
    styles: SharedStyles,
    cells: AHashMap<String, Cell>,
    columns: BTreeMap<u32, Column>,
    row_heights: BTreeMap<u32, f32>,
    hidden_rows: BTreeSet<u32>,
    default_column_width: f32,
    default_row_height: f32,
    /// Registration order is resolution order
    merged_ranges: Vec<Range>,
    auto_filter: Option<Range>,
    selected_cells: Vec<Range>,
    pane: Option<PaneSplit>,
    view: SheetView,
    protection: SheetProtection,
    current_column: u32,
    current_row: u32,
    direction: CellDirection,
    active_style: Option<Arc<Style>>,
}

impl Worksheet {
    /// Create a detached worksheet with its own style repository
    ///
    /// The repository is swapped for the workbook's when the sheet is added
    /// to a workbook.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gridbook_core::Worksheet;
    ///
    /// let mut ws = Worksheet::new("Data").unwrap();
    /// ws.add_next(42).unwrap();
    /// ws.add_next("x").unwrap();
    /// assert_eq!(ws.current_column(), 2);
    /// ```
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Self::with_styles(name, SharedStyles::new()))
    }

    pub(crate) fn with_styles(name: String, styles: SharedStyles) -> Self {
        Self {
            id: 0,
            name,
            hidden: false,
            styles,
            cells: AHashMap::new(),
            columns: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            hidden_rows: BTreeSet::new(),
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            merged_ranges: Vec::new(),
            auto_filter: None,
            selected_cells: Vec::new(),
            pane: None,
            view: SheetView::default(),
            protection: SheetProtection::default(),
            current_column: 0,
            current_row: 0,
            direction: CellDirection::ColumnToColumn,
            active_style: None,
        }
    }

    // === Identity ===

    /// Get the sheet id (1-based position in the owning workbook, 0 when detached)
    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    ///
    /// Only the format is checked here; uniqueness is the workbook's concern,
    /// see `Workbook::rename_worksheet`.
    pub fn set_name<S: Into<String>>(&mut self, name: S) -> Result<()> {
        let name = name.into();
        Self::validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Check a sheet name: 1 to 31 characters, none of `[ ] * ? / \`
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "name '{}' exceeds {} characters",
                name, MAX_SHEET_NAME_LEN
            )));
        }
        if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "name '{}' contains invalid character '{}'",
                name, c
            )));
        }
        Ok(())
    }

    /// Turn `name` into a valid name that does not collide with `existing`
    ///
    /// Invalid characters become `_`, overlong names are truncated and an
    /// empty name becomes `Sheet1`. On a (case-insensitive) collision a
    /// numeric suffix is incremented, starting from any trailing digits the
    /// name already has, until the name is unused.
    pub fn sanitize_name<S: AsRef<str>>(name: &str, existing: &[S]) -> String {
        let mut name: String = name
            .chars()
            .map(|c| if INVALID_NAME_CHARS.contains(&c) { '_' } else { c })
            .take(MAX_SHEET_NAME_LEN)
            .collect();
        if name.is_empty() {
            name = "Sheet1".to_string();
        }

        let taken = |candidate: &str| {
            existing
                .iter()
                .any(|e| e.as_ref().eq_ignore_ascii_case(candidate))
        };
        if !taken(&name) {
            return name;
        }

        let (prefix, mut number) = match regex_captures!(r"^(.*?)([0-9]+)$", &name) {
            Some((_, prefix, digits)) => match digits.parse::<u64>() {
                Ok(n) => (prefix.to_string(), n),
                Err(_) => (name.clone(), 0),
            },
            None => (name.clone(), 0),
        };

        loop {
            number += 1;
            let suffix = number.to_string();
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
            let candidate: String = prefix.chars().take(keep).chain(suffix.chars()).collect();
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Check if the sheet is hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Raw visibility flag; the workbook validates visibility invariants
    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Handle to the style repository this sheet resolves styles against
    pub fn styles(&self) -> &SharedStyles {
        &self.styles
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = Address::parse(address)?;
        Ok(self.cells.get(&addr.relative().to_string()))
    }

    /// Get a cell by column and row indices
    pub fn cell_at(&self, column: u32, row: u32) -> Option<&Cell> {
        let addr = Address::new(column, row).ok()?;
        self.cells.get(&addr.to_string())
    }

    /// Check if a cell exists at the given indices
    pub fn has_cell(&self, column: u32, row: u32) -> bool {
        self.cell_at(column, row).is_some()
    }

    /// Get the number of cells in the table
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the cell table is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw cell table, keyed by canonical address string
    pub fn cell_table(&self) -> &AHashMap<String, Cell> {
        &self.cells
    }

    /// All cells in address order (column-major)
    pub fn cells_sorted(&self) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = self.cells.values().collect();
        cells.sort_by_key(|c| c.address());
        cells
    }

    // === Cursor ===

    /// Zero-based column of the cursor
    pub fn current_column(&self) -> u32 {
        self.current_column
    }

    /// Zero-based row of the cursor
    pub fn current_row(&self) -> u32 {
        self.current_row
    }

    pub fn cell_direction(&self) -> CellDirection {
        self.direction
    }

    pub fn set_cell_direction(&mut self, direction: CellDirection) {
        self.direction = direction;
    }

    /// Move the cursor to an address such as `"C5"`
    pub fn set_current_cell_address(&mut self, address: &str) -> Result<()> {
        let addr = Address::parse(address)?;
        self.current_column = addr.column();
        self.current_row = addr.row();
        Ok(())
    }

    pub fn set_current_column_number(&mut self, column: u32) -> Result<()> {
        Address::new(column, 0)?;
        self.current_column = column;
        Ok(())
    }

    pub fn set_current_row_number(&mut self, row: u32) -> Result<()> {
        Address::new(0, row)?;
        self.current_row = row;
        Ok(())
    }

    /// Advance the cursor `count` columns; the row resets to 0 unless `keep_row`
    pub fn go_to_next_column(&mut self, count: u32, keep_row: bool) -> Result<()> {
        let column = self.current_column as i64 + count as i64;
        if column > MAX_COLUMN as i64 {
            return Err(Error::ColumnOutOfBounds(column, MAX_COLUMN));
        }
        self.current_column = column as u32;
        if !keep_row {
            self.current_row = 0;
        }
        Ok(())
    }

    /// Advance the cursor `count` rows; the column resets to 0 unless `keep_column`
    pub fn go_to_next_row(&mut self, count: u32, keep_column: bool) -> Result<()> {
        let row = self.current_row as i64 + count as i64;
        if row > MAX_ROW as i64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROW));
        }
        self.current_row = row as u32;
        if !keep_column {
            self.current_column = 0;
        }
        Ok(())
    }

    /// Style merged into every subsequent write until cleared
    pub fn set_active_style(&mut self, style: Style) -> Result<()> {
        self.active_style = Some(self.styles.intern(style)?);
        Ok(())
    }

    pub fn clear_active_style(&mut self) {
        self.active_style = None;
    }

    pub fn active_style(&self) -> Option<&Arc<Style>> {
        self.active_style.as_ref()
    }

    /// Cursor position after writing at `(column, row)`
    ///
    /// The position may lie one past the last column or row; the next
    /// sequential write then fails.
    fn position_after(&self, column: u32, row: u32) -> (u32, u32) {
        match self.direction {
            CellDirection::ColumnToColumn => (column + 1, row),
            CellDirection::RowToRow => (column, row + 1),
            CellDirection::Disabled => (self.current_column, self.current_row),
        }
    }

    // === Cell Modification ===

    /// Build a cell with its resolved canonical style
    ///
    /// The implicit date/time format is the base, the active style is merged
    /// over it and the caller's style over both.
    fn build_cell(
        &self,
        value: CellValue,
        cell_type: CellType,
        address: Address,
        style: Option<&Style>,
    ) -> Result<Cell> {
        let mut cell = Cell::new(value, cell_type, address);

        let mut layers: Vec<&Style> = Vec::with_capacity(3);
        let implicit = cell.implicit_style();
        if let Some(implicit) = implicit.as_ref() {
            layers.push(implicit);
        }
        if let Some(active) = self.active_style.as_deref() {
            layers.push(active);
        }
        if let Some(style) = style {
            layers.push(style);
        }

        let resolved = match layers.split_first() {
            None => None,
            Some((first, rest)) => {
                let merged = rest
                    .iter()
                    .fold((*first).clone(), |acc, overlay| acc.merged_with(overlay));
                Some(self.styles.intern(merged)?)
            }
        };
        cell.set_style(resolved);
        Ok(cell)
    }

    fn insert_cell(&mut self, cell: Cell) {
        self.cells.insert(cell.address().to_string(), cell);
    }

    fn write_next(
        &mut self,
        value: CellValue,
        cell_type: CellType,
        style: Option<&Style>,
    ) -> Result<()> {
        let (column, row) = (self.current_column, self.current_row);
        let cell = self.build_cell(value, cell_type, Address::new(column, row)?, style)?;
        self.insert_cell(cell);
        (self.current_column, self.current_row) = self.position_after(column, row);
        Ok(())
    }

    fn write_at(
        &mut self,
        value: CellValue,
        cell_type: CellType,
        address: Address,
        style: Option<&Style>,
    ) -> Result<()> {
        let cell = self.build_cell(value, cell_type, address, style)?;
        self.insert_cell(cell);
        (self.current_column, self.current_row) =
            self.position_after(address.column(), address.row());
        Ok(())
    }

    /// Write at the cursor and advance it in the cell direction
    ///
    /// Fails with a range error, without writing, when the cursor has
    /// already moved past the last column or row.
    pub fn add_next<V: Into<CellValue>>(&mut self, value: V) -> Result<()> {
        self.write_next(value.into(), CellType::Default, None)
    }

    /// [`Worksheet::add_next`] with a style merged over the cell's style
    pub fn add_next_styled<V: Into<CellValue>>(&mut self, value: V, style: &Style) -> Result<()> {
        self.write_next(value.into(), CellType::Default, Some(style))
    }

    /// Write a formula at the cursor and advance it
    pub fn add_next_formula(&mut self, formula: &str) -> Result<()> {
        self.write_next(CellValue::text(formula), CellType::Formula, None)
    }

    /// Write at the given indices
    ///
    /// Afterwards the cursor sits just past the written cell, as if the
    /// value had been written by [`Worksheet::add_next`].
    pub fn add_at<V: Into<CellValue>>(&mut self, value: V, column: u32, row: u32) -> Result<()> {
        self.write_at(value.into(), CellType::Default, Address::new(column, row)?, None)
    }

    /// [`Worksheet::add_at`] with a style
    pub fn add_at_styled<V: Into<CellValue>>(
        &mut self,
        value: V,
        column: u32,
        row: u32,
        style: &Style,
    ) -> Result<()> {
        self.write_at(
            value.into(),
            CellType::Default,
            Address::new(column, row)?,
            Some(style),
        )
    }

    /// Write at an address such as `"B7"`
    pub fn add_at_address<V: Into<CellValue>>(&mut self, value: V, address: &str) -> Result<()> {
        self.write_at(value.into(), CellType::Default, Address::parse(address)?, None)
    }

    /// Write a value with an explicit cell type
    pub fn add_typed_at<V: Into<CellValue>>(
        &mut self,
        value: V,
        cell_type: CellType,
        column: u32,
        row: u32,
    ) -> Result<()> {
        self.write_at(value.into(), cell_type, Address::new(column, row)?, None)
    }

    /// Write a formula at an address
    pub fn add_formula_at(&mut self, formula: &str, address: &str) -> Result<()> {
        self.write_at(
            CellValue::text(formula),
            CellType::Formula,
            Address::parse(address)?,
            None,
        )
    }

    /// Lay values over a range in enumeration order (column by column)
    ///
    /// The number of values must equal the number of cells in the range.
    /// The cursor does not move.
    pub fn add_cell_range<V: Into<CellValue>>(
        &mut self,
        values: Vec<V>,
        range: &Range,
        style: Option<&Style>,
    ) -> Result<()> {
        let addresses = range.enclosed_addresses();
        if addresses.len() != values.len() {
            return Err(Error::RangeSizeMismatch {
                expected: addresses.len(),
                actual: values.len(),
            });
        }

        let cells = addresses
            .into_iter()
            .zip(values)
            .map(|(addr, value)| self.build_cell(value.into(), CellType::Default, addr, style))
            .collect::<Result<Vec<_>>>()?;
        for cell in cells {
            self.insert_cell(cell);
        }
        Ok(())
    }

    /// Insert a fully built cell, attaching its style through the unmanaged path
    ///
    /// Used by loaders that resolved the canonical style themselves. An
    /// unstyled date or time cell gets its implicit format. The cursor does
    /// not move.
    pub fn insert_resolved_cell(&mut self, mut cell: Cell, style: Option<Arc<Style>>) -> Result<()> {
        let style = match (style, cell.implicit_style()) {
            (Some(style), _) => Some(self.styles.attach_unmanaged(style)?),
            (None, Some(implicit)) => Some(self.styles.intern(implicit)?),
            (None, None) => None,
        };
        cell.set_style(style);
        self.insert_cell(cell);
        Ok(())
    }

    /// Remove the cell at the given indices; returns whether it existed
    pub fn remove_cell(&mut self, column: u32, row: u32) -> Result<bool> {
        let addr = Address::new(column, row)?;
        Ok(self.cells.remove(&addr.to_string()).is_some())
    }

    /// Remove the cell at an address; returns whether it existed
    pub fn remove_cell_at_address(&mut self, address: &str) -> Result<bool> {
        let addr = Address::parse(address)?;
        Ok(self.cells.remove(&addr.relative().to_string()).is_some())
    }

    /// Resolve `"A1"` or `"A1:C3"` to the addresses it covers
    fn target_addresses(target: &str) -> Result<Vec<Address>> {
        match address_scope(target) {
            AddressScope::SingleAddress => Ok(vec![Address::parse(target)?.relative()]),
            AddressScope::Range => Ok(Range::parse(target)?.enclosed_addresses()),
            AddressScope::Invalid => Err(Error::InvalidRange(target.to_string())),
        }
    }

    /// Replace the style of every cell in `target` (an address or a range)
    ///
    /// Missing cells are created empty so the style has somewhere to live.
    pub fn set_style(&mut self, target: &str, style: &Style) -> Result<()> {
        let addresses = Self::target_addresses(target)?;
        let canonical = self.styles.intern(style.clone())?;
        for addr in addresses {
            let key = addr.to_string();
            let cell = self.cells.entry(key).or_insert_with(|| Cell::empty(addr));
            cell.set_style(Some(Arc::clone(&canonical)));
        }
        Ok(())
    }

    /// Merge `style` over the existing style of every cell in `target`
    pub fn append_style(&mut self, target: &str, style: &Style) -> Result<()> {
        let addresses = Self::target_addresses(target)?;
        let mut resolved = Vec::with_capacity(addresses.len());
        for addr in &addresses {
            let existing = self
                .cells
                .get(&addr.to_string())
                .and_then(|c| c.style().cloned());
            let canonical = match existing {
                Some(base) => self.styles.append(&base, style)?,
                None => self.styles.intern(style.clone())?,
            };
            resolved.push(canonical);
        }
        for (addr, canonical) in addresses.into_iter().zip(resolved) {
            let cell = self
                .cells
                .entry(addr.to_string())
                .or_insert_with(|| Cell::empty(addr));
            cell.set_style(Some(canonical));
        }
        Ok(())
    }

    // === Selection ===

    /// Selected ranges, in insertion order
    pub fn selected_cells(&self) -> &[Range] {
        &self.selected_cells
    }

    /// Add a selected range unless it is already selected
    pub fn add_selected_cells(&mut self, range: Range) {
        if !self.selected_cells.contains(&range) {
            self.selected_cells.push(range);
        }
    }

    /// Replace the selection with a single range
    pub fn set_selected_cells(&mut self, range: Range) {
        self.selected_cells.clear();
        self.selected_cells.push(range);
    }

    /// Remove a selected range; returns whether it was selected
    pub fn remove_selected_cells(&mut self, range: &Range) -> bool {
        let before = self.selected_cells.len();
        self.selected_cells.retain(|r| r != range);
        before != self.selected_cells.len()
    }

    pub fn clear_selected_cells(&mut self) {
        self.selected_cells.clear();
    }

    // === Copy ===

    /// Deep copy with a fresh, private style repository
    ///
    /// Cells, ranges and metadata are copied by value. Styles keep their
    /// canonical instances through the unmanaged attach path. The copy has
    /// no id and an empty name; callers name it before adding it to a
    /// workbook.
    pub fn deep_copy(&self) -> Result<Worksheet> {
        let styles = SharedStyles::new();
        let mut copy = self.clone_with_styles(String::new(), styles);
        copy.reattach_styles()?;
        Ok(copy)
    }

    fn clone_with_styles(&self, name: String, styles: SharedStyles) -> Worksheet {
        Worksheet {
            id: 0,
            name,
            hidden: self.hidden,
            styles,
            cells: self.cells.clone(),
            columns: self.columns.clone(),
            row_heights: self.row_heights.clone(),
            hidden_rows: self.hidden_rows.clone(),
            default_column_width: self.default_column_width,
            default_row_height: self.default_row_height,
            merged_ranges: self.merged_ranges.clone(),
            auto_filter: self.auto_filter,
            selected_cells: self.selected_cells.clone(),
            pane: self.pane.clone(),
            view: self.view.clone(),
            protection: self.protection.clone(),
            current_column: self.current_column,
            current_row: self.current_row,
            direction: self.direction,
            active_style: self.active_style.clone(),
        }
    }

    /// Switch to another repository, re-registering every style in use
    ///
    /// Instances already canonical there are kept; anything else is replaced
    /// by the repository's instance of the same value.
    pub(crate) fn adopt_styles(&mut self, styles: SharedStyles) -> Result<()> {
        if self.styles.same_repository(&styles) {
            return Ok(());
        }
        self.styles = styles;
        self.reattach_styles()
    }

    fn reattach_styles(&mut self) -> Result<()> {
        let styles = self.styles.clone();
        let reattach = |style: &Option<Arc<Style>>| -> Result<Option<Arc<Style>>> {
            match style {
                Some(style) => Ok(Some(styles.attach_unmanaged(Arc::clone(style))?)),
                None => Ok(None),
            }
        };

        // Resolve everything first so a failure leaves the sheet untouched
        let mut cell_styles = Vec::with_capacity(self.cells.len());
        for (key, cell) in &self.cells {
            cell_styles.push((key.clone(), reattach(&cell.style().cloned())?));
        }
        let mut column_styles = Vec::with_capacity(self.columns.len());
        for (index, column) in &self.columns {
            column_styles.push((*index, reattach(&column.default_style)?));
        }
        let active = reattach(&self.active_style)?;

        for (key, style) in cell_styles {
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.set_style(style);
            }
        }
        for (index, style) in column_styles {
            if let Some(column) = self.columns.get_mut(&index) {
                column.default_style = style;
            }
        }
        self.active_style = active;
        Ok(())
    }
}
