//! Workbook loader
//!
//! Builds a [`Workbook`] from the records a container decoder produces.

use std::collections::BTreeMap;
use std::sync::Arc;

use gridbook_core::units::{date_from_oa, oa_date, oa_time, time_from_oa};
use gridbook_core::{
    address_scope, Address, AddressScope, Cell, CellType, CellValue, Metadata, PaneMode,
    PaneSplit, Range, SheetProtection, Style, Workbook, WorkbookProtection, Worksheet,
};
use log::{debug, warn};

use crate::coercion::CoercionEngine;
use crate::error::{ImportError, ImportResult};
use crate::options::ImportOptions;

/// Type attribute a decoder read for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RawTypeHint {
    Number,
    Text,
    Bool,
    Date,
    Time,
    Formula,
    Empty,
    /// No type attribute; inferred from the value
    #[default]
    Unspecified,
}

impl RawTypeHint {
    fn cell_type(self) -> CellType {
        match self {
            RawTypeHint::Number => CellType::Number,
            RawTypeHint::Text => CellType::String,
            RawTypeHint::Bool => CellType::Bool,
            RawTypeHint::Date => CellType::Date,
            RawTypeHint::Time => CellType::Time,
            RawTypeHint::Formula => CellType::Formula,
            RawTypeHint::Empty => CellType::Empty,
            RawTypeHint::Unspecified => CellType::Default,
        }
    }

    /// Check if the value fits the hint
    fn agrees_with(self, value: &CellValue) -> bool {
        match self {
            RawTypeHint::Unspecified | RawTypeHint::Formula | RawTypeHint::Empty => true,
            // Serial numbers
            RawTypeHint::Date | RawTypeHint::Time if value.is_numeric() => true,
            hint => hint.cell_type() == CellType::resolve(value),
        }
    }
}

/// One decoded cell record
#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    /// A1-style address
    pub address: String,
    pub value: CellValue,
    pub type_hint: RawTypeHint,
    /// Index into [`DecodedWorkbook::styles`]
    pub style_index: Option<u32>,
}

impl RawCell {
    pub fn new<S: Into<String>, V: Into<CellValue>>(address: S, value: V) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            type_hint: RawTypeHint::Unspecified,
            style_index: None,
        }
    }

    pub fn with_hint(mut self, hint: RawTypeHint) -> Self {
        self.type_hint = hint;
        self
    }

    pub fn with_style(mut self, index: u32) -> Self {
        self.style_index = Some(index);
        self
    }
}

/// Decoded content of one worksheet
#[derive(Debug, Clone, Default)]
pub struct DecodedSheet {
    pub name: String,
    pub hidden: bool,
    pub cells: Vec<RawCell>,
    /// Merged ranges such as `"A1:B2"`
    pub merges: Vec<String>,
    pub auto_filter: Option<String>,
    /// Selected addresses or ranges
    pub selected_cells: Vec<String>,
    pub default_column_width: Option<f32>,
    pub default_row_height: Option<f32>,
    pub column_widths: BTreeMap<u32, f32>,
    pub hidden_columns: Vec<u32>,
    pub row_heights: BTreeMap<u32, f32>,
    pub hidden_rows: Vec<u32>,
    pub pane: Option<PaneSplit>,
    pub protection: SheetProtection,
}

impl DecodedSheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Decoded content of a whole workbook
#[derive(Debug, Clone, Default)]
pub struct DecodedWorkbook {
    /// Style table; cells refer to it by index
    pub styles: Vec<Style>,
    pub sheets: Vec<DecodedSheet>,
    pub selected_sheet: usize,
    pub protection: WorkbookProtection,
    pub metadata: Metadata,
    pub mru_colors: Vec<String>,
    pub hidden: bool,
}

/// Builds workbooks from decoded content
#[derive(Debug, Clone, Default)]
pub struct WorkbookLoader {
    options: ImportOptions,
}

impl WorkbookLoader {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Build a workbook
    ///
    /// Structural validation is suspended while sheets are filled and runs
    /// once at the end.
    pub fn load(&self, decoded: DecodedWorkbook) -> ImportResult<Workbook> {
        let engine = CoercionEngine::new(&self.options)?;
        let mut workbook = Workbook::empty();
        workbook.set_import_in_progress(true);

        let styles = decoded
            .styles
            .into_iter()
            .map(|style| workbook.styles().intern(style))
            .collect::<Result<Vec<_>, _>>()?;

        for sheet in decoded.sheets {
            let sanitize = Worksheet::validate_name(&sheet.name).is_err()
                || workbook.sheet_index(&sheet.name).is_some();
            let index = workbook.add_worksheet(&sheet.name, sanitize)?;
            let hidden = sheet.hidden;
            let ws = workbook
                .worksheet_mut(index)
                .ok_or(gridbook_core::Error::SheetOutOfBounds(index, index))?;
            self.fill_sheet(ws, sheet, &styles, &engine)?;
            workbook.set_worksheet_hidden(index, hidden)?;
        }

        if !workbook.is_empty() {
            workbook.set_selected_worksheet(decoded.selected_sheet)?;
            workbook.set_current_worksheet(decoded.selected_sheet)?;
        }
        workbook.set_protection(decoded.protection);
        *workbook.metadata_mut() = decoded.metadata;
        for color in &decoded.mru_colors {
            workbook.add_mru_color(color)?;
        }
        workbook.set_hidden(decoded.hidden);

        workbook.finish_import()?;
        Ok(workbook)
    }

    fn fill_sheet(
        &self,
        ws: &mut Worksheet,
        sheet: DecodedSheet,
        styles: &[Arc<Style>],
        engine: &CoercionEngine<'_>,
    ) -> ImportResult<()> {
        let cell_count = sheet.cells.len();
        for raw in sheet.cells {
            let address = Address::parse(&raw.address)?;
            let style = match raw.style_index {
                Some(index) => Some(styles.get(index as usize).cloned().ok_or_else(|| {
                    ImportError::UnknownStyleIndex {
                        address: raw.address.clone(),
                        index,
                        count: styles.len(),
                    }
                })?),
                None => None,
            };

            if !raw.type_hint.agrees_with(&raw.value) {
                warn!(
                    "cell {}!{}: type hint {:?} does not match {} value",
                    ws.name(),
                    raw.address,
                    raw.type_hint,
                    raw.value.type_name()
                );
            }

            let (value, cell_type) = self.natural_type(raw.value, raw.type_hint, style.as_deref());
            let (value, cell_type) =
                engine.coerce(value, cell_type, address.column(), address.row());
            ws.insert_resolved_cell(Cell::new(value, cell_type, address), style)?;
        }

        for merge in &sheet.merges {
            ws.merge_range(merge)?;
        }
        if let Some(filter) = &sheet.auto_filter {
            ws.set_auto_filter_range(filter)?;
        }
        for selection in &sheet.selected_cells {
            let range = match address_scope(selection) {
                AddressScope::SingleAddress => Range::single(Address::parse(selection)?),
                _ => Range::parse(selection)?,
            };
            ws.add_selected_cells(range);
        }

        if let Some(width) = sheet.default_column_width {
            ws.set_default_column_width(width)?;
        }
        if let Some(height) = sheet.default_row_height {
            ws.set_default_row_height(height)?;
        }
        for (&column, &width) in &sheet.column_widths {
            ws.set_column_width(column, width)?;
        }
        for &column in &sheet.hidden_columns {
            ws.add_hidden_column(column)?;
        }
        for (&row, &height) in &sheet.row_heights {
            ws.set_row_height(row, height)?;
        }
        for &row in &sheet.hidden_rows {
            ws.add_hidden_row(row)?;
        }

        if let Some(pane) = sheet.pane {
            match pane.mode {
                PaneMode::Characters {
                    left_width,
                    top_height,
                } => ws.set_split_by_characters(
                    left_width,
                    top_height,
                    Some(pane.top_left_cell),
                    pane.active_pane,
                )?,
                PaneMode::Counts {
                    columns,
                    rows,
                    freeze,
                } => ws.set_split_by_counts(
                    columns,
                    rows,
                    Some(pane.top_left_cell),
                    freeze,
                    pane.active_pane,
                )?,
            }
        }
        ws.set_protection(sheet.protection);

        debug!("loaded sheet '{}' with {} cells", ws.name(), cell_count);
        Ok(())
    }

    /// Type of a decoded value before any policy applies
    ///
    /// A serial number becomes a date or time when its hint says so or,
    /// without a more specific hint, when its style has a date or time
    /// format. With date/time enforcement on, dates and times become serial
    /// numbers instead. A hint that does not fit the value is dropped.
    fn natural_type(
        &self,
        value: CellValue,
        hint: RawTypeHint,
        style: Option<&Style>,
    ) -> (CellValue, CellType) {
        let hinted = hint.cell_type();
        if matches!(hinted, CellType::Formula | CellType::Empty) {
            return (value, hinted);
        }

        if self.options.enforce_date_time_as_number {
            let serial = match &value {
                CellValue::Date(date) => oa_date(*date).ok(),
                CellValue::Time(duration) => oa_time(*duration).ok(),
                _ => None,
            };
            return match serial {
                Some(serial) => (CellValue::Float(serial), CellType::Number),
                None => {
                    let resolved = CellType::resolve(&value);
                    (value, resolved)
                }
            };
        }

        let serial = if value.is_numeric() { value.as_f64() } else { None };
        if let Some(serial) = serial {
            let format = style.map(|s| &s.number_format);
            let target = match hinted {
                CellType::Date | CellType::Time => hinted,
                CellType::Number | CellType::Default => match format {
                    Some(f) if f.is_date_format() => CellType::Date,
                    Some(f) if f.is_time_format() => CellType::Time,
                    _ => CellType::Number,
                },
                _ => CellType::Number,
            };
            match target {
                CellType::Date => {
                    if let Ok(date) = date_from_oa(serial) {
                        return (CellValue::Date(date), CellType::Date);
                    }
                }
                CellType::Time => {
                    if let Ok(duration) = time_from_oa(serial) {
                        return (CellValue::Time(duration), CellType::Time);
                    }
                }
                _ => {}
            }
            return (value, CellType::Number);
        }

        let resolved = CellType::resolve(&value);
        (value, resolved)
    }
}
