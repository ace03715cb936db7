//! Sheet views and pane splits

use std::collections::BTreeMap;

use super::Worksheet;
use crate::cell::Address;
use crate::error::{Error, Result};
use crate::units::{
    internal_pane_split_height, internal_pane_split_width, DEFAULT_MAX_DIGIT_WIDTH,
    DEFAULT_TEXT_PADDING,
};
use crate::{MAX_COLUMN, MAX_ROW};

/// Default zoom factor, in percent
pub const DEFAULT_ZOOM: u16 = 100;
const MIN_ZOOM: u16 = 10;
const MAX_ZOOM: u16 = 400;

/// How the sheet is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewType {
    #[default]
    Normal,
    PageBreakPreview,
    PageLayout,
}

/// One of the four panes of a split sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaneValue {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Per-sheet view settings
#[derive(Debug, Clone, PartialEq)]
pub struct SheetView {
    pub view_type: ViewType,
    /// Zoom per view type; missing entries mean [`DEFAULT_ZOOM`]
    zoom: BTreeMap<ViewType, u16>,
    pub show_grid_lines: bool,
    pub show_row_column_headers: bool,
    pub show_ruler: bool,
}

impl Default for SheetView {
    fn default() -> Self {
        Self {
            view_type: ViewType::Normal,
            zoom: BTreeMap::new(),
            show_grid_lines: true,
            show_row_column_headers: true,
            show_ruler: true,
        }
    }
}

impl SheetView {
    /// Zoom factor of a view type, in percent
    pub fn zoom(&self, view_type: ViewType) -> u16 {
        self.zoom.get(&view_type).copied().unwrap_or(DEFAULT_ZOOM)
    }

    /// Zoom factor of the active view type
    pub fn current_zoom(&self) -> u16 {
        self.zoom(self.view_type)
    }

    /// Set a zoom factor: 0 (automatic) or 10 to 400 percent
    pub fn set_zoom(&mut self, view_type: ViewType, zoom: u16) -> Result<()> {
        if zoom != 0 && !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(Error::out_of_range(
                "Zoom factor",
                zoom as f64,
                MIN_ZOOM as f64,
                MAX_ZOOM as f64,
            ));
        }
        self.zoom.insert(view_type, zoom);
        Ok(())
    }

    /// Zoom factors that differ from the default
    pub fn zoom_factors(&self) -> impl Iterator<Item = (ViewType, u16)> + '_ {
        self.zoom
            .iter()
            .filter(|(_, z)| **z != DEFAULT_ZOOM)
            .map(|(&v, &z)| (v, z))
    }
}

/// How a pane split is measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneMode {
    /// Split positions in characters (width) and points (height); never frozen
    Characters {
        left_width: Option<f32>,
        top_height: Option<f32>,
    },
    /// Split after a number of columns and rows; may be frozen
    Counts {
        columns: Option<u32>,
        rows: Option<u32>,
        freeze: bool,
    },
}

/// A split of the sheet view into panes
#[derive(Debug, Clone, PartialEq)]
pub struct PaneSplit {
    pub mode: PaneMode,
    /// Top-left visible cell of the bottom-right pane
    pub top_left_cell: Address,
    pub active_pane: Option<PaneValue>,
}

impl PaneSplit {
    /// Check if the split is frozen
    pub fn is_frozen(&self) -> bool {
        matches!(self.mode, PaneMode::Counts { freeze: true, .. })
    }

    /// Stored horizontal split position
    ///
    /// Character splits are converted to internal units, count splits are
    /// stored as the column count.
    pub fn x_split(&self) -> Option<f32> {
        match self.mode {
            PaneMode::Characters { left_width, .. } => left_width.map(|w| {
                internal_pane_split_width(w, DEFAULT_MAX_DIGIT_WIDTH, DEFAULT_TEXT_PADDING)
            }),
            PaneMode::Counts { columns, .. } => columns.map(|c| c as f32),
        }
    }

    /// Stored vertical split position
    pub fn y_split(&self) -> Option<f32> {
        match self.mode {
            PaneMode::Characters { top_height, .. } => top_height.map(internal_pane_split_height),
            PaneMode::Counts { rows, .. } => rows.map(|r| r as f32),
        }
    }
}

impl Worksheet {
    /// View settings
    pub fn view(&self) -> &SheetView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut SheetView {
        &mut self.view
    }

    pub fn set_view_type(&mut self, view_type: ViewType) {
        self.view.view_type = view_type;
    }

    /// Set the zoom of a view type (0, or 10 to 400 percent)
    pub fn set_zoom(&mut self, view_type: ViewType, zoom: u16) -> Result<()> {
        self.view.set_zoom(view_type, zoom)
    }

    pub fn set_show_grid_lines(&mut self, show: bool) {
        self.view.show_grid_lines = show;
    }

    pub fn set_show_row_column_headers(&mut self, show: bool) {
        self.view.show_row_column_headers = show;
    }

    pub fn set_show_ruler(&mut self, show: bool) {
        self.view.show_ruler = show;
    }

    /// The current pane split, if any
    pub fn pane_split(&self) -> Option<&PaneSplit> {
        self.pane.as_ref()
    }

    /// Split the view at a width in characters and a height in points
    ///
    /// Such splits cannot be frozen.
    pub fn set_split_by_characters(
        &mut self,
        left_width: Option<f32>,
        top_height: Option<f32>,
        top_left_cell: Option<Address>,
        active_pane: Option<PaneValue>,
    ) -> Result<()> {
        for (what, value) in [("Split width", left_width), ("Split height", top_height)] {
            if let Some(value) = value {
                if value < 0.0 || !value.is_finite() {
                    return Err(Error::out_of_range(what, value as f64, 0.0, f64::MAX));
                }
            }
        }

        self.pane = Some(PaneSplit {
            mode: PaneMode::Characters {
                left_width,
                top_height,
            },
            top_left_cell: top_left_cell.unwrap_or(Address::unchecked(0, 0)).relative(),
            active_pane,
        });
        Ok(())
    }

    /// Split the view after a number of columns and rows
    ///
    /// Without an explicit top-left cell the bottom-right pane starts right
    /// at the split. A frozen split requires that cell to lie at or beyond
    /// the split on both axes.
    pub fn set_split_by_counts(
        &mut self,
        columns: Option<u32>,
        rows: Option<u32>,
        top_left_cell: Option<Address>,
        freeze: bool,
        active_pane: Option<PaneValue>,
    ) -> Result<()> {
        let split_columns = columns.unwrap_or(0);
        let split_rows = rows.unwrap_or(0);
        if split_columns > MAX_COLUMN {
            return Err(Error::ColumnOutOfBounds(split_columns as i64, MAX_COLUMN));
        }
        if split_rows > MAX_ROW {
            return Err(Error::RowOutOfBounds(split_rows as i64, MAX_ROW));
        }

        let top_left = match top_left_cell {
            Some(addr) => addr.relative(),
            None => Address::unchecked(split_columns, split_rows),
        };
        if freeze && (top_left.column() < split_columns || top_left.row() < split_rows) {
            return Err(Error::InvalidFreezeSplit(format!(
                "top-left cell {} lies inside the frozen area of {} columns and {} rows",
                top_left, split_columns, split_rows
            )));
        }

        self.pane = Some(PaneSplit {
            mode: PaneMode::Counts {
                columns,
                rows,
                freeze,
            },
            top_left_cell: top_left,
            active_pane,
        });
        Ok(())
    }

    /// Remove any pane split
    pub fn reset_split(&mut self) {
        self.pane = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zoom() {
        let mut ws = Worksheet::new("Test").unwrap();
        assert_eq!(ws.view().current_zoom(), 100);

        ws.set_zoom(ViewType::PageLayout, 250).unwrap();
        ws.set_zoom(ViewType::Normal, 0).unwrap();
        assert_eq!(ws.view().zoom(ViewType::PageLayout), 250);
        assert_eq!(ws.view().current_zoom(), 0);

        for bad in [9, 401] {
            let err = ws.set_zoom(ViewType::Normal, bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
        assert_eq!(ws.view().current_zoom(), 0);

        ws.set_view_type(ViewType::PageLayout);
        assert_eq!(ws.view().current_zoom(), 250);
    }

    #[test]
    fn test_view_flags() {
        let mut ws = Worksheet::new("Test").unwrap();
        assert!(ws.view().show_grid_lines);
        ws.set_show_grid_lines(false);
        ws.set_show_row_column_headers(false);
        ws.set_show_ruler(false);
        let view = ws.view();
        assert!(!view.show_grid_lines && !view.show_row_column_headers && !view.show_ruler);
    }

    #[test]
    fn test_split_by_characters() {
        let mut ws = Worksheet::new("Test").unwrap();
        ws.set_split_by_characters(Some(1.0), Some(15.0), None, Some(PaneValue::BottomRight))
            .unwrap();

        let split = ws.pane_split().unwrap();
        assert!(!split.is_frozen());
        assert_eq!(split.x_split(), Some(570.0));
        assert_eq!(split.y_split(), Some(600.0));

        let err = ws.set_split_by_characters(Some(-1.0), None, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_frozen_split() {
        let mut ws = Worksheet::new("Test").unwrap();
        ws.set_split_by_counts(Some(1), Some(2), None, true, None).unwrap();

        let split = ws.pane_split().unwrap();
        assert!(split.is_frozen());
        assert_eq!(split.top_left_cell.to_string(), "B3");
        assert_eq!((split.x_split(), split.y_split()), (Some(1.0), Some(2.0)));

        let err = ws
            .set_split_by_counts(Some(3), Some(3), Some(Address::parse("B5").unwrap()), true, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Worksheet);
        // The failed call left the previous split alone
        assert_eq!(ws.pane_split().unwrap().top_left_cell.to_string(), "B3");

        // Unfrozen splits may scroll anywhere
        ws.set_split_by_counts(Some(3), Some(3), Some(Address::parse("A1").unwrap()), false, None)
            .unwrap();
        ws.reset_split();
        assert!(ws.pane_split().is_none());
    }
}
