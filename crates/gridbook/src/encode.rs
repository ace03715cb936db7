//! Encode-side style table
//!
//! An encoder writes one style record per canonical style and refers to it
//! from cells and columns by index. [`StyleTable`] holds that numbering for
//! a workbook that went through [`Workbook::prepare_for_encoding`].

use std::sync::Arc;

use ahash::AHashMap;
use gridbook_core::{Cell, Column, Result, Style, Workbook};
use log::debug;

/// Canonical styles of a prepared workbook, in index order
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: Vec<Arc<Style>>,
    // Keyed by instance address; canonical styles are compared by identity
    index: AHashMap<usize, u32>,
}

impl StyleTable {
    /// Finalize `workbook` and number its styles
    pub fn prepare(workbook: &mut Workbook) -> Result<Self> {
        let styles = workbook.prepare_for_encoding()?;
        debug!(
            "prepared {} sheets with {} styles for encoding",
            workbook.sheet_count(),
            styles.len()
        );
        Ok(Self::from_styles(styles))
    }

    pub fn from_styles(styles: Vec<Arc<Style>>) -> Self {
        let index = styles
            .iter()
            .enumerate()
            .map(|(i, style)| (key(style), i as u32))
            .collect();
        Self { styles, index }
    }

    /// Index of a canonical instance
    ///
    /// A structurally equal but distinct `Arc` is not found.
    pub fn index_of(&self, style: &Arc<Style>) -> Option<u32> {
        self.index.get(&key(style)).copied()
    }

    /// Style index to write for a cell; unstyled cells use the default (0)
    pub fn cell_style_index(&self, cell: &Cell) -> Option<u32> {
        match cell.style() {
            Some(style) => self.index_of(style),
            None => Some(0),
        }
    }

    /// Style index for a column's default style, if it has one
    pub fn column_style_index(&self, column: &Column) -> Option<u32> {
        column.default_style().and_then(|style| self.index_of(style))
    }

    pub fn get(&self, index: u32) -> Option<&Arc<Style>> {
        self.styles.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Arc<Style>)> {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, style)| (i as u32, style))
    }
}

fn key(style: &Arc<Style>) -> usize {
    Arc::as_ptr(style) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbook_core::BasicStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prepare_numbers_styles() {
        let mut wb = Workbook::new();
        let ws = wb.current_worksheet_mut().unwrap();
        ws.add_next_styled("title", &BasicStyle::Bold.style()).unwrap();
        ws.add_next(1).unwrap();

        let table = StyleTable::prepare(&mut wb).unwrap();
        assert_eq!(table.get(0).map(|s| s.as_ref()), Some(&Style::default()));

        let ws = wb.worksheet(0).unwrap();
        let a1 = ws.cell("A1").unwrap().unwrap();
        let b1 = ws.cell("B1").unwrap().unwrap();
        let bold = table.cell_style_index(a1).unwrap();
        assert!(bold > 0);
        assert!(table.get(bold).unwrap().font.bold);
        assert_eq!(table.cell_style_index(b1), Some(0));
    }

    #[test]
    fn test_identity_lookup() {
        let canonical = Arc::new(BasicStyle::Italic.style());
        let table = StyleTable::from_styles(vec![Arc::new(Style::default()), canonical.clone()]);
        assert_eq!(table.index_of(&canonical), Some(1));
        assert_eq!(table.index_of(&Arc::new(BasicStyle::Italic.style())), None);
        assert_eq!(table.iter().count(), 2);
    }
}
