//! Merged ranges

use std::sync::Arc;

use log::debug;

use super::Worksheet;
use crate::cell::{Cell, Range};
use crate::error::{Error, Result};
use crate::style::BasicStyle;

impl Worksheet {
    /// Registered merges, in registration order
    pub fn merged_ranges(&self) -> &[Range] {
        &self.merged_ranges
    }

    /// Register a merged range; returns its canonical `"A1:B2"` form
    ///
    /// Fails when the range shares a cell with a merge that is already
    /// registered. Cells are only touched by [`Worksheet::resolve_merges`].
    pub fn merge(&mut self, range: Range) -> Result<String> {
        let range = Range::new(range.start().relative(), range.end().relative());
        if let Some(existing) = self.merged_ranges.iter().find(|m| m.overlaps(&range)) {
            return Err(Error::MergeOverlap(range.to_string(), existing.to_string()));
        }
        self.merged_ranges.push(range);
        Ok(range.to_string())
    }

    /// [`Worksheet::merge`] for a range such as `"A1:C1"`
    pub fn merge_range(&mut self, range: &str) -> Result<String> {
        self.merge(Range::parse(range)?)
    }

    /// Unregister a merge
    pub fn remove_merge(&mut self, range: &Range) -> Result<()> {
        let range = Range::new(range.start().relative(), range.end().relative());
        match self.merged_ranges.iter().position(|m| *m == range) {
            Some(idx) => {
                self.merged_ranges.remove(idx);
                Ok(())
            }
            None => Err(Error::MergeNotFound(range.to_string())),
        }
    }

    /// Apply every registered merge to the cell table
    ///
    /// The first cell of each merge keeps its value; all other enclosed
    /// cells become empty and carry the merge-cell style merged over their
    /// own. Missing cells are created. Merges are applied in registration
    /// order.
    pub fn resolve_merges(&mut self) -> Result<()> {
        if self.merged_ranges.is_empty() {
            return Ok(());
        }
        let merge_style = BasicStyle::MergeCell.style();
        let canonical = self.styles.intern(merge_style.clone())?;

        let ranges = self.merged_ranges.clone();
        for range in &ranges {
            let mut addresses = range.enclosed_addresses().into_iter();
            if let Some(first) = addresses.next() {
                self.cells
                    .entry(first.to_string())
                    .or_insert_with(|| Cell::empty(first));
            }

            for addr in addresses {
                let key = addr.to_string();
                let style = match self.cells.get(&key).and_then(|c| c.style()) {
                    Some(existing) => self.styles.append(existing, &merge_style)?,
                    None => Arc::clone(&canonical),
                };
                let cell = self.cells.entry(key).or_insert_with(|| Cell::empty(addr));
                cell.clear_value();
                cell.set_style(Some(style));
            }
        }

        debug!(
            "sheet '{}': resolved {} merged ranges",
            self.name,
            ranges.len()
        );
        Ok(())
    }
}
