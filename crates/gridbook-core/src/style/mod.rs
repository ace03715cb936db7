//! Cell styling types
//!
//! A [`Style`] bundles five facets:
//! - [`Border`] - Cell borders
//! - [`Fill`] - Background fill
//! - [`Font`] - Font settings
//! - [`NumberFormat`] - Display format of numbers and dates
//! - [`CellFormat`] - Alignment and protection flags
//!
//! Styles are compared structurally and de-duplicated through a
//! [`StyleRepository`], which hands out one canonical `Arc<Style>` per
//! distinct value.

mod basic;
mod border;
mod cell_format;
mod color;
mod fill;
mod font;
mod number_format;
mod repository;

pub use basic::BasicStyle;
pub use border::{Border, BorderEdge, BorderLineStyle};
pub use cell_format::{CellFormat, HorizontalAlignment, VerticalAlignment};
pub use color::Color;
pub use fill::{Fill, PatternType};
pub use font::{Font, FontScheme, FontVerticalAlign, Underline};
pub use number_format::NumberFormat;
pub use repository::{SharedStyles, StyleRepository};

/// Complete cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub border: Border,
    pub fill: Fill,
    pub font: Font,
    pub number_format: NumberFormat,
    pub cell_format: CellFormat,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font size in points; non-finite sizes are ignored
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.set_size(size);
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = Fill::solid(color);
        self
    }

    /// Set the border facet
    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Set number format
    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.cell_format.horizontal = align;
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.cell_format.vertical = align;
        self
    }

    /// Set the locked flag
    pub fn locked(mut self, locked: bool) -> Self {
        self.cell_format.locked = locked;
        self
    }

    /// Combine facet by facet; a facet of `overlay` wins when it is not the default
    ///
    /// # Examples
    /// ```
    /// use gridbook_core::style::{Color, Style};
    ///
    /// let base = Style::new().bold(true);
    /// let overlay = Style::new().fill_color(Color::RED);
    /// let merged = base.merged_with(&overlay);
    /// assert!(merged.font.bold);
    /// assert_eq!(merged.fill, overlay.fill);
    /// ```
    pub fn merged_with(&self, overlay: &Style) -> Style {
        fn pick<T: Default + PartialEq + Clone>(base: &T, overlay: &T) -> T {
            if *overlay != T::default() {
                overlay.clone()
            } else {
                base.clone()
            }
        }

        Style {
            border: pick(&self.border, &overlay.border),
            fill: pick(&self.fill, &overlay.fill),
            font: pick(&self.font, &overlay.font),
            number_format: pick(&self.number_format, &overlay.number_format),
            cell_format: pick(&self.cell_format, &overlay.cell_format),
        }
    }

    /// Check if every facet is at its default
    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_non_conflicting_facets() {
        let base = Style::new()
            .bold(true)
            .number_format(NumberFormat::BuiltIn(NumberFormat::ID_DATE_SHORT));
        let overlay = Style::new().fill_color(Color::GRAY);

        let merged = base.merged_with(&overlay);
        assert!(merged.font.bold);
        assert_eq!(merged.fill, Fill::solid(Color::GRAY));
        assert_eq!(
            merged.number_format,
            NumberFormat::BuiltIn(NumberFormat::ID_DATE_SHORT)
        );
    }

    #[test]
    fn test_merge_overlay_wins_on_conflict() {
        let base = Style::new().bold(true);
        let overlay = Style::new().italic(true);
        // Font is one facet: the overlay's font replaces the base font
        let merged = base.merged_with(&overlay);
        assert!(!merged.font.bold);
        assert!(merged.font.italic);
    }

    #[test]
    fn test_default_overlay_is_identity() {
        let base = Style::new().bold(true).fill_color(Color::RED);
        assert_eq!(base.merged_with(&Style::default()), base);
    }
}
