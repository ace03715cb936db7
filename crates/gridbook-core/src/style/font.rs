//! Font facet

use log::debug;

use super::Color;

/// Font facet of a style
///
/// The size is kept as an `f64` and hashed by its bit pattern so the facet
/// can take part in style interning. `-0.0` hashes as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font family name (e.g., "Calibri")
    pub name: String,
    /// Font size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strike: bool,
    pub vertical_align: FontVerticalAlign,
    pub color: Color,
    /// Font family class (2 = swiss)
    pub family: u8,
    pub charset: Option<u8>,
    pub scheme: FontScheme,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strike: false,
            vertical_align: FontVerticalAlign::Baseline,
            color: Color::Theme { index: 1, tint: 0 },
            family: 2,
            charset: None,
            scheme: FontScheme::Minor,
        }
    }
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set the size in points; non-finite sizes are ignored
    pub fn with_size(mut self, size: f64) -> Self {
        self.set_size(size);
        self
    }

    /// Set the size in points, keeping the current size when `size` is NaN
    /// or infinite
    pub fn set_size(&mut self, size: f64) {
        if size.is_finite() {
            // Adding 0.0 turns -0.0 into 0.0
            self.size = size + 0.0;
        } else {
            debug!("ignoring non-finite font size {}", size);
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl std::hash::Hash for Font {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        (self.size + 0.0).to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strike.hash(state);
        self.vertical_align.hash(state);
        self.color.hash(state);
        self.family.hash(state);
        self.charset.hash(state);
        self.scheme.hash(state);
    }
}

impl Eq for Font {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

/// Superscript/subscript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontVerticalAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

/// Theme font scheme the font belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontScheme {
    None,
    Major,
    #[default]
    Minor,
}
