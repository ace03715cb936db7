//! Border facet

use super::Color;

/// Border facet of a style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Border {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
    pub diagonal: BorderEdge,
    /// Diagonal from bottom-left to top-right
    pub diagonal_up: bool,
    /// Diagonal from top-left to bottom-right
    pub diagonal_down: bool,
}

impl Border {
    /// Create a border facet with no edges
    pub fn new() -> Self {
        Self::default()
    }

    /// The same edge on all four sides
    pub fn frame(style: BorderLineStyle, color: Color) -> Self {
        let edge = BorderEdge::new(style, color);
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
            ..Self::default()
        }
    }

    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = BorderEdge::new(style, color);
        self
    }

    /// Check if no edge is drawn
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}
