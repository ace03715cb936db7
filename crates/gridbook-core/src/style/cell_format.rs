//! Cell-level format flags: alignment and protection

/// Cell-level facet of a style
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellFormat {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    /// Degrees (-90..=90), or 255 for stacked text
    pub text_rotation: i16,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub indent: u8,
    /// Locked when the sheet is protected
    pub locked: bool,
    /// Formula hidden when the sheet is protected
    pub hidden: bool,
    /// Apply the alignment even where the consumer would otherwise ignore it
    pub force_apply_alignment: bool,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAlignment::General,
            vertical: VerticalAlignment::Bottom,
            text_rotation: 0,
            wrap_text: false,
            shrink_to_fit: false,
            indent: 0,
            locked: true,
            hidden: false,
            force_apply_alignment: false,
        }
    }
}

impl CellFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizontal(mut self, align: HorizontalAlignment) -> Self {
        self.horizontal = align;
        self
    }

    pub fn with_vertical(mut self, align: VerticalAlignment) -> Self {
        self.vertical = align;
        self
    }

    /// Set rotation angle, clamped to -90..=90
    pub fn with_rotation(mut self, degrees: i16) -> Self {
        self.text_rotation = degrees.clamp(-90, 90);
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap_text = wrap;
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.locked = false;
        self
    }
}

/// Horizontal alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Text left, numbers right
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

/// Vertical alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}
