//! Ready-made styles for common formatting

use super::{Border, BorderLineStyle, Color, Fill, NumberFormat, PatternType, Style, Underline};

/// Frequently used single-purpose styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicStyle {
    Bold,
    Italic,
    BoldItalic,
    Underline,
    DoubleUnderline,
    Strike,
    /// Built-in short date format (id 14)
    DateFormat,
    /// Built-in time format (id 21)
    TimeFormat,
    /// Integer display (id 1)
    RoundedNumber,
    /// Thin frame on all four sides
    BorderFrame,
    /// Thin frame with a bold font, for header rows
    BorderFrameHeader,
    /// 12.5% gray pattern fill
    DottedFill,
    /// Applied to every non-leading cell of a resolved merge
    MergeCell,
}

impl BasicStyle {
    /// Build the style value
    pub fn style(self) -> Style {
        let mut style = Style::default();
        match self {
            BasicStyle::Bold => style.font.bold = true,
            BasicStyle::Italic => style.font.italic = true,
            BasicStyle::BoldItalic => {
                style.font.bold = true;
                style.font.italic = true;
            }
            BasicStyle::Underline => style.font.underline = Underline::Single,
            BasicStyle::DoubleUnderline => style.font.underline = Underline::Double,
            BasicStyle::Strike => style.font.strike = true,
            BasicStyle::DateFormat => {
                style.number_format = NumberFormat::BuiltIn(NumberFormat::ID_DATE_SHORT)
            }
            BasicStyle::TimeFormat => {
                style.number_format = NumberFormat::BuiltIn(NumberFormat::ID_TIME_24H_SEC)
            }
            BasicStyle::RoundedNumber => style.number_format = NumberFormat::BuiltIn(1),
            BasicStyle::BorderFrame => {
                style.border = Border::frame(BorderLineStyle::Thin, Color::BLACK)
            }
            BasicStyle::BorderFrameHeader => {
                style.border = Border::frame(BorderLineStyle::Thin, Color::BLACK);
                style.font.bold = true;
            }
            BasicStyle::DottedFill => {
                style.fill = Fill::pattern(PatternType::Gray125, Color::Auto, Color::Auto)
            }
            BasicStyle::MergeCell => style.cell_format.force_apply_alignment = true,
        }
        style
    }
}

impl From<BasicStyle> for Style {
    fn from(basic: BasicStyle) -> Self {
        basic.style()
    }
}
