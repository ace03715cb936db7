//! Number format facet

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (id 0)
    #[default]
    General,

    /// Built-in format by ID (1..=163)
    BuiltIn(u32),

    /// Custom format pattern; the encoder assigns ids from 164 upward
    Custom(String),
}

impl NumberFormat {
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 21 - h:mm:ss
    pub const ID_TIME_24H_SEC: u32 = 21;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;
    /// First id available to custom patterns
    pub const FIRST_CUSTOM_ID: u32 = 164;

    /// Create a number format from a format pattern
    pub fn custom<S: Into<String>>(pattern: S) -> Self {
        NumberFormat::Custom(pattern.into())
    }

    /// Built-in format id, `None` for custom patterns
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// Check if values with this format are dates
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=17 | 22),
            NumberFormat::Custom(pattern) => {
                let tokens = pattern_tokens(pattern);
                tokens.contains(&'y') || tokens.contains(&'d')
            }
            NumberFormat::General => false,
        }
    }

    /// Check if values with this format are times of day / durations
    pub fn is_time_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 18..=21 | 45..=47),
            NumberFormat::Custom(pattern) => {
                let tokens = pattern_tokens(pattern);
                !(tokens.contains(&'y') || tokens.contains(&'d'))
                    && (tokens.contains(&'h') || tokens.contains(&'s'))
            }
            NumberFormat::General => false,
        }
    }
}

/// Lowercased pattern characters outside quoted literals and `[...]` sections
fn pattern_tokens(pattern: &str) -> Vec<char> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut quoted = false;
    let mut bracketed = false;
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !quoted => escaped = true,
            '"' => quoted = !quoted,
            '[' if !quoted => bracketed = true,
            ']' if !quoted => bracketed = false,
            _ if quoted || bracketed => {}
            _ => tokens.push(c.to_ascii_lowercase()),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classification() {
        assert!(NumberFormat::BuiltIn(14).is_date_format());
        assert!(!NumberFormat::BuiltIn(14).is_time_format());
        assert!(NumberFormat::BuiltIn(21).is_time_format());
        assert!(!NumberFormat::BuiltIn(2).is_date_format());
        assert!(!NumberFormat::General.is_time_format());
    }

    #[test]
    fn test_custom_classification() {
        assert!(NumberFormat::custom("yyyy-mm-dd").is_date_format());
        assert!(NumberFormat::custom("[h]:mm:ss").is_time_format());
        assert!(!NumberFormat::custom("\"day\" 0.00").is_date_format());
        assert!(!NumberFormat::custom("#,##0.00").is_time_format());
    }
}
