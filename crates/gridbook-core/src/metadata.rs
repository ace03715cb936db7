//! Document properties

use crate::error::{Error, Result};

/// Longest major part of an application version
const MAX_MAJOR_DIGITS: usize = 2;
/// Longest minor part of an application version
const MAX_MINOR_DIGITS: usize = 5;

/// Document properties stored with a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    pub application: Option<String>,
    application_version: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub content_status: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub hyperlink_base: Option<String>,
    pub keywords: Option<String>,
    pub manager: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Application version in `MM.mmmmm` form
    pub fn application_version(&self) -> Option<&str> {
        self.application_version.as_deref()
    }

    /// Set the application version
    ///
    /// Accepts a major part of up to 2 digits, optionally followed by `.`
    /// and a minor part of up to 5 digits. An empty string clears the
    /// version.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gridbook_core::Metadata;
    ///
    /// let mut meta = Metadata::new();
    /// meta.set_application_version("16.0300").unwrap();
    /// assert!(meta.set_application_version("123.1").is_err());
    /// ```
    pub fn set_application_version(&mut self, version: &str) -> Result<()> {
        if version.is_empty() {
            self.application_version = None;
            return Ok(());
        }

        let (major, minor) = match version.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (version, None),
        };
        Self::check_component(version, major, MAX_MAJOR_DIGITS)?;
        if let Some(minor) = minor {
            Self::check_component(version, minor, MAX_MINOR_DIGITS)?;
        }

        self.application_version = Some(version.to_string());
        Ok(())
    }

    fn check_component(version: &str, component: &str, max_digits: usize) -> Result<()> {
        if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidVersion(version.to_string()));
        }
        if component.len() > max_digits {
            return Err(Error::VersionComponentTooLong(
                component.to_string(),
                max_digits,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_application_version() {
        let mut meta = Metadata::new();
        for ok in ["1", "16.0", "99.99999"] {
            meta.set_application_version(ok).unwrap();
            assert_eq!(meta.application_version(), Some(ok));
        }

        meta.set_application_version("").unwrap();
        assert_eq!(meta.application_version(), None);
    }

    #[test]
    fn test_application_version_errors() {
        let mut meta = Metadata::new();
        meta.set_application_version("12.5").unwrap();

        for too_long in ["123.1", "1.123456"] {
            let err = meta.set_application_version(too_long).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{too_long}");
        }
        for malformed in ["a.1", "1.b", "1.2.3", ".5", "1."] {
            let err = meta.set_application_version(malformed).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{malformed}");
        }
        assert_eq!(meta.application_version(), Some("12.5"));
    }
}
