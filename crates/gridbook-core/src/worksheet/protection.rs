//! Sheet protection

use std::collections::BTreeSet;

use super::Worksheet;
use crate::units::password_hash;

/// An action users may still perform on a protected sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetProtectionValue {
    Objects,
    Scenarios,
    FormatCells,
    FormatColumns,
    FormatRows,
    InsertColumns,
    InsertRows,
    InsertHyperlinks,
    DeleteColumns,
    DeleteRows,
    SelectLockedCells,
    Sort,
    AutoFilter,
    PivotTables,
    SelectUnlockedCells,
}

/// Protection state of a worksheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetProtection {
    pub enabled: bool,
    /// Legacy hash of the password; `None` when unprotected by password
    pub password_hash: Option<String>,
    /// Actions still allowed while protected
    pub allowed: BTreeSet<SheetProtectionValue>,
}

impl SheetProtection {
    /// Check if an action is allowed
    pub fn allows(&self, action: SheetProtectionValue) -> bool {
        self.allowed.contains(&action)
    }
}

impl Worksheet {
    pub fn protection(&self) -> &SheetProtection {
        &self.protection
    }

    /// Replace the protection state, e.g. with one read from a file
    pub fn set_protection(&mut self, protection: SheetProtection) {
        self.protection = protection;
    }

    /// Switch protection on or off without touching the allowed actions
    pub fn set_use_sheet_protection(&mut self, enabled: bool) {
        self.protection.enabled = enabled;
    }

    /// Store the legacy hash of a password; an empty password removes it
    pub fn set_sheet_protection_password(&mut self, password: &str) {
        let hash = password_hash(password);
        self.protection.password_hash = if hash.is_empty() { None } else { Some(hash) };
    }

    /// Allow an action on the protected sheet and enable protection
    ///
    /// Allowing locked cells to be selected also allows unlocked ones.
    pub fn add_allowed_action(&mut self, action: SheetProtectionValue) {
        self.protection.allowed.insert(action);
        if action == SheetProtectionValue::SelectLockedCells {
            self.protection
                .allowed
                .insert(SheetProtectionValue::SelectUnlockedCells);
        }
        self.protection.enabled = true;
    }

    /// Disallow an action; returns whether it was allowed
    pub fn remove_allowed_action(&mut self, action: SheetProtectionValue) -> bool {
        self.protection.allowed.remove(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_password() {
        let mut ws = Worksheet::new("Test").unwrap();
        ws.set_sheet_protection_password("test");
        assert_eq!(ws.protection().password_hash.as_deref(), Some("CBEB"));
        ws.set_sheet_protection_password("");
        assert_eq!(ws.protection().password_hash, None);
    }

    #[test]
    fn test_allowed_actions() {
        let mut ws = Worksheet::new("Test").unwrap();
        assert!(!ws.protection().enabled);

        ws.add_allowed_action(SheetProtectionValue::SelectLockedCells);
        let protection = ws.protection();
        assert!(protection.enabled);
        assert!(protection.allows(SheetProtectionValue::SelectUnlockedCells));
        assert_eq!(protection.allowed.len(), 2);

        assert!(ws.remove_allowed_action(SheetProtectionValue::SelectLockedCells));
        assert!(!ws.remove_allowed_action(SheetProtectionValue::Sort));
        assert!(ws.protection().allows(SheetProtectionValue::SelectUnlockedCells));

        ws.set_use_sheet_protection(false);
        assert!(!ws.protection().enabled);
        assert_eq!(ws.protection().allowed.len(), 1);
    }
}
