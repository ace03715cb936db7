//! Workbook type - the main document structure

use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::shortener::Shortener;
use crate::style::{Color, SharedStyles, Style};
use crate::units::password_hash;
use crate::worksheet::Worksheet;

/// Workbook-level protection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookProtection {
    /// Window positions and sizes are locked
    pub lock_windows: bool,
    /// Sheets cannot be added, removed, moved or renamed
    pub lock_structure: bool,
    /// Legacy hash of the password
    pub password_hash: Option<String>,
}

impl WorkbookProtection {
    /// Check if any protection is active
    pub fn is_enabled(&self) -> bool {
        self.lock_windows || self.lock_structure
    }
}

/// A workbook (spreadsheet document)
///
/// A workbook owns its worksheets and the style repository they share.
/// Sheet ids are 1-based positions and are renumbered when a sheet is
/// removed.
#[derive(Debug)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    /// Sheet that sequential writes go to
    current: Option<usize>,
    /// Sheet shown when the document is opened
    selected: usize,
    styles: SharedStyles,
    protection: WorkbookProtection,
    metadata: Metadata,
    mru_colors: Vec<String>,
    hidden: bool,
    import_in_progress: bool,
}

impl Workbook {
    /// Create a workbook with a single worksheet named `Sheet1`
    pub fn new() -> Self {
        let mut wb = Self::empty();
        let mut sheet = Worksheet::with_styles("Sheet1".to_string(), wb.styles.clone());
        sheet.set_id(1);
        wb.worksheets.push(sheet);
        wb.current = Some(0);
        wb
    }

    /// Create a workbook with no worksheets
    ///
    /// A workbook must hold at least one sheet before it is validated.
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            current: None,
            selected: 0,
            styles: SharedStyles::new(),
            protection: WorkbookProtection::default(),
            metadata: Metadata::default(),
            mru_colors: Vec::new(),
            hidden: false,
            import_in_progress: false,
        }
    }

    /// Create a workbook with a single worksheet of the given name
    pub fn with_sheet(name: &str) -> Result<Self> {
        let mut wb = Self::empty();
        wb.add_worksheet(name, false)?;
        Ok(wb)
    }

    // === Sheet Access ===

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name (case-insensitive)
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.worksheets[i])
    }

    /// Get a mutable worksheet by name (case-insensitive)
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheet_index(name).map(|i| &mut self.worksheets[i])
    }

    /// Get the index of a worksheet by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets
            .iter()
            .position(|ws| ws.name().eq_ignore_ascii_case(name))
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    /// Names of all worksheets, in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Handle to the workbook's style repository
    pub fn styles(&self) -> &SharedStyles {
        &self.styles
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        Ok(())
    }

    // === Naming ===

    /// Resolve the name a sheet will get, ignoring the sheet at `exclude`
    fn resolve_name(&self, name: &str, sanitize: bool, exclude: Option<usize>) -> Result<String> {
        let others: Vec<&str> = self
            .worksheets
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .map(|(_, ws)| ws.name())
            .collect();

        if sanitize {
            let sanitized = Worksheet::sanitize_name(name, &others);
            if sanitized != name {
                debug!("sheet name '{}' sanitized to '{}'", name, sanitized);
            }
            return Ok(sanitized);
        }

        Worksheet::validate_name(name)?;
        if others.iter().any(|other| other.eq_ignore_ascii_case(name)) {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn next_sheet_id(&self) -> u32 {
        self.worksheets.iter().map(|ws| ws.id()).max().unwrap_or(0) + 1
    }

    // === Sheet Lifecycle ===

    /// Add a new worksheet and make it current
    ///
    /// With `sanitize` an invalid or taken name is repaired; without it such
    /// a name is an error. Returns the index of the new sheet.
    pub fn add_worksheet(&mut self, name: &str, sanitize: bool) -> Result<usize> {
        let name = self.resolve_name(name, sanitize, None)?;
        let sheet = Worksheet::with_styles(name, self.styles.clone());
        Ok(self.attach(sheet))
    }

    /// Add a worksheet built elsewhere and make it current
    ///
    /// The sheet switches to this workbook's style repository; its styles
    /// are re-registered here.
    pub fn add_existing_worksheet(&mut self, mut worksheet: Worksheet, sanitize: bool) -> Result<usize> {
        let name = self.resolve_name(worksheet.name(), sanitize, None)?;
        worksheet.adopt_styles(self.styles.clone())?;
        worksheet.set_name(name)?;
        Ok(self.attach(worksheet))
    }

    fn attach(&mut self, mut worksheet: Worksheet) -> usize {
        worksheet.set_id(self.next_sheet_id());
        debug!("added sheet '{}' with id {}", worksheet.name(), worksheet.id());
        self.worksheets.push(worksheet);
        let index = self.worksheets.len() - 1;
        self.current = Some(index);
        index
    }

    /// Remove a worksheet by index
    ///
    /// Remaining sheets are renumbered. If the removed sheet was current,
    /// the last sheet becomes current; if the selection pointed at or past
    /// the removed position, it moves to the last sheet.
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        self.check_index(index)?;
        let remaining = self.worksheets.len() - 1;

        let selected = if remaining == 0 {
            0
        } else if self.selected >= index {
            remaining - 1
        } else {
            self.selected
        };
        let current = match self.current {
            _ if remaining == 0 => None,
            Some(c) if c == index => Some(remaining - 1),
            Some(c) if c > index => Some(c - 1),
            other => other,
        };

        if !self.import_in_progress {
            if remaining == 0 {
                return Err(Error::NoWorksheets);
            }
            let survivors = self
                .worksheets
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, ws)| ws);
            let visible = survivors.clone().any(|ws| !ws.is_hidden());
            if !visible {
                return Err(Error::NoVisibleWorksheet);
            }
            if let Some(ws) = survivors.clone().nth(selected) {
                if ws.is_hidden() {
                    return Err(Error::SelectedWorksheetHidden(ws.name().to_string()));
                }
            }
        }

        let removed = self.worksheets.remove(index);
        for (i, ws) in self.worksheets.iter_mut().enumerate() {
            ws.set_id(i as u32 + 1);
        }
        self.selected = selected;
        self.current = current;
        debug!("removed sheet '{}'", removed.name());
        Ok(removed)
    }

    /// Rename a worksheet; returns the name it ended up with
    pub fn rename_worksheet(&mut self, index: usize, name: &str, sanitize: bool) -> Result<String> {
        self.check_index(index)?;
        let name = self.resolve_name(name, sanitize, Some(index))?;
        let old = self.worksheets[index].name().to_string();
        self.worksheets[index].set_name(name.clone())?;
        debug!("renamed sheet '{}' to '{}'", old, name);
        Ok(name)
    }

    // === Visibility, Selection and Focus ===

    /// Hide or show a worksheet
    ///
    /// The selected sheet cannot be hidden, nor can the last visible one.
    pub fn set_worksheet_hidden(&mut self, index: usize, hidden: bool) -> Result<()> {
        self.check_index(index)?;
        if hidden && !self.import_in_progress {
            if index == self.selected {
                return Err(Error::SelectedWorksheetHidden(
                    self.worksheets[index].name().to_string(),
                ));
            }
            let other_visible = self
                .worksheets
                .iter()
                .enumerate()
                .any(|(i, ws)| i != index && !ws.is_hidden());
            if !other_visible {
                return Err(Error::NoVisibleWorksheet);
            }
        }
        self.worksheets[index].set_hidden(hidden);
        Ok(())
    }

    /// Index of the selected worksheet
    pub fn selected_worksheet(&self) -> usize {
        self.selected
    }

    /// Select a worksheet; hidden sheets cannot be selected
    pub fn set_selected_worksheet(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.worksheets[index].is_hidden() && !self.import_in_progress {
            return Err(Error::SelectedWorksheetHidden(
                self.worksheets[index].name().to_string(),
            ));
        }
        self.selected = index;
        Ok(())
    }

    /// Index of the current worksheet
    pub fn current_worksheet_index(&self) -> Option<usize> {
        self.current
    }

    /// The worksheet sequential writes go to
    pub fn current_worksheet(&self) -> Option<&Worksheet> {
        self.current.and_then(|i| self.worksheets.get(i))
    }

    pub fn current_worksheet_mut(&mut self) -> Option<&mut Worksheet> {
        self.current.and_then(|i| self.worksheets.get_mut(i))
    }

    /// Make a worksheet current
    pub fn set_current_worksheet(&mut self, index: usize) -> Result<&mut Worksheet> {
        self.check_index(index)?;
        self.current = Some(index);
        Ok(&mut self.worksheets[index])
    }

    /// Make a worksheet current by name
    pub fn set_current_worksheet_by_name(&mut self, name: &str) -> Result<&mut Worksheet> {
        let index = self
            .sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;
        self.set_current_worksheet(index)
    }

    /// Sequential-write helper bound to the current worksheet
    pub fn shortener(&mut self) -> Shortener<'_> {
        Shortener::new(self)
    }

    // === Copying ===

    /// Copy a worksheet within this workbook; returns the index of the copy
    ///
    /// The current worksheet does not change.
    pub fn copy_worksheet(&mut self, index: usize, new_name: &str, sanitize: bool) -> Result<usize> {
        self.check_index(index)?;
        let mut copy = self.worksheets[index].deep_copy()?;
        let name = self.resolve_name(new_name, sanitize, None)?;
        copy.set_name(name)?;
        self.insert_copy(copy)
    }

    /// Copy a worksheet into another workbook; returns the index there
    ///
    /// The target's current worksheet does not change.
    pub fn copy_worksheet_to(
        &self,
        index: usize,
        target: &mut Workbook,
        new_name: &str,
        sanitize: bool,
    ) -> Result<usize> {
        self.check_index(index)?;
        let mut copy = self.worksheets[index].deep_copy()?;
        let name = target.resolve_name(new_name, sanitize, None)?;
        copy.set_name(name)?;
        target.insert_copy(copy)
    }

    fn insert_copy(&mut self, mut copy: Worksheet) -> Result<usize> {
        let previous = self.current;
        copy.adopt_styles(self.styles.clone())?;
        let index = self.attach(copy);
        if previous.is_some() {
            self.current = previous;
        }
        Ok(index)
    }

    // === Workbook Settings ===

    pub fn protection(&self) -> &WorkbookProtection {
        &self.protection
    }

    /// Replace the protection state, e.g. with one read from a file
    pub fn set_protection(&mut self, protection: WorkbookProtection) {
        self.protection = protection;
    }

    /// Protect the workbook; an empty password stores no hash
    pub fn set_workbook_protection(&mut self, lock_windows: bool, lock_structure: bool, password: &str) {
        let hash = password_hash(password);
        self.protection = WorkbookProtection {
            lock_windows,
            lock_structure,
            password_hash: if hash.is_empty() { None } else { Some(hash) },
        };
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Recently used colors as 8-digit uppercase ARGB hex
    pub fn mru_colors(&self) -> &[String] {
        &self.mru_colors
    }

    /// Remember a recently used color given as 6- or 8-digit hex
    pub fn add_mru_color(&mut self, color: &str) -> Result<()> {
        let normalized = Color::parse_argb(color)?
            .to_argb_hex()
            .ok_or_else(|| Error::InvalidColor(color.to_string()))?;
        if !self.mru_colors.contains(&normalized) {
            self.mru_colors.push(normalized);
        }
        Ok(())
    }

    pub fn clear_mru_colors(&mut self) {
        self.mru_colors.clear();
    }

    /// Check if the whole workbook window is hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    // === Import and Validation ===

    pub fn import_in_progress(&self) -> bool {
        self.import_in_progress
    }

    /// Suspend (or resume) structural validation during a bulk load
    pub fn set_import_in_progress(&mut self, in_progress: bool) {
        debug!("import in progress: {}", in_progress);
        self.import_in_progress = in_progress;
    }

    /// Resume validation and check the loaded workbook
    pub fn finish_import(&mut self) -> Result<()> {
        self.set_import_in_progress(false);
        self.validate_worksheets()
    }

    /// Check the workbook-level invariants
    ///
    /// A workbook needs at least one sheet, at least one visible sheet, and
    /// a visible selected sheet. Skipped while an import is in progress.
    pub fn validate_worksheets(&self) -> Result<()> {
        if self.import_in_progress {
            return Ok(());
        }
        if self.worksheets.is_empty() {
            return Err(Error::NoWorksheets);
        }
        if let Some(ws) = self.worksheets.get(self.selected) {
            if ws.is_hidden() {
                return Err(Error::SelectedWorksheetHidden(ws.name().to_string()));
            }
        } else {
            return Err(Error::SheetOutOfBounds(self.selected, self.worksheets.len()));
        }
        if self.worksheets.iter().all(|ws| ws.is_hidden()) {
            return Err(Error::NoVisibleWorksheet);
        }
        Ok(())
    }

    /// Bring every sheet into its final shape and return the style table
    ///
    /// Merges are resolved, auto-filters and columns recalculated, and the
    /// workbook validated. The returned styles are the canonical instances
    /// in index order; an encoder emits one record per entry.
    pub fn prepare_for_encoding(&mut self) -> Result<Vec<Arc<Style>>> {
        self.validate_worksheets()?;
        for ws in &mut self.worksheets {
            ws.resolve_merges()?;
            ws.recalculate_auto_filter();
            ws.recalculate_columns();
        }
        self.styles.snapshot()
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}
