//! Style repository for de-duplication

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;
use log::trace;

use super::Style;
use crate::error::{Error, Result};

/// Registry of canonical styles
///
/// Workbooks typically assign the same formatting to many cells. The
/// repository keeps exactly one shared `Arc<Style>` per distinct style value
/// and gives each a stable index, so an encoder can emit one style record per
/// canonical instance. Index 0 is always the default style.
#[derive(Debug)]
pub struct StyleRepository {
    /// Canonical instances in registration order
    styles: Vec<Arc<Style>>,
    /// Value lookup; `Arc<Style>` borrows as `Style`
    index_map: AHashMap<Arc<Style>, u32>,
}

impl StyleRepository {
    /// Create a repository holding only the default style
    pub fn new() -> Self {
        let mut repository = Self {
            styles: Vec::with_capacity(64),
            index_map: AHashMap::with_capacity(64),
        };
        repository.register(Arc::new(Style::default()));
        repository
    }

    fn register(&mut self, style: Arc<Style>) -> Arc<Style> {
        let idx = self.styles.len() as u32;
        trace!("registered canonical style #{}", idx);
        self.index_map.insert(Arc::clone(&style), idx);
        self.styles.push(Arc::clone(&style));
        style
    }

    /// Get the canonical instance for a style value
    ///
    /// Returns the registered instance when an equal style exists, otherwise
    /// registers `style` and returns it.
    pub fn intern(&mut self, style: Style) -> Arc<Style> {
        if let Some(&idx) = self.index_map.get(&style) {
            return Arc::clone(&self.styles[idx as usize]);
        }
        self.register(Arc::new(style))
    }

    /// Merge `overlay` over `base` facet by facet and intern the result
    pub fn append(&mut self, base: &Style, overlay: &Style) -> Arc<Style> {
        self.intern(base.merged_with(overlay))
    }

    /// Register an instance that was already resolved elsewhere
    ///
    /// The given `Arc` becomes canonical as-is when its value is new here, so
    /// copies keep sharing the original instance. When an equal value is
    /// already registered, the registered instance is returned instead.
    pub fn attach_unmanaged(&mut self, style: Arc<Style>) -> Arc<Style> {
        match self.index_map.get(style.as_ref()) {
            Some(&idx) => Arc::clone(&self.styles[idx as usize]),
            None => self.register(style),
        }
    }

    /// Stable index of a style value
    pub fn index_of(&self, style: &Style) -> Option<u32> {
        self.index_map.get(style).copied()
    }

    /// Check whether `style` is the registered canonical instance
    pub fn is_canonical(&self, style: &Arc<Style>) -> bool {
        self.index_map
            .get_key_value(style.as_ref())
            .is_some_and(|(canonical, _)| Arc::ptr_eq(canonical, style))
    }

    /// Get a canonical style by index
    pub fn get(&self, index: u32) -> Option<&Arc<Style>> {
        self.styles.get(index as usize)
    }

    /// Get the default style (index 0)
    pub fn default_style(&self) -> &Arc<Style> {
        &self.styles[0]
    }

    /// Number of canonical styles, including the default
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if only the default style is registered
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all canonical styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Arc<Style>)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StyleRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle to a workbook-scoped [`StyleRepository`]
///
/// Every worksheet of a workbook holds a clone of the same handle.
#[derive(Debug, Clone, Default)]
pub struct SharedStyles(Arc<Mutex<StyleRepository>>);

impl SharedStyles {
    /// Create a handle to a fresh repository
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StyleRepository>> {
        self.0.lock().map_err(|_| Error::StyleRepositoryUnavailable)
    }

    /// Run `f` with exclusive access to the repository
    pub fn with<R>(&self, f: impl FnOnce(&mut StyleRepository) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// See [`StyleRepository::intern`]
    pub fn intern(&self, style: Style) -> Result<Arc<Style>> {
        self.with(|repo| repo.intern(style))
    }

    /// See [`StyleRepository::append`]
    pub fn append(&self, base: &Style, overlay: &Style) -> Result<Arc<Style>> {
        self.with(|repo| repo.append(base, overlay))
    }

    /// See [`StyleRepository::attach_unmanaged`]
    pub fn attach_unmanaged(&self, style: Arc<Style>) -> Result<Arc<Style>> {
        self.with(|repo| repo.attach_unmanaged(style))
    }

    /// See [`StyleRepository::index_of`]
    pub fn index_of(&self, style: &Style) -> Result<Option<u32>> {
        self.with(|repo| repo.index_of(style))
    }

    /// Canonical styles in index order
    pub fn snapshot(&self) -> Result<Vec<Arc<Style>>> {
        self.with(|repo| repo.iter().map(|(_, s)| Arc::clone(s)).collect())
    }

    /// Number of canonical styles, including the default
    pub fn len(&self) -> Result<usize> {
        self.with(|repo| repo.len())
    }

    /// Check whether both handles point at the same repository
    pub fn same_repository(&self, other: &SharedStyles) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BasicStyle, Color};
    use crate::ErrorKind;

    #[test]
    fn test_default_style() {
        let repo = StyleRepository::new();
        assert_eq!(repo.len(), 1);
        assert!(repo.is_empty());
        assert_eq!(repo.get(0).map(|s| s.as_ref()), Some(&Style::default()));
        assert_eq!(repo.index_of(&Style::default()), Some(0));
    }

    #[test]
    fn test_interning_returns_same_instance() {
        let mut repo = StyleRepository::new();

        let first = repo.intern(Style::new().bold(true));
        let second = repo.intern(Style::new().bold(true));
        let other = repo.intern(Style::new().italic(true));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.index_of(&first), Some(1));
        assert_eq!(repo.index_of(&other), Some(2));
    }

    #[test]
    fn test_signed_zero_font_sizes_intern_together() {
        let mut repo = StyleRepository::new();

        let mut negative = Style::new();
        negative.font.size = -0.0;
        let positive = repo.intern(Style::new().font_size(0.0));
        let collapsed = repo.intern(negative);
        assert!(Arc::ptr_eq(&positive, &collapsed));
        assert_eq!(repo.len(), 2);

        let set = Style::new().font_size(-0.0);
        assert!(set.font.size.is_sign_positive());
        assert_eq!(Style::new().font_size(f64::NAN).font.size, 11.0);
        assert_eq!(Style::new().font_size(f64::INFINITY).font.size, 11.0);
    }

    #[test]
    fn test_append_interns_merged_value() {
        let mut repo = StyleRepository::new();
        let merged = repo.append(&BasicStyle::Bold.style(), &Style::new().fill_color(Color::RED));
        let direct = repo.intern(Style::new().bold(true).fill_color(Color::RED));
        assert!(Arc::ptr_eq(&merged, &direct));
    }

    #[test]
    fn test_attach_unmanaged_preserves_identity() {
        let mut source = StyleRepository::new();
        let canonical = source.intern(BasicStyle::Strike.style());

        let mut copy = StyleRepository::new();
        let attached = copy.attach_unmanaged(Arc::clone(&canonical));
        assert!(Arc::ptr_eq(&attached, &canonical));
        assert!(copy.is_canonical(&canonical));

        // A second equal-but-distinct instance collapses onto the first
        let again = copy.attach_unmanaged(Arc::new(BasicStyle::Strike.style()));
        assert!(Arc::ptr_eq(&again, &canonical));
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_is_canonical() {
        let mut repo = StyleRepository::new();
        let canonical = repo.intern(BasicStyle::Italic.style());
        assert!(repo.is_canonical(&canonical));
        assert!(!repo.is_canonical(&Arc::new(BasicStyle::Italic.style())));
    }

    #[test]
    fn test_shared_handle() {
        let styles = SharedStyles::new();
        let clone = styles.clone();
        assert!(styles.same_repository(&clone));

        let a = styles.intern(BasicStyle::Bold.style()).unwrap();
        let b = clone.intern(BasicStyle::Bold.style()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(styles.len().unwrap(), 2);
        assert_eq!(styles.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_poisoned_lock_is_style_error() {
        let styles = SharedStyles::new();
        let poisoner = styles.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.0.lock().unwrap();
            panic!("poison the repository lock");
        })
        .join();

        let err = styles.intern(Style::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Style);
    }
}
