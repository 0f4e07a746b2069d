use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::core::storage::{KeyValueStore, StorageError};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Dark,
    #[default]
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// Only the exact string `dark` selects the dark palette.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemePreference::Dark
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dark flag plus the slot that remembers it across sessions.
pub struct ThemeToggle {
    store: Arc<dyn KeyValueStore>,
    current: ThemePreference,
}

impl ThemeToggle {
    /// Read the stored preference. A store that cannot be read behaves like
    /// an empty one.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "could not read theme preference");
                None
            }
        };
        let current = ThemePreference::from_stored(stored.as_deref());
        Self { store, current }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current.is_dark()
    }

    /// Flip the flag and persist the result. The flag flips for this session
    /// even when the write fails.
    pub fn toggle(&mut self) -> Result<ThemePreference, StorageError> {
        let next = self.current.flipped();
        self.set(next)?;
        Ok(next)
    }

    pub fn set(&mut self, preference: ThemePreference) -> Result<(), StorageError> {
        self.current = preference;
        self.store.set(THEME_KEY, preference.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    #[test]
    fn absent_or_unknown_values_read_as_light() {
        assert_eq!(ThemePreference::from_stored(None), ThemePreference::Light);
        assert_eq!(
            ThemePreference::from_stored(Some("solarized")),
            ThemePreference::Light
        );
        assert_eq!(
            ThemePreference::from_stored(Some("dark")),
            ThemePreference::Dark
        );
    }

    #[test]
    fn stored_dark_is_applied_on_load() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "dark").unwrap();
        assert!(ThemeToggle::load(store).is_dark());
    }

    #[test]
    fn padded_dark_is_not_dark() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, " dark\n").unwrap();
        assert!(!ThemeToggle::load(store.clone()).is_dark());

        store.set(THEME_KEY, "Dark").unwrap();
        assert!(!ThemeToggle::load(store).is_dark());
    }

    #[test]
    fn toggling_twice_restores_flag_and_slot() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "light").unwrap();
        let mut toggle = ThemeToggle::load(store.clone());

        assert_eq!(toggle.toggle().unwrap(), ThemePreference::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        assert_eq!(toggle.toggle().unwrap(), ThemePreference::Light);
        assert!(!toggle.is_dark());
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }
}
