//! Named custom palettes layered on top of the light/dark themes.
//!
//! A palette maps CSS custom-property names (without the leading `--`) to
//! values. Palettes live in storage as one JSON object under
//! [`CUSTOM_THEMES_KEY`]:
//!
//! ```json
//! { "ocean": { "primary-color": "#0077be", "bg-color": "#001f3f" } }
//! ```
//!
//! Like the theme preference, palette persistence is best effort: storage
//! errors are logged and the in-memory set of palettes stays authoritative
//! for the session.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::StorageError;
use crate::storage::PreferenceStorage;

/// Storage key holding every saved palette.
pub const CUSTOM_THEMES_KEY: &str = "custom-themes";

/// Property name to value.
pub type Palette = BTreeMap<String, String>;

type PaletteMap = BTreeMap<String, Palette>;

#[derive(Debug)]
pub struct ThemeCustomizer<S> {
    storage: S,
    themes: PaletteMap,
}

impl<S: PreferenceStorage> ThemeCustomizer<S> {
    /// Creates a customizer and loads whatever palettes are saved.
    pub fn new(storage: S) -> Self {
        let mut customizer = Self {
            storage,
            themes: BTreeMap::new(),
        };
        customizer.load();
        customizer
    }

    /// Merges saved palettes into memory. Saved entries replace in-memory
    /// palettes of the same name.
    pub fn load(&mut self) {
        match self.read_saved() {
            Ok(saved) => {
                debug!(count = saved.len(), "loaded custom themes");
                self.themes.extend(saved);
            }
            Err(err) => warn!(error = %err, "failed to load custom themes"),
        }
    }

    /// Adds or replaces a palette and persists it.
    pub fn create_theme<I, K, V>(&mut self, name: impl Into<String>, colors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let name = name.into();
        let palette: Palette = colors
            .into_iter()
            .map(|(k, v)| (normalize_property(k.as_ref()), v.into()))
            .collect();

        self.themes.insert(name.clone(), palette.clone());
        if let Err(err) = self.update_saved(|saved| {
            saved.insert(name.clone(), palette);
        }) {
            warn!(error = %err, theme = %name, "failed to save custom theme");
        }
    }

    /// Writes the palette's properties onto `document`.
    ///
    /// Returns `false` and does nothing when no palette has that name.
    pub fn apply_theme<D: Document + ?Sized>(&self, name: &str, document: &mut D) -> bool {
        let Some(palette) = self.themes.get(name) else {
            return false;
        };
        for (property, value) in palette {
            document.set_style_property(&format!("--{property}"), value);
        }
        true
    }

    /// Removes a palette from memory and storage. Returns whether it existed
    /// in memory.
    pub fn delete_theme(&mut self, name: &str) -> bool {
        let existed = self.themes.remove(name).is_some();
        if let Err(err) = self.update_saved(|saved| {
            saved.remove(name);
        }) {
            warn!(error = %err, theme = %name, "failed to delete custom theme");
        }
        existed
    }

    pub fn theme(&self, name: &str) -> Option<&Palette> {
        self.themes.get(name)
    }

    pub fn themes(&self) -> &BTreeMap<String, Palette> {
        &self.themes
    }

    fn read_saved(&self) -> Result<PaletteMap, StorageError> {
        match self.storage.get(CUSTOM_THEMES_KEY)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))
            }
            None => Ok(BTreeMap::new()),
        }
    }

    fn update_saved<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut PaletteMap),
    {
        let mut saved = self.read_saved()?;
        change(&mut saved);
        let json = serde_json::to_string(&saved).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.storage.set(CUSTOM_THEMES_KEY, &json)
    }
}

fn normalize_property(name: &str) -> String {
    name.trim().trim_start_matches("--").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::storage::{DisabledStorage, MemoryStorage};
    use std::sync::Arc;

    #[test]
    fn create_persists_and_reloads() {
        let storage = Arc::new(MemoryStorage::new());
        let mut customizer = ThemeCustomizer::new(Arc::clone(&storage));
        customizer.create_theme("ocean", [("primary-color", "#0077be")]);

        let reloaded = ThemeCustomizer::new(storage);
        assert_eq!(
            reloaded.theme("ocean").and_then(|p| p.get("primary-color")),
            Some(&"#0077be".to_string())
        );
    }

    #[test]
    fn apply_sets_custom_properties() {
        let mut customizer = ThemeCustomizer::new(MemoryStorage::new());
        customizer.create_theme(
            "forest",
            [("--bg-color", "#0b3d0b"), ("text-color", "#e0ffe0")],
        );

        let mut doc = MemoryDocument::new();
        assert!(customizer.apply_theme("forest", &mut doc));
        assert_eq!(doc.style_property("--bg-color"), Some("#0b3d0b"));
        assert_eq!(doc.style_property("--text-color"), Some("#e0ffe0"));
    }

    #[test]
    fn apply_unknown_theme_is_noop() {
        let customizer = ThemeCustomizer::new(MemoryStorage::new());
        let mut doc = MemoryDocument::new();
        assert!(!customizer.apply_theme("missing", &mut doc));
        assert!(doc.style_properties().is_empty());
    }

    #[test]
    fn delete_removes_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut customizer = ThemeCustomizer::new(Arc::clone(&storage));
        customizer.create_theme("a", [("x", "1")]);
        customizer.create_theme("b", [("y", "2")]);

        assert!(customizer.delete_theme("a"));
        assert!(!customizer.delete_theme("a"));

        let reloaded = ThemeCustomizer::new(storage);
        assert!(reloaded.theme("a").is_none());
        assert!(reloaded.theme("b").is_some());
    }

    #[test]
    fn corrupt_saved_data_starts_empty() {
        let storage = MemoryStorage::with_entry(CUSTOM_THEMES_KEY, "not json");
        let customizer = ThemeCustomizer::new(storage);
        assert!(customizer.themes().is_empty());
    }

    #[test]
    fn disabled_storage_keeps_session_palettes() {
        let mut customizer = ThemeCustomizer::new(DisabledStorage);
        customizer.create_theme("session", [("accent", "red")]);
        assert!(customizer.theme("session").is_some());
    }
}
