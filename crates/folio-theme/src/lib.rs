//! Light/dark theme preference store with system-preference fallback.
//!
//! `folio-theme` decides which of two themes a document shows, remembers the
//! user's explicit choice across sessions, and tells interested parties when
//! the theme changes.
//!
//! # Core Concepts
//!
//! - [`Theme`]: `Light` or `Dark`, nothing else
//! - [`ThemeManager`]: resolves, persists, applies and broadcasts the active theme
//! - [`PreferenceStorage`]: durable key/value storage for the explicit choice
//! - [`ColorSchemeProbe`]: the platform's colour-scheme preference
//! - [`Document`]: where the theme is rendered (a root attribute plus derived presentation)
//! - [`ThemeChanged`]: notification delivered to listeners registered with [`subscribe`](ThemeManager::subscribe)
//!
//! # Resolution
//!
//! At [`initialize`](ThemeManager::initialize) the active theme is the saved
//! explicit choice, else the system preference, else
//! [`ThemeOptions::default_theme`]. Afterwards:
//!
//! - [`set_theme`](ThemeManager::set_theme) and
//!   [`toggle_theme`](ThemeManager::toggle_theme) record an explicit choice;
//! - [`on_system_preference_changed`](ThemeManager::on_system_preference_changed)
//!   is followed only while there is no explicit choice, and is never saved.
//!
//! Storage failures are logged and never surface as errors.
//!
//! # Quick Start
//!
//! ```rust
//! use folio_theme::{
//!     MemoryDocument, MemoryStorage, MockColorScheme, Theme, ThemeManager, ThemeOptions,
//! };
//!
//! let mut manager = ThemeManager::new(
//!     ThemeOptions::default(),
//!     MemoryStorage::new(),
//!     MockColorScheme::light(),
//!     MemoryDocument::new(),
//! );
//!
//! // No saved choice: follow the system.
//! assert_eq!(manager.initialize(), Theme::Light);
//! assert!(manager.on_system_preference_changed(Theme::Dark));
//!
//! // Explicit choice wins from now on.
//! manager.set_theme(Theme::Light);
//! assert!(!manager.on_system_preference_changed(Theme::Dark));
//! assert_eq!(manager.current_theme(), Theme::Light);
//! ```
//!
//! # Extras
//!
//! - [`ColorTransition`]: observer that opens a short colour-transition window after each change
//! - [`ThemeCustomizer`]: named custom palettes applied as CSS custom properties
//! - [`SchemeWatcher`]: turns polled system preference readings into change callbacks

mod customizer;
pub mod document;
mod error;
mod events;
mod manager;
mod options;
mod resolve;
pub mod storage;
pub mod system;
mod theme;
mod transition;

pub use customizer::{Palette, ThemeCustomizer, CUSTOM_THEMES_KEY};
pub use document::{
    Document, MemoryDocument, Presentation, ToggleIcon, ToggleState, THEME_ATTRIBUTE,
    THEME_COLOR_META,
};
pub use error::{ConfigError, StorageError};
pub use events::{ChangeCause, Subscription, ThemeChanged, ThemeEvents};
pub use manager::ThemeManager;
pub use options::{ChromeColors, ThemeOptions, DEFAULT_STORAGE_KEY};
pub use resolve::{resolve_theme, ResolvedTheme, ThemeSource};
pub use storage::{DisabledStorage, FailingStorage, FileStorage, MemoryStorage, PreferenceStorage};
pub use system::{ColorSchemeProbe, MockColorScheme, OsColorScheme, SchemeWatcher, SystemPreference};
pub use theme::{Theme, UnknownTheme};
pub use transition::ColorTransition;
