//! The theme preference store and propagator.
//!
//! [`ThemeManager`] owns the one piece of durable state (the explicit
//! preference, mirrored from storage) and the one piece of derived state (the
//! active theme, mirrored onto the document). It is an ordinary value: the
//! host constructs it once at its composition root and hands `&mut` access to
//! whatever needs to change the theme. Because every mutating operation takes
//! `&mut self`, events are processed one at a time; a multi-threaded host
//! puts the manager behind a `Mutex`.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► initialize ──► set_theme / toggle_theme      (explicit, persisted)
//!                   └──► on_system_preference_changed (followed only without
//!                                                      an explicit choice,
//!                                                      never persisted)
//! ```
//!
//! # Failure handling
//!
//! Storage can always fail. Read failures are treated as "no saved
//! preference", write failures leave the in-memory state updated so the
//! session still behaves; both are logged with `tracing` and nothing is
//! returned to the caller.
//!
//! # Example
//!
//! ```rust
//! use folio_theme::{MemoryDocument, MemoryStorage, MockColorScheme, Theme, ThemeManager, ThemeOptions};
//!
//! let mut manager = ThemeManager::new(
//!     ThemeOptions::default(),
//!     MemoryStorage::new(),
//!     MockColorScheme::light(),
//!     MemoryDocument::new(),
//! );
//!
//! assert_eq!(manager.initialize(), Theme::Light);
//! manager.toggle_theme();
//! assert_eq!(manager.current_theme(), Theme::Dark);
//! assert_eq!(manager.document().theme_attribute(), Some("dark"));
//! ```

use tracing::{debug, info, warn};

use crate::document::{Document, Presentation};
use crate::events::{ChangeCause, Subscription, ThemeChanged, ThemeEvents};
use crate::options::ThemeOptions;
use crate::resolve::{resolve_theme, ThemeSource};
use crate::storage::PreferenceStorage;
use crate::system::ColorSchemeProbe;
use crate::theme::Theme;

/// Resolves, persists, applies and broadcasts the active theme.
#[derive(Debug)]
pub struct ThemeManager<S, P, D> {
    options: ThemeOptions,
    storage: S,
    probe: P,
    document: D,
    explicit: Option<Theme>,
    active: Theme,
    source: ThemeSource,
    listening: bool,
    events: ThemeEvents,
}

impl<S, P, D> ThemeManager<S, P, D>
where
    S: PreferenceStorage,
    P: ColorSchemeProbe,
    D: Document,
{
    /// Creates a manager. Nothing is read or rendered until
    /// [`initialize`](Self::initialize).
    pub fn new(options: ThemeOptions, storage: S, probe: P, document: D) -> Self {
        let active = options.default_theme;
        Self {
            options,
            storage,
            probe,
            document,
            explicit: None,
            active,
            source: ThemeSource::Default,
            listening: false,
            events: ThemeEvents::new(),
        }
    }

    /// Determines the active theme, renders it and starts following the
    /// system preference.
    ///
    /// Resolution order is saved preference, then system preference, then
    /// the configured default. Calling this again re-reads storage; the
    /// system listener stays registered once.
    pub fn initialize(&mut self) -> Theme {
        self.explicit = self.read_saved_theme();

        let probe = &self.probe;
        let resolved = resolve_theme(self.explicit, || probe.query(), self.options.default_theme);

        self.active = resolved.theme;
        self.source = resolved.source;
        self.apply(resolved.theme);
        self.listening = true;

        info!(theme = %resolved.theme, source = %resolved.source, "theme manager initialized");
        resolved.theme
    }

    /// Records `theme` as the user's explicit choice and makes it active.
    pub fn set_theme(&mut self, theme: Theme) {
        self.explicit = Some(theme);
        self.source = ThemeSource::Stored;
        self.write_saved_theme(theme);
        self.activate(theme, ChangeCause::Explicit);
    }

    /// Switches to the opposite of the active theme and returns it.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.active.opposite();
        self.set_theme(next);
        next
    }

    pub fn enable_light_mode(&mut self) {
        self.set_theme(Theme::Light);
    }

    pub fn enable_dark_mode(&mut self) {
        self.set_theme(Theme::Dark);
    }

    /// Renders `theme` onto the document.
    ///
    /// Only the document changes; the active theme and the stored
    /// preference are untouched. Rendering is a pure function of `theme`, so
    /// applying the same theme twice leaves the document unchanged.
    pub fn apply(&mut self, theme: Theme) {
        Presentation::for_theme(theme, &self.options).render(&mut self.document);
    }

    /// Platform callback for a change of the system colour scheme.
    ///
    /// Followed only when the user has made no explicit choice, and never
    /// written to storage. Returns whether the change was followed.
    pub fn on_system_preference_changed(&mut self, theme: Theme) -> bool {
        if !self.listening {
            debug!(%theme, "system preference change ignored: not listening");
            return false;
        }
        if let Some(explicit) = self.explicit {
            debug!(%theme, %explicit, "system preference change ignored: explicit choice");
            return false;
        }
        self.source = ThemeSource::System;
        self.activate(theme, ChangeCause::System);
        true
    }

    /// Forgets the explicit choice and goes back to following the system.
    ///
    /// The stored preference is removed, so the next session also starts
    /// from the system preference.
    pub fn follow_system(&mut self) -> Theme {
        if let Err(err) = self.storage.remove(&self.options.storage_key) {
            warn!(error = %err, key = %self.options.storage_key, "failed to clear saved theme");
        }
        self.explicit = None;

        let probe = &self.probe;
        let resolved = resolve_theme(None, || probe.query(), self.options.default_theme);
        self.source = resolved.source;
        self.activate(resolved.theme, ChangeCause::System);
        resolved.theme
    }

    /// Stops reacting to [`on_system_preference_changed`](Self::on_system_preference_changed).
    pub fn detach_system_listener(&mut self) {
        self.listening = false;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Registers a theme-changed listener.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&ThemeChanged) + Send + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }

    pub fn listener_count(&self) -> usize {
        self.events.len()
    }

    pub fn current_theme(&self) -> Theme {
        self.active
    }

    pub fn is_dark_mode(&self) -> bool {
        self.active.is_dark()
    }

    pub fn is_light_mode(&self) -> bool {
        self.active.is_light()
    }

    /// The user's explicit choice, if any.
    pub fn explicit_theme(&self) -> Option<Theme> {
        self.explicit
    }

    /// Where the active theme came from.
    pub fn theme_source(&self) -> ThemeSource {
        self.source
    }

    pub fn options(&self) -> &ThemeOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    fn activate(&mut self, theme: Theme, cause: ChangeCause) {
        self.active = theme;
        self.apply(theme);
        self.events.emit(&ThemeChanged { theme, cause });
        info!(%theme, ?cause, "theme changed");
    }

    fn read_saved_theme(&self) -> Option<Theme> {
        let key = &self.options.storage_key;
        match self.storage.get(key) {
            Ok(Some(value)) => {
                let theme = self.options.parse(&value);
                if theme.is_none() {
                    warn!(%key, %value, "ignoring unrecognised saved theme");
                }
                theme
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, %key, "could not read saved theme");
                None
            }
        }
    }

    fn write_saved_theme(&self, theme: Theme) {
        let key = &self.options.storage_key;
        if let Err(err) = self.storage.set(key, self.options.value_of(theme)) {
            warn!(error = %err, %key, "could not save theme");
        }
    }
}
