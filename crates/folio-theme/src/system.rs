//! System colour-scheme detection.
//!
//! The host platform reports one of three outcomes: prefers dark, prefers
//! light, or nothing (unsupported or unset). [`ColorSchemeProbe`] abstracts
//! the query so the manager can be tested without depending on the desktop
//! settings of the machine running the tests.
//!
//! [`OsColorScheme`] asks the operating system through `dark-light`.
//! [`MockColorScheme`] is a shared, mutable stand-in for tests.
//!
//! Native hosts have no push notification for scheme changes, so
//! [`SchemeWatcher`] turns repeated probes into change events that the host
//! forwards to
//! [`ThemeManager::on_system_preference_changed`](crate::ThemeManager::on_system_preference_changed).

use std::sync::{Arc, Mutex};

use dark_light::Mode as OsMode;
use tracing::debug;

use crate::theme::Theme;

/// The platform's reported colour-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemPreference {
    Dark,
    Light,
    /// The platform has no preference or cannot report one.
    NoPreference,
}

impl SystemPreference {
    /// The concrete theme this preference asks for, if any.
    pub fn theme(self) -> Option<Theme> {
        match self {
            SystemPreference::Dark => Some(Theme::Dark),
            SystemPreference::Light => Some(Theme::Light),
            SystemPreference::NoPreference => None,
        }
    }
}

impl From<Theme> for SystemPreference {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => SystemPreference::Dark,
            Theme::Light => SystemPreference::Light,
        }
    }
}

/// Queries the platform colour-scheme preference.
pub trait ColorSchemeProbe: Send + Sync {
    fn query(&self) -> SystemPreference;
}

impl<T: ColorSchemeProbe + ?Sized> ColorSchemeProbe for &T {
    fn query(&self) -> SystemPreference {
        (**self).query()
    }
}

impl<T: ColorSchemeProbe + ?Sized> ColorSchemeProbe for Arc<T> {
    fn query(&self) -> SystemPreference {
        (**self).query()
    }
}

/// Probe backed by the operating system's appearance setting.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsColorScheme;

impl ColorSchemeProbe for OsColorScheme {
    fn query(&self) -> SystemPreference {
        match dark_light::detect() {
            Ok(OsMode::Dark) => SystemPreference::Dark,
            Ok(OsMode::Light) => SystemPreference::Light,
            Ok(OsMode::Unspecified) => SystemPreference::NoPreference,
            Err(err) => {
                debug!(error = %err, "system colour scheme unavailable");
                SystemPreference::NoPreference
            }
        }
    }
}

/// A probe whose answer can be changed from the outside.
///
/// Clones share state, so a test can keep one handle and hand another to the
/// manager.
#[derive(Debug, Clone)]
pub struct MockColorScheme {
    current: Arc<Mutex<SystemPreference>>,
}

impl MockColorScheme {
    pub fn new(preference: SystemPreference) -> Self {
        Self {
            current: Arc::new(Mutex::new(preference)),
        }
    }

    pub fn dark() -> Self {
        Self::new(SystemPreference::Dark)
    }

    pub fn light() -> Self {
        Self::new(SystemPreference::Light)
    }

    pub fn unsupported() -> Self {
        Self::new(SystemPreference::NoPreference)
    }

    pub fn set(&self, preference: SystemPreference) {
        if let Ok(mut current) = self.current.lock() {
            *current = preference;
        }
    }
}

impl ColorSchemeProbe for MockColorScheme {
    fn query(&self) -> SystemPreference {
        self.current
            .lock()
            .map(|current| *current)
            .unwrap_or(SystemPreference::NoPreference)
    }
}

/// Turns successive probe readings into change notifications.
///
/// Only transitions to a concrete preference are reported; the platform
/// going silent keeps whatever theme was last followed.
#[derive(Debug)]
pub struct SchemeWatcher<P: ColorSchemeProbe> {
    probe: P,
    last: SystemPreference,
}

impl<P: ColorSchemeProbe> SchemeWatcher<P> {
    /// Starts watching from the probe's current reading.
    pub fn new(probe: P) -> Self {
        let last = probe.query();
        Self { probe, last }
    }

    /// Reads the probe once and returns the new theme if it changed.
    pub fn poll(&mut self) -> Option<Theme> {
        let now = self.probe.query();
        if now == self.last {
            return None;
        }
        debug!(from = ?self.last, to = ?now, "system colour scheme changed");
        self.last = now;
        now.theme()
    }

    pub fn last(&self) -> SystemPreference {
        self.last
    }
}
