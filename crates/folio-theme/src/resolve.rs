//! Fallback chain for the initial theme.
//!
//! Three sources are tried in order and the first one with an answer wins:
//!
//! ```text
//! resolve
//! ├── Stored   → explicit preference from storage (None if absent/unrecognised/unreadable)
//! ├── System   → platform colour scheme (None if no preference)
//! └── Default  → configured default, always answers
//! ```

use std::fmt;

use crate::system::SystemPreference;
use crate::theme::Theme;

/// Which step of the chain produced the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    System,
    Default,
}

impl fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeSource::Stored => write!(f, "saved preference"),
            ThemeSource::System => write!(f, "system preference"),
            ThemeSource::Default => write!(f, "default"),
        }
    }
}

/// A theme together with the source that provided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub theme: Theme,
    pub source: ThemeSource,
}

/// Runs the chain.
///
/// `system` is only consulted when `explicit` is `None`, so callers can pass a
/// closure that queries the platform lazily.
pub fn resolve_theme<F>(explicit: Option<Theme>, system: F, default: Theme) -> ResolvedTheme
where
    F: FnOnce() -> SystemPreference,
{
    if let Some(theme) = explicit {
        return ResolvedTheme {
            theme,
            source: ThemeSource::Stored,
        };
    }
    if let Some(theme) = system().theme() {
        return ResolvedTheme {
            theme,
            source: ThemeSource::System,
        };
    }
    ResolvedTheme {
        theme: default,
        source: ThemeSource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_wins_without_querying_system() {
        let resolved = resolve_theme(
            Some(Theme::Dark),
            || panic!("system must not be queried"),
            Theme::Light,
        );
        assert_eq!(resolved.theme, Theme::Dark);
        assert_eq!(resolved.source, ThemeSource::Stored);
    }

    #[test]
    fn system_used_when_no_explicit() {
        let resolved = resolve_theme(None, || SystemPreference::Light, Theme::Dark);
        assert_eq!(resolved.theme, Theme::Light);
        assert_eq!(resolved.source, ThemeSource::System);
    }

    #[test]
    fn default_when_nothing_else_answers() {
        let resolved = resolve_theme(None, || SystemPreference::NoPreference, Theme::Dark);
        assert_eq!(resolved.theme, Theme::Dark);
        assert_eq!(resolved.source, ThemeSource::Default);
    }

    #[test]
    fn source_display() {
        assert_eq!(ThemeSource::Stored.to_string(), "saved preference");
        assert_eq!(ThemeSource::Default.to_string(), "default");
    }
}
