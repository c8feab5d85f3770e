//! Short colour transition after a theme change.
//!
//! [`ColorTransition`] is a theme-change observer. Each notification opens a
//! window of `duration` during which the host should animate background and
//! text colours; outside the window colours switch instantly.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::events::Subscription;
use crate::manager::ThemeManager;
use crate::storage::PreferenceStorage;
use crate::system::ColorSchemeProbe;

#[derive(Debug, Clone)]
pub struct ColorTransition {
    duration: Duration,
    started: Arc<Mutex<Option<Instant>>>,
}

impl ColorTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts observing `manager`. Clones of this transition share the window.
    pub fn attach<S, P, D>(&self, manager: &mut ThemeManager<S, P, D>) -> Subscription
    where
        S: PreferenceStorage,
        P: ColorSchemeProbe,
        D: Document,
    {
        let started = Arc::clone(&self.started);
        manager.subscribe(move |_| {
            if let Ok(mut started) = started.lock() {
                *started = Some(Instant::now());
            }
        })
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        let started = match self.started.lock() {
            Ok(started) => *started,
            Err(_) => return false,
        };
        started
            .map(|at| now.saturating_duration_since(at) < self.duration)
            .unwrap_or(false)
    }

    /// The CSS `transition` value to set on the root while the window is open.
    pub fn css_transition(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let ms = self.duration.as_millis();
        Some(format!(
            "background-color {ms}ms ease, color {ms}ms ease"
        ))
    }
}

impl Default for ColorTransition {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
