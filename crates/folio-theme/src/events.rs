//! Theme-change notifications.
//!
//! Delivery is synchronous and in-process: [`ThemeEvents::emit`] calls every
//! listener registered at that moment, in registration order, before
//! returning. Nothing is queued for listeners that subscribe later.
//!
//! Every registration hands back a [`Subscription`]; passing it to
//! [`ThemeEvents::unsubscribe`] removes the listener. Subscriptions are not
//! `Clone`, so a listener cannot be removed twice by accident.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::theme::Theme;

/// Why the active theme changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// The user chose a theme (set, toggle, shortcut).
    Explicit,
    /// The active theme followed the platform preference.
    System,
}

/// Payload of a theme-changed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChanged {
    pub theme: Theme,
    pub cause: ChangeCause,
}

/// Handle identifying one registered listener.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a Subscription leaves the listener registered with no way to remove it"]
pub struct Subscription(u64);

impl Subscription {
    pub fn id(&self) -> u64 {
        self.0
    }
}

type Listener = Box<dyn FnMut(&ThemeChanged) + Send>;

// Ids are unique across every registry in the process, so a handle from one
// registry never matches a listener in another.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(0);

/// Registry of theme-change listeners.
#[derive(Default)]
pub struct ThemeEvents {
    listeners: Vec<(u64, Listener)>,
}

impl ThemeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` and returns its handle.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&ThemeChanged) + Send + 'static,
    {
        let id = NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed);
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    /// Removes the listener behind `subscription`.
    ///
    /// Returns `false` if it belonged to a different registry.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    /// Calls every listener with `event`.
    pub fn emit(&mut self, event: &ThemeChanged) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ThemeEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeEvents")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
