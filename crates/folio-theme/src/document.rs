//! The rendered side of a theme.
//!
//! Applying a theme writes one attribute on the document root
//! ([`THEME_ATTRIBUTE`]), which stylesheets key off, and refreshes a few
//! derived bits of presentation: the toggle control's label and visible icon
//! and the browser-chrome accent colour. All of these are computed by
//! [`Presentation::for_theme`] as a pure function of the theme, which is what
//! makes [`ThemeManager::apply`](crate::ThemeManager::apply) idempotent.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::options::ThemeOptions;
use crate::theme::Theme;

/// Root attribute carrying the active theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Meta entry carrying the browser-chrome colour.
pub const THEME_COLOR_META: &str = "theme-color";

/// Which icon the toggle control shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleIcon {
    /// Shown in dark mode: clicking switches to light.
    Sun,
    /// Shown in light mode: clicking switches to dark.
    Moon,
}

/// Label and icon of the theme toggle control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    pub label: &'static str,
    pub icon: ToggleIcon,
}

impl ToggleState {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                label: "Switch to light mode",
                icon: ToggleIcon::Sun,
            },
            Theme::Light => Self {
                label: "Switch to dark mode",
                icon: ToggleIcon::Moon,
            },
        }
    }
}

/// Everything a document shows for a given theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub attribute_value: String,
    pub chrome_color: String,
    pub toggle: ToggleState,
}

impl Presentation {
    pub fn for_theme(theme: Theme, options: &ThemeOptions) -> Self {
        Self {
            attribute_value: options.value_of(theme).to_string(),
            chrome_color: options.chrome_color(theme).to_string(),
            toggle: ToggleState::for_theme(theme),
        }
    }

    /// Writes this presentation onto `document`.
    pub fn render<D: Document + ?Sized>(&self, document: &mut D) {
        document.set_root_attribute(THEME_ATTRIBUTE, &self.attribute_value);
        document.set_meta(THEME_COLOR_META, &self.chrome_color);
        document.set_toggle(&self.toggle);
    }
}

/// A rendered document the theme is applied to.
pub trait Document: Send {
    fn set_root_attribute(&mut self, name: &str, value: &str);

    fn root_attribute(&self, name: &str) -> Option<String>;

    /// Creates the meta entry if it does not exist yet.
    fn set_meta(&mut self, name: &str, content: &str);

    fn set_toggle(&mut self, toggle: &ToggleState);

    /// Sets an inline style property (such as `--accent`) on the root element.
    fn set_style_property(&mut self, name: &str, value: &str);

    /// Clears an inline style property. Clearing an unset property does nothing.
    fn remove_style_property(&mut self, name: &str);
}

impl<T: Document + ?Sized> Document for &mut T {
    fn set_root_attribute(&mut self, name: &str, value: &str) {
        (**self).set_root_attribute(name, value)
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        (**self).root_attribute(name)
    }

    fn set_meta(&mut self, name: &str, content: &str) {
        (**self).set_meta(name, content)
    }

    fn set_toggle(&mut self, toggle: &ToggleState) {
        (**self).set_toggle(toggle)
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        (**self).set_style_property(name, value)
    }

    fn remove_style_property(&mut self, name: &str) {
        (**self).remove_style_property(name)
    }
}

/// An in-memory document.
///
/// Hosts without a real DOM (the CLI, tests) render into this and inspect or
/// serialize the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryDocument {
    root_attributes: BTreeMap<String, String>,
    meta: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    toggle: Option<ToggleState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current [`THEME_ATTRIBUTE`] value.
    pub fn theme_attribute(&self) -> Option<&str> {
        self.root_attributes.get(THEME_ATTRIBUTE).map(String::as_str)
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    pub fn style_properties(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    pub fn toggle(&self) -> Option<&ToggleState> {
        self.toggle.as_ref()
    }
}

impl Document for MemoryDocument {
    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.get(name).cloned()
    }

    fn set_meta(&mut self, name: &str, content: &str) {
        self.meta.insert(name.to_string(), content.to_string());
    }

    fn set_toggle(&mut self, toggle: &ToggleState) {
        self.toggle = Some(toggle.clone());
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.insert(name.to_string(), value.to_string());
    }

    fn remove_style_property(&mut self, name: &str) {
        self.style.remove(name);
    }
}
