//! Configuration for the theme manager.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! produces the stock portfolio behaviour:
//!
//! ```yaml
//! storage_key: portfolio-theme
//! light_value: light
//! dark_value: dark
//! default_theme: dark
//! chrome_colors:
//!   light: "#ffffff"
//!   dark: "#1a1a2e"
//! transition_ms: 300
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::Theme;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-theme";

/// Browser-chrome accent colour per theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeColors {
    pub light: String,
    pub dark: String,
}

impl Default for ChromeColors {
    fn default() -> Self {
        Self {
            light: "#ffffff".to_string(),
            dark: "#1a1a2e".to_string(),
        }
    }
}

/// Options passed to [`ThemeManager::new`](crate::ThemeManager::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOptions {
    /// Durable storage key holding the explicit preference.
    pub storage_key: String,
    /// External spelling of [`Theme::Light`] in storage and on the document.
    pub light_value: String,
    /// External spelling of [`Theme::Dark`] in storage and on the document.
    pub dark_value: String,
    /// Used when there is neither an explicit nor a system preference.
    pub default_theme: Theme,
    pub chrome_colors: ChromeColors,
    /// Length of the colour transition window after a change.
    pub transition_ms: u64,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            light_value: "light".to_string(),
            dark_value: "dark".to_string(),
            default_theme: Theme::Dark,
            chrome_colors: ChromeColors::default(),
            transition_ms: 300,
        }
    }
}

impl ThemeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_values(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.light_value = light.into();
        self.dark_value = dark.into();
        self
    }

    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    /// Parses options from YAML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] when the two theme values are empty or equal.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let options: ThemeOptions = if yaml.trim().is_empty() {
            ThemeOptions::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Checks that the external values can be told apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.light_value.is_empty() || self.dark_value.is_empty() {
            return Err(ConfigError::Invalid(
                "light_value and dark_value must not be empty".to_string(),
            ));
        }
        if self.light_value == self.dark_value {
            return Err(ConfigError::Invalid(format!(
                "light_value and dark_value are both '{}'",
                self.light_value
            )));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// External string for `theme`.
    pub fn value_of(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light_value,
            Theme::Dark => &self.dark_value,
        }
    }

    /// Maps an external string back to a theme.
    ///
    /// Anything other than the two configured values yields `None`, which
    /// callers treat as "no preference".
    pub fn parse(&self, value: &str) -> Option<Theme> {
        if value == self.light_value {
            Some(Theme::Light)
        } else if value == self.dark_value {
            Some(Theme::Dark)
        } else {
            None
        }
    }

    pub fn chrome_color(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.chrome_colors.light,
            Theme::Dark => &self.chrome_colors.dark,
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
