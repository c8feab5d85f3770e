//! Theme commands.
//!
//! [`App`] owns one [`ThemeManager`] for the lifetime of the process, along
//! with the palette store and the colour transition. Every command goes
//! through `&mut self`, so there is a single writer for the theme state.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use console::{style, Key, Term};
use folio_theme::{
    ColorSchemeProbe, ColorTransition, Document, MemoryDocument, PreferenceStorage,
    SchemeWatcher, Subscription, Theme, ThemeCustomizer, ThemeManager, ThemeOptions,
    ToggleState,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::{CustomCommand, ThemeCommand};
use crate::keys::{action_for_key, Action, HELP};

const TRANSITION_PROPERTY: &str = "transition";

pub struct App<S, P: ColorSchemeProbe> {
    manager: ThemeManager<S, P, MemoryDocument>,
    customizer: ThemeCustomizer<S>,
    watcher: SchemeWatcher<P>,
    transition: ColorTransition,
    _transition_hook: Subscription,
}

/// `theme show --json` payload.
#[derive(Debug, Serialize)]
struct ThemeReport<'a> {
    theme: Theme,
    source: String,
    saved: Option<Theme>,
    following_system: bool,
    toggle: ToggleState,
    document: &'a MemoryDocument,
}

impl<S, P> App<S, P>
where
    S: PreferenceStorage + Clone,
    P: ColorSchemeProbe + Clone,
{
    /// Builds the manager and runs the startup resolution.
    ///
    /// The system watcher takes its baseline here, so a scheme change that
    /// happens before `watch` starts is still reported on the first poll.
    pub fn new(options: ThemeOptions, storage: S, probe: P) -> Self {
        let transition = ColorTransition::new(options.transition());
        let customizer = ThemeCustomizer::new(storage.clone());
        let watcher = SchemeWatcher::new(probe.clone());
        let mut manager = ThemeManager::new(options, storage, probe, MemoryDocument::new());
        let hook = transition.attach(&mut manager);
        manager.initialize();

        Self {
            manager,
            customizer,
            watcher,
            transition,
            _transition_hook: hook,
        }
    }

    pub fn manager(&self) -> &ThemeManager<S, P, MemoryDocument> {
        &self.manager
    }

    pub fn run(&mut self, command: ThemeCommand, out: &mut dyn Write) -> Result<()> {
        self.sync_transition();
        match command {
            ThemeCommand::Show { json } => self.show(json, out),
            ThemeCommand::Set { theme } => {
                self.manager.set_theme(theme.into());
                self.changed(out)
            }
            ThemeCommand::Toggle => {
                self.manager.toggle_theme();
                self.changed(out)
            }
            ThemeCommand::FollowSystem => {
                self.manager.follow_system();
                self.changed(out)
            }
            ThemeCommand::Watch { interval_ms, count } => {
                self.watch(Duration::from_millis(interval_ms), count, out)
            }
            ThemeCommand::Interactive => {
                let term = Term::stdout();
                if !term.is_term() {
                    bail!("interactive mode needs a terminal");
                }
                let keys = std::iter::from_fn(|| term.read_key().ok());
                self.session(keys, out)
            }
            ThemeCommand::Custom(command) => self.custom(command, out),
        }
    }

    fn show(&self, json: bool, out: &mut dyn Write) -> Result<()> {
        let manager = &self.manager;
        let theme = manager.current_theme();

        if json {
            let report = ThemeReport {
                theme,
                source: manager.theme_source().to_string(),
                saved: manager.explicit_theme(),
                following_system: manager.is_listening() && manager.explicit_theme().is_none(),
                toggle: ToggleState::for_theme(theme),
                document: manager.document(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            return Ok(());
        }

        writeln!(
            out,
            "Theme:  {} ({})",
            style(theme).bold(),
            manager.theme_source()
        )?;
        writeln!(out, "Toggle: {}", ToggleState::for_theme(theme).label)?;
        writeln!(
            out,
            "Chrome: {}",
            manager.options().chrome_color(theme)
        )?;
        match manager.explicit_theme() {
            Some(saved) => writeln!(out, "Saved:  {saved}")?,
            None => writeln!(out, "Saved:  {}", style("none, following system").dim())?,
        }
        Ok(())
    }

    /// Mirrors the transition window onto the document: the property is set
    /// while the window is open and cleared once it has passed.
    fn sync_transition(&mut self) {
        let document = self.manager.document_mut();
        match self.transition.css_transition() {
            Some(css) => document.set_style_property(TRANSITION_PROPERTY, &css),
            None => document.remove_style_property(TRANSITION_PROPERTY),
        }
    }

    /// Reports a change.
    fn changed(&mut self, out: &mut dyn Write) -> Result<()> {
        self.sync_transition();
        let theme = self.manager.current_theme();
        writeln!(
            out,
            "{} {} ({})",
            style("→").cyan(),
            style(theme).bold(),
            self.manager.theme_source()
        )?;
        Ok(())
    }

    fn watch(&mut self, interval: Duration, count: Option<u64>, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "Watching the system colour scheme, active theme {}",
            style(self.manager.current_theme()).bold()
        )?;

        let mut polls = 0u64;
        loop {
            self.sync_transition();
            if let Some(theme) = self.watcher.poll() {
                if self.manager.on_system_preference_changed(theme) {
                    self.changed(out)?;
                } else {
                    writeln!(
                        out,
                        "System switched to {theme}; keeping saved {}",
                        self.manager.current_theme()
                    )?;
                }
            }
            polls += 1;
            if count.is_some_and(|limit| polls >= limit) {
                break;
            }
            thread::sleep(interval);
        }
        debug!(polls, "watch finished");
        Ok(())
    }

    /// Keyboard loop. Ends on quit or when `keys` runs dry.
    pub fn session<I>(&mut self, keys: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = Key>,
    {
        writeln!(out, "{}", style(HELP).dim())?;
        self.show(false, out)?;

        for key in keys {
            self.sync_transition();
            let Some(action) = action_for_key(&key) else {
                continue;
            };
            match action {
                Action::Toggle => {
                    self.manager.toggle_theme();
                }
                Action::Light => self.manager.enable_light_mode(),
                Action::Dark => self.manager.enable_dark_mode(),
                Action::FollowSystem => {
                    self.manager.follow_system();
                }
                Action::Quit => break,
            }
            self.changed(out)?;
        }
        Ok(())
    }

    fn custom(&mut self, command: CustomCommand, out: &mut dyn Write) -> Result<()> {
        match command {
            CustomCommand::List => {
                if self.customizer.themes().is_empty() {
                    writeln!(out, "No custom themes")?;
                }
                for (name, palette) in self.customizer.themes() {
                    writeln!(out, "{} ({} properties)", style(name).bold(), palette.len())?;
                }
            }
            CustomCommand::Create { name, properties } => {
                self.customizer.create_theme(name.as_str(), properties);
                writeln!(out, "Saved custom theme {}", style(&name).bold())?;
            }
            CustomCommand::Apply { name } => {
                if !self
                    .customizer
                    .apply_theme(&name, self.manager.document_mut())
                {
                    bail!("no custom theme named '{name}'");
                }
                for (property, value) in self.manager.document().style_properties() {
                    if property.starts_with("--") {
                        writeln!(out, "{property}: {value};")?;
                    }
                }
            }
            CustomCommand::Delete { name } => {
                if !self.customizer.delete_theme(&name) {
                    bail!("no custom theme named '{name}'");
                }
                writeln!(out, "Deleted custom theme {name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ThemeArg;
    use folio_theme::{MemoryStorage, MockColorScheme, SystemPreference, ThemeSource};
    use std::sync::Arc;

    type TestApp = App<Arc<MemoryStorage>, MockColorScheme>;

    fn app(storage: &Arc<MemoryStorage>, probe: &MockColorScheme) -> TestApp {
        App::new(ThemeOptions::default(), Arc::clone(storage), probe.clone())
    }

    fn run(app: &mut TestApp, command: ThemeCommand) -> String {
        let mut out = Vec::new();
        app.run(command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn startup_follows_system() {
        let storage = Arc::new(MemoryStorage::new());
        let app = app(&storage, &MockColorScheme::light());
        assert_eq!(app.manager().current_theme(), Theme::Light);
        assert_eq!(app.manager().theme_source(), ThemeSource::System);
        assert!(storage.is_empty());
    }

    #[test]
    fn set_persists_across_apps() {
        let storage = Arc::new(MemoryStorage::new());
        let probe = MockColorScheme::dark();

        let mut first = app(&storage, &probe);
        run(&mut first, ThemeCommand::Set { theme: ThemeArg::Light });

        let second = app(&storage, &probe);
        assert_eq!(second.manager().current_theme(), Theme::Light);
        assert_eq!(second.manager().theme_source(), ThemeSource::Stored);
    }

    #[test]
    fn toggle_sets_transition_property() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app(&storage, &MockColorScheme::dark());
        let out = run(&mut app, ThemeCommand::Toggle);

        assert!(out.contains("light"));
        assert_eq!(
            app.manager().document().style_property("transition"),
            Some("background-color 300ms ease, color 300ms ease")
        );
    }

    #[test]
    fn transition_property_cleared_after_window() {
        let storage = Arc::new(MemoryStorage::new());
        let options = ThemeOptions {
            transition_ms: 20,
            ..ThemeOptions::default()
        };
        let mut app = App::new(options, storage, MockColorScheme::dark());

        run(&mut app, ThemeCommand::Toggle);
        assert_eq!(
            app.manager().document().style_property("transition"),
            Some("background-color 20ms ease, color 20ms ease")
        );

        std::thread::sleep(Duration::from_millis(80));
        let out = run(&mut app, ThemeCommand::Show { json: true });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["document"]["style"]["transition"], serde_json::Value::Null);
        assert_eq!(app.manager().document().style_property("transition"), None);
    }

    #[test]
    fn show_json_reports_document() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app(&storage, &MockColorScheme::unsupported());
        let out = run(&mut app, ThemeCommand::Show { json: true });

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["source"], "default");
        assert_eq!(value["saved"], serde_json::Value::Null);
        assert_eq!(value["following_system"], true);
        assert_eq!(value["toggle"]["label"], "Switch to light mode");
    }

    #[test]
    fn watch_follows_change_without_saving() {
        let storage = Arc::new(MemoryStorage::new());
        let probe = MockColorScheme::dark();
        let mut app = app(&storage, &probe);

        probe.set(SystemPreference::Light);
        run(
            &mut app,
            ThemeCommand::Watch {
                interval_ms: 0,
                count: Some(1),
            },
        );

        assert_eq!(app.manager().current_theme(), Theme::Light);
        assert!(storage.is_empty());
    }

    #[test]
    fn watch_keeps_saved_choice() {
        let storage = Arc::new(MemoryStorage::with_entry("portfolio-theme", "dark"));
        let probe = MockColorScheme::dark();
        let mut app = app(&storage, &probe);

        probe.set(SystemPreference::Light);
        let out = run(
            &mut app,
            ThemeCommand::Watch {
                interval_ms: 0,
                count: Some(1),
            },
        );

        assert!(out.contains("keeping saved dark"));
        assert_eq!(app.manager().current_theme(), Theme::Dark);
    }

    #[test]
    fn session_runs_keys_until_quit() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app(&storage, &MockColorScheme::dark());
        let keys = [
            Key::Char('t'),
            Key::Char('x'),
            Key::Char('s'),
            Key::Char('q'),
            Key::Char('l'),
        ];

        let mut out = Vec::new();
        app.session(keys, &mut out).unwrap();

        // 't' saved light, 's' cleared it, 'l' came after quit
        assert_eq!(app.manager().current_theme(), Theme::Dark);
        assert_eq!(app.manager().explicit_theme(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn custom_palettes_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let probe = MockColorScheme::dark();
        let mut first = app(&storage, &probe);
        run(
            &mut first,
            ThemeCommand::Custom(CustomCommand::Create {
                name: "ocean".to_string(),
                properties: vec![("accent".to_string(), "#0077be".to_string())],
            }),
        );

        let mut second = app(&storage, &probe);
        let out = run(
            &mut second,
            ThemeCommand::Custom(CustomCommand::Apply {
                name: "ocean".to_string(),
            }),
        );
        assert_eq!(out.trim(), "--accent: #0077be;");
    }

    #[test]
    fn unknown_palette_is_an_error() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app(&storage, &MockColorScheme::dark());
        let mut out = Vec::new();
        let err = app
            .run(
                ThemeCommand::Custom(CustomCommand::Delete {
                    name: "nope".to_string(),
                }),
                &mut out,
            )
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
