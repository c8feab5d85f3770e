//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_theme::{SystemPreference, Theme};

/// Portfolio theme and contact form tool
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Manage the portfolio theme preference and validate contact messages")]
pub struct Cli {
    /// Preference storage file
    #[arg(
        long,
        global = true,
        env = "FOLIO_STORAGE",
        default_value = ".folio/preferences.json"
    )]
    pub storage: PathBuf,

    /// Theme options (YAML)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the detected system colour scheme
    #[arg(long, global = true, value_enum, env = "FOLIO_SYSTEM_SCHEME")]
    pub system: Option<SchemeArg>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or change the theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Validate and send a contact message
    Contact(ContactArgs),

    /// Rate a password
    Password {
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the active theme and where it came from
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Save an explicit theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },

    /// Switch to the other theme and save it
    Toggle,

    /// Forget the saved theme and follow the system preference
    FollowSystem,

    /// Follow system colour-scheme changes until interrupted
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Stop after this many polls
        #[arg(long)]
        count: Option<u64>,
    },

    /// Keyboard session: t toggles, l/d pick a theme, s follows the system, q quits
    Interactive,

    /// Manage custom palettes
    #[command(subcommand)]
    Custom(CustomCommand),
}

#[derive(Debug, Subcommand)]
pub enum CustomCommand {
    /// List saved palettes
    List,

    /// Create or replace a palette from KEY=VALUE pairs
    Create {
        name: String,
        #[arg(required = true, value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },

    /// Show the properties a palette sets on the document
    Apply { name: String },

    /// Delete a palette
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub message: String,

    /// Simulated delivery delay in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Light,
    Dark,
    None,
}

impl From<SchemeArg> for SystemPreference {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Light => SystemPreference::Light,
            SchemeArg::Dark => SystemPreference::Dark,
            SchemeArg::None => SystemPreference::NoPreference,
        }
    }
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty property name in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_theme_set() {
        let cli = Cli::try_parse_from(["folio", "theme", "set", "light"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme(ThemeCommand::Set {
                theme: ThemeArg::Light
            })
        ));
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "folio", "theme", "show", "--system", "none", "-vv", "--storage", "/tmp/p.json",
        ])
        .unwrap();
        assert_eq!(cli.system, Some(SchemeArg::None));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.storage, PathBuf::from("/tmp/p.json"));
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["folio", "theme", "set", "sepia"]).is_err());
    }

    #[test]
    fn parse_property_pairs() {
        assert_eq!(
            parse_property("accent = #ff0000"),
            Ok(("accent".to_string(), "#ff0000".to_string()))
        );
        assert!(parse_property("accent").is_err());
        assert!(parse_property("=x").is_err());
    }
}
