mod app;
mod cli;
mod form;
mod keys;
mod logging;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use folio_theme::{
    ColorSchemeProbe, FileStorage, MockColorScheme, OsColorScheme, ThemeOptions,
};
use tracing::debug;

use app::App;
use cli::{Cli, Command, SchemeArg};

fn load_options(path: Option<&Path>) -> Result<ThemeOptions> {
    let Some(path) = path else {
        return Ok(ThemeOptions::default());
    };
    let options = ThemeOptions::from_file(path)
        .with_context(|| format!("failed to load theme options from {}", path.display()))?;
    debug!(path = %path.display(), "loaded theme options");
    Ok(options)
}

fn probe(system: Option<SchemeArg>) -> Arc<dyn ColorSchemeProbe> {
    match system {
        Some(scheme) => Arc::new(MockColorScheme::new(scheme.into())),
        None => Arc::new(OsColorScheme),
    }
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Command::Theme(command) => {
            let options = load_options(cli.config.as_deref())?;
            debug!(path = %cli.storage.display(), "using preference storage");
            let storage = Arc::new(FileStorage::new(cli.storage));
            let mut app = App::new(options, storage, probe(cli.system));
            app.run(command, out)
        }
        Command::Contact(args) => form::contact(args, out),
        Command::Password { value } => form::password(&value, out),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)?;
    out.flush()?;
    Ok(())
}
