mod activation;
mod catalog;
mod commands;
mod config;
mod error;
mod paths;
mod prompt;
mod settings;
mod store;
mod validator;

use activation::ActivationEngine;
use anyhow::{bail, Context, Result};
use catalog::ThemeCatalog;
use clap::{Parser, Subcommand};
use error::ThemeError;
use paths::PathExpander;
use settings::{GSettings, SettingsNotifier};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use store::ActiveThemeStore;
use tracing_subscriber::EnvFilter;

const FIRST_RUN_WARNING: &str = "
**WARNING**
====================
This method of changing themes is at best a hack and is not supported by the GNOME
developer community. The GNOME Foundation (and for that matter, anyone besides you)
is not responsible for fixing any theming issues that may arise from using this tool.
";

#[derive(Parser)]
#[command(name = config::APP_NAME)]
#[command(about = "Change your GNOME theme")]
#[command(after_help = "If run without a command, a prompt is shown to select a theme.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Accept the first-run warning without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Log every step to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available themes
    #[command(name = "list-themes", visible_alias = "l")]
    ListThemes,

    /// Print the current theme
    #[command(visible_alias = "c")]
    Current {
        /// Ask gsettings instead of reading the marker file
        #[arg(long)]
        system: bool,
    },

    /// Set the current theme
    #[command(visible_alias = "s")]
    Set {
        /// Theme name as printed by list-themes
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {:#}", config::APP_NAME, err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let expander = PathExpander::from_env();
    let app_dir = config::get_app_dir(expander.home());
    let config_file = cli
        .config
        .unwrap_or_else(|| app_dir.join("config.json"));
    let config = config::load_config(&config_file)?;

    first_run(&app_dir, cli.yes)?;

    let catalog = ThemeCatalog::discover(&config.theme_paths, &expander, &config.empty_theme);
    let config_root = expander.expand(&config.config_path);
    let settings = GSettings::new(&config.gsettings_schema, &config.gsettings_key);
    let engine = ActivationEngine::new(
        config_root.clone(),
        ActiveThemeStore::new(config_root.join(&config.marker_file)),
        settings.clone(),
    );

    match cli.command {
        Some(Commands::ListThemes) => {
            for name in catalog.names() {
                println!("{}", name);
            }
        }
        Some(Commands::Current { system }) => {
            if system {
                println!("{}", settings.current_theme().unwrap_or_default());
            } else {
                println!("{}", engine.store().read());
            }
        }
        Some(Commands::Set { name }) => apply(&engine, &name, &catalog)?,
        None => interactive(&engine, &catalog)?,
    }

    Ok(())
}

/// Show the unsupported-hack warning once per user.
fn first_run(app_dir: &Path, assume_yes: bool) -> Result<()> {
    let cookie = app_dir.join("accepted");
    if cookie.exists() {
        return Ok(());
    }

    println!("{}", FIRST_RUN_WARNING);
    let accepted = assume_yes
        || prompt::confirm(&mut io::stdin().lock(), &mut io::stdout(), "Do you want to continue")
            .unwrap_or(false);
    if !accepted {
        bail!("warning not accepted");
    }

    std::fs::create_dir_all(app_dir)
        .with_context(|| format!("unable to create {}", app_dir.display()))?;
    std::fs::write(&cookie, "Yes")
        .with_context(|| format!("unable to write {}", cookie.display()))?;
    Ok(())
}

fn apply<N: SettingsNotifier>(
    engine: &ActivationEngine<N>,
    name: &str,
    catalog: &ThemeCatalog,
) -> Result<(), ThemeError> {
    let report = engine.activate(name, catalog)?;
    if !report.is_clean() {
        for problem in report.problems() {
            eprintln!(
                "{}: [{}] unable to {}: {}",
                config::APP_NAME,
                problem.kind,
                problem.action,
                problem.message
            );
        }
    }
    Ok(())
}

/// Pick a theme, preview it and offer to go back to the previous one.
fn interactive<N: SettingsNotifier>(
    engine: &ActivationEngine<N>,
    catalog: &ThemeCatalog,
) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let choice = match prompt::select(&mut input, &mut output, "Select theme", catalog.names()) {
        Ok(Some(choice)) => choice,
        Ok(None) => return Ok(()),
        Err(err) => {
            // Assume the prompt was closed on purpose
            tracing::debug!("selection aborted: {}", err);
            return Ok(());
        }
    };

    let previous = engine.store().read();
    apply(engine, &choice, catalog)?;
    println!("Previewing {} theme", choice);

    let keep = prompt::confirm(&mut input, &mut output, "Do you want to keep the changes");
    if matches!(keep, Ok(true)) {
        return Ok(());
    }

    let previous = revert_target(&previous, catalog);
    apply(engine, previous, catalog)?;
    println!("Restored {} theme", previous);
    Ok(())
}

/// Theme to go back to after a rejected preview. The marker may have been
/// edited by hand, so trailing whitespace is ignored; anything not
/// installed falls back to the empty theme.
fn revert_target<'a>(previous: &'a str, catalog: &'a ThemeCatalog) -> &'a str {
    let previous = previous.trim_end();
    if catalog.contains(previous) {
        previous
    } else {
        tracing::warn!("previous theme '{}' is not installed, resetting", previous);
        catalog.sentinel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::tests::{make_theme, FULL_THEME};
    use tempfile::TempDir;

    fn catalog_with_nordic(root: &Path) -> ThemeCatalog {
        make_theme(root, "Nordic", FULL_THEME);
        ThemeCatalog::discover(
            &[root.to_string_lossy().into_owned()],
            &PathExpander::new("/nonexistent"),
            "Adwaita-empty",
        )
    }

    #[test]
    fn test_revert_target_ignores_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog_with_nordic(tmp.path());

        assert_eq!(revert_target("Nordic\n", &catalog), "Nordic");
        assert_eq!(revert_target("Nordic", &catalog), "Nordic");
    }

    #[test]
    fn test_revert_target_falls_back_to_empty_theme() {
        let tmp = TempDir::new().unwrap();
        let catalog = catalog_with_nordic(tmp.path());

        assert_eq!(revert_target("", &catalog), "Adwaita-empty");
        assert_eq!(revert_target("Removed", &catalog), "Adwaita-empty");
        assert_eq!(revert_target("Adwaita-empty\n", &catalog), "Adwaita-empty");
    }
}
