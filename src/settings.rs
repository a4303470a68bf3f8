use crate::commands::{have_command, run_command, CommandResult};
use anyhow::{bail, Result};

/// Desktop-wide preference that follows the active theme.
///
/// Calls are best-effort: callers log failures and carry on.
pub trait SettingsNotifier {
    fn set_theme(&self, name: &str) -> Result<()>;
    fn reset_theme(&self) -> Result<()>;
}

/// `gsettings` backed notifier.
#[derive(Debug, Clone)]
pub struct GSettings {
    schema: String,
    key: String,
}

impl GSettings {
    pub fn new(schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            key: key.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<CommandResult> {
        if !have_command("gsettings") {
            bail!("gsettings not found in PATH");
        }
        let result = run_command("gsettings", args)?;
        if !result.success() {
            bail!(
                "gsettings {} exited with {}: {}",
                args.join(" "),
                result.exit_code,
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    /// Theme the desktop currently reports, if any
    pub fn current_theme(&self) -> Option<String> {
        let result = self.run(&["get", &self.schema, &self.key]).ok()?;
        parse_gsettings_string(&result.stdout)
    }
}

impl SettingsNotifier for GSettings {
    fn set_theme(&self, name: &str) -> Result<()> {
        self.run(&["set", &self.schema, &self.key, name])?;
        Ok(())
    }

    fn reset_theme(&self) -> Result<()> {
        self.run(&["reset", &self.schema, &self.key])?;
        Ok(())
    }
}

/// Remove quotes from gsettings output: 'Theme-Name' -> Theme-Name
fn parse_gsettings_string(output: &str) -> Option<String> {
    let value = output.trim().trim_matches('\'');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gsettings_string() {
        assert_eq!(
            parse_gsettings_string("'Adwaita-dark'\n"),
            Some("Adwaita-dark".to_string())
        );
        assert_eq!(parse_gsettings_string("''\n"), None);
        assert_eq!(parse_gsettings_string(""), None);
    }

    #[test]
    fn test_current_theme_does_not_panic() {
        // Depends on whether gsettings is installed; only checks it returns
        let settings = GSettings::new("org.gnome.desktop.interface", "gtk-theme");
        let _ = settings.current_theme();
    }
}
