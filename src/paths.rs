use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::path::PathBuf;

static HOME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{HOME\}|\$HOME").expect("valid home token regex"));

/// Substitutes the home directory into path templates (`$HOME/.themes`).
#[derive(Debug, Clone)]
pub struct PathExpander {
    home: String,
}

impl PathExpander {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }

    /// Use the `HOME` of the running user. An unset `HOME` expands to an
    /// empty string, same as the shell would.
    pub fn from_env() -> Self {
        Self::new(std::env::var("HOME").unwrap_or_default())
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// Replace every home token in `template`. No existence check.
    pub fn expand(&self, template: &str) -> PathBuf {
        PathBuf::from(
            HOME_TOKEN
                .replace_all(template, NoExpand(&self.home))
                .into_owned(),
        )
    }
}
