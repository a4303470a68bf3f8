use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an operation. Everything else is logged and recorded
/// as a [`DiagnosticKind`] so the caller can keep going.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Not a valid theme name: {name}")]
    InvalidTheme { name: String },

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Non-fatal problem categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A search root could not be listed.
    Discovery,
    /// Part of a candidate theme could not be walked.
    ValidationWalk,
    /// A symlink, mkdir, remove or marker write failed during activation.
    FilesystemMutation,
    /// The desktop settings call failed.
    ExternalNotification,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovery => "discovery",
            Self::ValidationWalk => "validation",
            Self::FilesystemMutation => "filesystem",
            Self::ExternalNotification => "notification",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_theme_message() {
        let err = ThemeError::InvalidTheme {
            name: "Nope".to_string(),
        };
        assert_eq!(err.to_string(), "Not a valid theme name: Nope");
    }

    #[test]
    fn test_diagnostic_kind_display() {
        assert_eq!(DiagnosticKind::FilesystemMutation.to_string(), "filesystem");
        assert_eq!(DiagnosticKind::ExternalNotification.to_string(), "notification");
    }
}
