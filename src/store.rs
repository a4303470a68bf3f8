use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

/// Single-line file remembering which theme is active.
#[derive(Debug, Clone)]
pub struct ActiveThemeStore {
    path: PathBuf,
}

impl ActiveThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current marker content. An unreadable marker is logged and reads as
    /// an empty name.
    pub fn read(&self) -> String {
        match fs::read(&self.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::warn!("unable to read {}: {}", self.path.display(), err);
                String::new()
            }
        }
    }

    /// Overwrite the marker with `name`, no trailing newline.
    pub fn write(&self, name: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(&self.path)?;
        file.write_all(name.as_bytes())
    }
}
