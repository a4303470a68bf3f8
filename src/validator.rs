use crate::error::DiagnosticKind;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

/// GTK generation a theme ships styles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFamily {
    Gtk3,
    Gtk4,
}

impl AssetFamily {
    /// Link and teardown order.
    pub const ALL: [AssetFamily; 2] = [AssetFamily::Gtk4, AssetFamily::Gtk3];

    /// Directory name, both inside a theme and under the config root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Gtk3 => "gtk-3.0",
            Self::Gtk4 => "gtk-4.0",
        }
    }

    pub fn required_assets(self) -> &'static [&'static str] {
        match self {
            Self::Gtk3 => &["gtk-3.0/gtk.css", "gtk-3.0/gtk-dark.css"],
            Self::Gtk4 => &["gtk-4.0/gtk.css", "gtk-4.0/gtk-dark.css"],
        }
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// All required relative asset paths across every family.
pub fn required_assets() -> Vec<&'static str> {
    AssetFamily::ALL
        .iter()
        .flat_map(|family| family.required_assets().iter().copied())
        .collect()
}

fn fuzzy_contains(path: &Path, needles: &[&str]) -> bool {
    let path = path.to_string_lossy();
    needles.iter().any(|needle| path.contains(needle))
}

/// Decide whether `dir` looks like a complete GTK theme.
///
/// Every entry of the tree whose path contains one of the required asset
/// paths as a substring counts once; the theme is valid when the count
/// reaches the number of required assets. This is a heuristic: a stray
/// `gtk.css.bak` counts too and can hide a genuinely missing asset.
/// A symlinked `dir` is not descended into.
pub fn is_valid_theme(dir: &Path) -> bool {
    let required = required_assets();
    let count = count_matches(WalkDir::new(dir).follow_root_links(false), &required);

    tracing::debug!(
        "{}: {} of {} required assets matched",
        dir.display(),
        count,
        required.len()
    );
    count >= required.len()
}

/// Count walked entries matching `required`. Unreadable entries are logged,
/// still counted by their path, and the walk goes on.
fn count_matches(walker: WalkDir, required: &[&str]) -> usize {
    let mut count = 0usize;

    for entry in walker {
        let path = match entry {
            Ok(entry) => entry.into_path(),
            Err(err) => {
                let Some(path) = err.path().map(Path::to_path_buf) else {
                    tracing::warn!(kind = %DiagnosticKind::ValidationWalk, "{}", err);
                    continue;
                };
                tracing::warn!(
                    kind = %DiagnosticKind::ValidationWalk,
                    "unable to access {}: {}",
                    path.display(),
                    err
                );
                path
            }
        };

        if fuzzy_contains(&path, required) {
            count += 1;
        }
    }
    count
}
