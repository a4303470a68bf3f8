use crate::error::DiagnosticKind;
use crate::paths::PathExpander;
use crate::validator::is_valid_theme;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Valid themes found under the search roots.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    roots: Vec<PathBuf>,
    root_index: HashMap<String, usize>,
    names: Vec<String>,
    sentinel: String,
}

impl ThemeCatalog {
    /// Scan `templates` in order and build the catalog.
    ///
    /// A name found under several roots is listed once; its source root is
    /// the last root that contained it. Names are sorted and `sentinel` is
    /// always appended last.
    pub fn discover(templates: &[String], expander: &PathExpander, sentinel: &str) -> Self {
        let roots: Vec<PathBuf> = templates.iter().map(|t| expander.expand(t)).collect();

        let per_root: Vec<Vec<String>> = roots
            .iter()
            .map(|root| list_valid_themes(root, sentinel))
            .collect();

        let mut root_index = HashMap::new();
        for (index, themes) in per_root.into_iter().enumerate() {
            for name in themes {
                root_index.insert(name, index);
            }
        }

        let mut names: Vec<String> = root_index.keys().cloned().collect();
        names.sort();
        names.push(sentinel.to_string());

        tracing::debug!("discovered {} themes", names.len() - 1);

        Self {
            roots,
            root_index,
            names,
            sentinel: sentinel.to_string(),
        }
    }

    /// Sorted theme names, sentinel last.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn is_sentinel(&self, name: &str) -> bool {
        name == self.sentinel
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn root_index(&self, name: &str) -> Option<usize> {
        self.root_index.get(name).copied()
    }

    /// Directory holding the theme, e.g. `~/.themes/Nordic`.
    pub fn source_dir(&self, name: &str) -> Option<PathBuf> {
        let index = self.root_index(name)?;
        Some(self.roots[index].join(name))
    }
}

/// Child directories of `root` that pass validation. An unreadable root
/// yields nothing.
fn list_valid_themes(root: &Path, sentinel: &str) -> Vec<String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(
                kind = %DiagnosticKind::Discovery,
                "skipping {}: {}",
                root.display(),
                err
            );
            return Vec::new();
        }
    };

    let mut themes = Vec::new();
    for entry in entries.flatten() {
        // symlinked entries are not themes, even when they point at one
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {}
            _ => continue,
        }
        let path = entry.path();

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!("skipping theme with non UTF-8 name: {:?}", raw);
                continue;
            }
        };

        if name == sentinel {
            tracing::warn!("{} shadows the empty theme, ignoring", path.display());
            continue;
        }

        if is_valid_theme(&path) {
            themes.push(name);
        }
    }
    themes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::tests::{make_theme, FULL_THEME};
    use tempfile::TempDir;

    const EMPTY: &str = "Adwaita-empty";

    fn templates(roots: &[&Path]) -> Vec<String> {
        roots
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discover_sorted_with_sentinel_last() {
        let root = TempDir::new().unwrap();
        make_theme(root.path(), "Nordic", FULL_THEME);
        make_theme(root.path(), "Adwaita-dark", FULL_THEME);
        make_theme(root.path(), "Broken", &["gtk-3.0/gtk.css"]);

        let catalog = ThemeCatalog::discover(
            &templates(&[root.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &["Adwaita-dark", "Nordic", EMPTY]);
        assert!(!catalog.contains("Broken"));
    }

    #[test]
    fn test_sentinel_last_even_when_it_sorts_first() {
        let root = TempDir::new().unwrap();
        make_theme(root.path(), "Zephyr", FULL_THEME);

        let catalog = ThemeCatalog::discover(
            &templates(&[root.path()]),
            &PathExpander::new("/nonexistent"),
            "AAA-none",
        );

        assert_eq!(catalog.names(), &["Zephyr", "AAA-none"]);
        assert_eq!(catalog.names().last().map(String::as_str), Some("AAA-none"));
    }

    #[test]
    fn test_no_duplicates_across_roots() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let third = TempDir::new().unwrap();
        make_theme(first.path(), "Nordic", FULL_THEME);
        make_theme(first.path(), "Arc", FULL_THEME);
        make_theme(second.path(), "Dracula", FULL_THEME);
        make_theme(third.path(), "Nordic", FULL_THEME);

        let catalog = ThemeCatalog::discover(
            &templates(&[first.path(), second.path(), third.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &["Arc", "Dracula", "Nordic", EMPTY]);
    }

    #[test]
    fn test_later_root_wins_index() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let third = TempDir::new().unwrap();
        make_theme(first.path(), "Nordic", FULL_THEME);
        make_theme(second.path(), "Arc", FULL_THEME);
        make_theme(third.path(), "Nordic", FULL_THEME);

        let catalog = ThemeCatalog::discover(
            &templates(&[first.path(), second.path(), third.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.root_index("Nordic"), Some(2));
        assert_eq!(catalog.root_index("Arc"), Some(1));
        assert_eq!(
            catalog.source_dir("Nordic"),
            Some(third.path().join("Nordic"))
        );
        assert_eq!(catalog.root_index(EMPTY), None);
    }

    #[test]
    fn test_missing_root_is_skipped() {
        let root = TempDir::new().unwrap();
        make_theme(root.path(), "Nordic", FULL_THEME);
        let missing = root.path().join("nope");

        let catalog = ThemeCatalog::discover(
            &templates(&[missing.as_path(), root.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &["Nordic", EMPTY]);
        // index refers to the declared root, not the position among readable ones
        assert_eq!(catalog.root_index("Nordic"), Some(1));
    }

    #[test]
    fn test_home_templates_are_expanded() {
        let home = TempDir::new().unwrap();
        make_theme(&home.path().join(".themes"), "Nordic", FULL_THEME);

        let catalog = ThemeCatalog::discover(
            &["$HOME/.themes".to_string()],
            &PathExpander::new(home.path().to_string_lossy()),
            EMPTY,
        );

        assert_eq!(
            catalog.source_dir("Nordic"),
            Some(home.path().join(".themes").join("Nordic"))
        );
    }

    #[test]
    fn test_directory_named_like_sentinel_is_not_duplicated() {
        let root = TempDir::new().unwrap();
        make_theme(root.path(), EMPTY, FULL_THEME);
        make_theme(root.path(), "Nordic", FULL_THEME);

        let catalog = ThemeCatalog::discover(
            &templates(&[root.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &["Nordic", EMPTY]);
    }

    #[test]
    fn test_symlinked_theme_dir_is_excluded() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        make_theme(elsewhere.path(), "Nordic", FULL_THEME);
        std::os::unix::fs::symlink(elsewhere.path().join("Nordic"), root.path().join("Linked"))
            .unwrap();

        let catalog = ThemeCatalog::discover(
            &templates(&[root.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &[EMPTY]);
        assert!(!catalog.contains("Linked"));
    }

    #[test]
    fn test_plain_files_are_ignored() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("README"), "gtk-3.0/gtk.css").unwrap();

        let catalog = ThemeCatalog::discover(
            &templates(&[root.path()]),
            &PathExpander::new("/nonexistent"),
            EMPTY,
        );

        assert_eq!(catalog.names(), &[EMPTY]);
    }
}
