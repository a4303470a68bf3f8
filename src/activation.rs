use crate::catalog::ThemeCatalog;
use crate::error::{DiagnosticKind, ThemeError};
use crate::settings::SettingsNotifier;
use crate::store::ActiveThemeStore;
use crate::validator::AssetFamily;
use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

/// One step of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RemoveFamilyDir(PathBuf),
    ResetSettings,
    WriteMarker(String),
    CreateFamilyDir(PathBuf),
    ReadSourceDir(PathBuf),
    Link { source: PathBuf, dest: PathBuf },
    /// A source entry vanished; the rest of the family was not linked.
    SkipFamily { family: AssetFamily, missing: PathBuf },
    CreateAssetsDir(PathBuf),
    SetSettings(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveFamilyDir(path) => write!(f, "remove {}", path.display()),
            Self::ResetSettings => f.write_str("reset desktop theme"),
            Self::WriteMarker(name) => write!(f, "write marker {}", name),
            Self::CreateFamilyDir(path) => write!(f, "create {}", path.display()),
            Self::ReadSourceDir(path) => write!(f, "read {}", path.display()),
            Self::Link { source, dest } => {
                write!(f, "link {} -> {}", dest.display(), source.display())
            }
            Self::SkipFamily { family, missing } => {
                write!(f, "skip rest of {} at {}", family, missing.display())
            }
            Self::CreateAssetsDir(path) => write!(f, "create {}", path.display()),
            Self::SetSettings(name) => write!(f, "set desktop theme {}", name),
        }
    }
}

/// A step that did not succeed.
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub kind: DiagnosticKind,
    pub action: Action,
    pub message: String,
}

/// What a transition attempted and which steps failed.
#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    pub attempted: Vec<Action>,
    pub failures: Vec<StepFailure>,
}

impl ActivationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures worth showing to the user; desktop settings calls are
    /// best-effort and left out.
    pub fn problems(&self) -> impl Iterator<Item = &StepFailure> {
        self.failures
            .iter()
            .filter(|f| f.kind != DiagnosticKind::ExternalNotification)
    }

    fn note(&mut self, action: Action) {
        tracing::debug!("{}", action);
        self.attempted.push(action);
    }

    fn record<E: fmt::Display>(
        &mut self,
        kind: DiagnosticKind,
        action: Action,
        result: Result<(), E>,
    ) {
        tracing::debug!("{}", action);
        self.attempted.push(action.clone());
        if let Err(err) = result {
            if kind == DiagnosticKind::ExternalNotification {
                tracing::debug!(kind = %kind, "unable to {}: {}", action, err);
            } else {
                tracing::warn!(kind = %kind, "unable to {}: {}", action, err);
            }
            self.failures.push(StepFailure {
                kind,
                action,
                message: err.to_string(),
            });
        }
    }
}

/// Drives the Inactive / Active(theme) state machine.
///
/// Every transition first tears down the linked asset trees and then, for a
/// real theme, builds them again from scratch. Failed steps are logged and
/// recorded in the [`ActivationReport`]; only an unknown theme name aborts,
/// before anything is touched.
pub struct ActivationEngine<N: SettingsNotifier> {
    config_root: PathBuf,
    store: ActiveThemeStore,
    notifier: N,
}

impl<N: SettingsNotifier> ActivationEngine<N> {
    /// `config_root` receives the `gtk-3.0`/`gtk-4.0` link trees.
    pub fn new(config_root: impl Into<PathBuf>, store: ActiveThemeStore, notifier: N) -> Self {
        Self {
            config_root: config_root.into(),
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &ActiveThemeStore {
        &self.store
    }

    fn family_dir(&self, family: AssetFamily) -> PathBuf {
        self.config_root.join(family.dir_name())
    }

    /// Make `selection` the active theme, or deactivate when it is the
    /// catalog's sentinel.
    pub fn activate(
        &self,
        selection: &str,
        catalog: &ThemeCatalog,
    ) -> Result<ActivationReport, ThemeError> {
        let mut report = ActivationReport::default();

        if catalog.is_sentinel(selection) {
            self.deactivate(catalog.sentinel(), &mut report);
            tracing::info!("theme reset to {}", selection);
            return Ok(report);
        }

        let source = catalog
            .source_dir(selection)
            .ok_or_else(|| ThemeError::InvalidTheme {
                name: selection.to_string(),
            })?;

        self.deactivate(catalog.sentinel(), &mut report);

        for family in AssetFamily::ALL {
            self.link_family(&source, family, &mut report);
        }

        report.record(
            DiagnosticKind::ExternalNotification,
            Action::SetSettings(selection.to_string()),
            self.notifier.set_theme(selection),
        );
        report.record(
            DiagnosticKind::FilesystemMutation,
            Action::WriteMarker(selection.to_string()),
            self.store.write(selection),
        );

        tracing::info!("theme set to {}", selection);
        Ok(report)
    }

    fn deactivate(&self, sentinel: &str, report: &mut ActivationReport) {
        for family in AssetFamily::ALL {
            let dir = self.family_dir(family);
            report.record(
                DiagnosticKind::FilesystemMutation,
                Action::RemoveFamilyDir(dir.clone()),
                remove_tree(&dir),
            );
        }

        report.record(
            DiagnosticKind::ExternalNotification,
            Action::ResetSettings,
            self.notifier.reset_theme(),
        );
        report.record(
            DiagnosticKind::FilesystemMutation,
            Action::WriteMarker(sentinel.to_string()),
            self.store.write(sentinel),
        );
    }

    fn link_family(&self, theme_dir: &Path, family: AssetFamily, report: &mut ActivationReport) {
        let dest_dir = self.family_dir(family);
        if !dest_dir.exists() {
            report.record(
                DiagnosticKind::FilesystemMutation,
                Action::CreateFamilyDir(dest_dir.clone()),
                fs::create_dir_all(&dest_dir),
            );
        }

        let source_dir = theme_dir.join(family.dir_name());
        let mut children = Vec::new();
        let listed = fs::read_dir(&source_dir).and_then(|entries| {
            for entry in entries {
                children.push(entry?.file_name());
            }
            Ok(())
        });
        report.record(
            DiagnosticKind::FilesystemMutation,
            Action::ReadSourceDir(source_dir.clone()),
            listed,
        );

        for child in children {
            let source = source_dir.join(&child);
            // exists() follows symlinks, so a dangling link inside the
            // theme ends linking for the whole family
            if !source.exists() {
                report.note(Action::SkipFamily {
                    family,
                    missing: source,
                });
                break;
            }
            let dest = dest_dir.join(&child);
            let result = symlink(&source, &dest);
            report.record(
                DiagnosticKind::FilesystemMutation,
                Action::Link { source, dest },
                result,
            );
        }

        let assets = dest_dir.join("assets");
        if !assets.exists() {
            report.record(
                DiagnosticKind::FilesystemMutation,
                Action::CreateAssetsDir(assets.clone()),
                fs::create_dir(&assets),
            );
        }
    }
}

/// Remove a link tree; a missing one is fine and a symlink in its place is
/// removed without touching its target.
fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
