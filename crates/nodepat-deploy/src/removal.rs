use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::InstallLayout;

/// One category of deployed state an uninstall run can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovedArtifact {
    Binary,
    Icon,
    Shortcut,
    PathEntry,
    Uninstaller,
}

impl RemovedArtifact {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Icon => "icon",
            Self::Shortcut => "shortcut",
            Self::PathEntry => "PATH entry",
            Self::Uninstaller => "uninstaller",
        }
    }
}

/// Tally of what an uninstall run actually removed. Drives the final summary:
/// zero removals means there was nothing to uninstall.
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: Vec<RemovedArtifact>,
    pub warnings: Vec<String>,
    pub retained_install_dir: Option<PathBuf>,
}

impl RemovalReport {
    pub fn tally(&self) -> usize {
        self.removed.len()
    }

    pub fn record(&mut self, artifact: RemovedArtifact) {
        self.removed.push(artifact);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Check existence, remove, tally. A missing file is a no-op; a removal that
/// should succeed but does not (permissions) becomes a warning and the pass
/// continues.
pub fn remove_artifact_file(path: &Path, artifact: RemovedArtifact, report: &mut RemovalReport) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => report.record(artifact),
        Err(err) => report.warn(format!(
            "failed to remove {} {}: {}",
            artifact.label(),
            path.display(),
            err
        )),
    }
}

/// The file-removal steps of the uninstall pass. Every step runs
/// unconditionally, so a partial earlier failure never blocks the rest and
/// the pass is safe to re-run.
pub fn remove_installed_files(
    layout: &InstallLayout,
    shortcut_path: Option<&Path>,
    report: &mut RemovalReport,
) {
    remove_artifact_file(&layout.binary_path(), RemovedArtifact::Binary, report);
    remove_artifact_file(&layout.icon_path(), RemovedArtifact::Icon, report);
    if let Some(shortcut_path) = shortcut_path {
        remove_artifact_file(shortcut_path, RemovedArtifact::Shortcut, report);
    }
}

/// Removes the install directory only when nothing is left inside; unexpected
/// user files keep it in place and are reported instead.
pub fn remove_install_dir_if_empty(layout: &InstallLayout, report: &mut RemovalReport) {
    let dir = layout.install_dir();
    if !dir.is_dir() {
        return;
    }

    match fs::read_dir(dir) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                report.retained_install_dir = Some(dir.to_path_buf());
                return;
            }
        }
        Err(err) => {
            report.warn(format!(
                "failed to inspect install directory {}: {}",
                dir.display(),
                err
            ));
            return;
        }
    }

    if let Err(err) = fs::remove_dir(dir) {
        report.warn(format!(
            "failed to remove install directory {}: {}",
            dir.display(),
            err
        ));
    }
}
