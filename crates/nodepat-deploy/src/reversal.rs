use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::fs_utils::set_executable;
use crate::layout::{InstallLayout, UNINSTALLER_NAME};
use crate::removal::{RemovalReport, RemovedArtifact};

/// Copies the uninstaller shipped next to the running installer into the
/// install directory. The twin re-derives every path from the same naming
/// conventions, so it needs no manifest to reverse the install.
pub fn write_uninstaller(layout: &InstallLayout) -> Result<PathBuf> {
    let source = sibling_uninstaller_path()?;
    if !source.exists() {
        return Err(anyhow!(
            "uninstaller executable not found next to the installer: {}",
            source.display()
        ));
    }

    let destination = layout.uninstaller_path();
    fs::copy(&source, &destination)
        .with_context(|| format!("failed to copy uninstaller to {}", destination.display()))?;
    set_executable(&destination)?;
    Ok(destination)
}

fn sibling_uninstaller_path() -> Result<PathBuf> {
    let current =
        std::env::current_exe().context("failed to locate the running installer executable")?;
    let dir = current
        .parent()
        .ok_or_else(|| anyhow!("installer executable has no parent directory"))?;
    let mut file_name = UNINSTALLER_NAME.to_string();
    if cfg!(windows) {
        file_name.push_str(".exe");
    }
    Ok(dir.join(file_name))
}

/// How the uninstaller's own executable was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfRemoval {
    Removed,
    Scheduled,
    Absent,
}

/// Deletes the uninstaller last, after every other step has run. On unix the
/// running process keeps its mapped copy, so the file is unlinked directly
/// and the empty-dir sweep can still run in process. Windows cannot delete a
/// running executable, so a detached shell trampoline deletes it (and the
/// install directory, if then empty) after the process exits.
pub fn remove_self(layout: &InstallLayout, report: &mut RemovalReport) -> SelfRemoval {
    let uninstaller = layout.uninstaller_path();
    if !uninstaller.exists() {
        return SelfRemoval::Absent;
    }

    if cfg!(windows) {
        // The trampoline cannot report back, so the retained-directory check
        // runs in process before it is scheduled.
        let sweep_install_dir = match install_dir_retains_other_entries(layout) {
            Ok(true) => {
                report.retained_install_dir = Some(layout.install_dir().to_path_buf());
                false
            }
            Ok(false) => true,
            Err(err) => {
                report.warn(format!(
                    "failed to inspect install directory {}: {}",
                    layout.install_dir().display(),
                    err
                ));
                false
            }
        };
        return match schedule_windows_self_removal(layout, sweep_install_dir) {
            Ok(()) => {
                report.record(RemovedArtifact::Uninstaller);
                SelfRemoval::Scheduled
            }
            Err(err) => {
                report.warn(format!("failed to schedule uninstaller removal: {err:#}"));
                SelfRemoval::Absent
            }
        };
    }

    match fs::remove_file(&uninstaller) {
        Ok(()) => {
            report.record(RemovedArtifact::Uninstaller);
            SelfRemoval::Removed
        }
        Err(err) => {
            report.warn(format!(
                "failed to remove uninstaller {}: {}",
                uninstaller.display(),
                err
            ));
            SelfRemoval::Absent
        }
    }
}

/// True when the install directory holds anything besides the uninstaller
/// itself, meaning the post-exit sweep must leave the directory in place.
pub(crate) fn install_dir_retains_other_entries(layout: &InstallLayout) -> io::Result<bool> {
    let uninstaller = layout.uninstaller_path();
    let uninstaller_name = uninstaller.file_name();
    for entry in fs::read_dir(layout.install_dir())? {
        let entry = entry?;
        if Some(entry.file_name().as_os_str()) != uninstaller_name {
            return Ok(true);
        }
    }
    Ok(false)
}

fn schedule_windows_self_removal(layout: &InstallLayout, sweep_install_dir: bool) -> Result<()> {
    let mut script = format!(
        "ping -n 2 127.0.0.1 >nul & del /f /q \"{}\"",
        layout.uninstaller_path().display()
    );
    if sweep_install_dir {
        script.push_str(&format!(" & rd \"{}\"", layout.install_dir().display()));
    }
    Command::new("cmd")
        .arg("/C")
        .arg(script)
        .spawn()
        .context("failed to spawn the self-removal helper")?;
    Ok(())
}
