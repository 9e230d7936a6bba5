use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const APP_NAME: &str = "Nodepat";
pub const UNINSTALLER_NAME: &str = "nodepat-uninstall";

/// Every path a deployment touches, derived from the install directory plus
/// fixed naming conventions. Nothing here is persisted: the uninstaller
/// reconstructs the identical layout from the same conventions, so it can
/// reverse an install without a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    install_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Created,
    AlreadyPresent,
}

impl InstallLayout {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn binary_path(&self) -> PathBuf {
        let mut file_name = APP_NAME.to_string();
        if cfg!(windows) {
            file_name.push_str(".exe");
        }
        self.install_dir.join(file_name)
    }

    pub fn icon_path(&self) -> PathBuf {
        self.install_dir.join(format!("{APP_NAME}.jpg"))
    }

    pub fn uninstaller_path(&self) -> PathBuf {
        let mut file_name = UNINSTALLER_NAME.to_string();
        if cfg!(windows) {
            file_name.push_str(".exe");
        }
        self.install_dir.join(file_name)
    }

    /// Idempotent create; reports whether the directory is new so the install
    /// summary can distinguish created from already-present state.
    pub fn ensure_install_dir(&self) -> Result<DirState> {
        if self.install_dir.is_dir() {
            return Ok(DirState::AlreadyPresent);
        }
        fs::create_dir_all(&self.install_dir)
            .with_context(|| format!("failed to create {}", self.install_dir.display()))?;
        Ok(DirState::Created)
    }
}

pub fn default_install_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve the install directory")?;
        return Ok(PathBuf::from(app_data).join(APP_NAME));
    }

    let home =
        std::env::var("HOME").context("HOME is not set; cannot resolve the install directory")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("nodepat"))
}
