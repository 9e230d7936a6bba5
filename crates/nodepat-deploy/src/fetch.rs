use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;

use crate::fs_utils::set_executable;
use crate::layout::InstallLayout;

pub fn download_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("nodepat-setup/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to construct the download client")
}

/// Downloads `url` into `dest` through a sibling part file, so an interrupted
/// transfer never leaves a truncated file at the final path.
pub fn download_file(client: &Client, url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let part_path = part_path_for(dest);
    if let Err(err) = fetch_to_file(client, url, &part_path) {
        let _ = fs::remove_file(&part_path);
        return Err(err);
    }

    if dest.exists() {
        fs::remove_file(dest)
            .with_context(|| format!("failed to replace existing file: {}", dest.display()))?;
    }
    fs::rename(&part_path, dest).with_context(|| {
        format!("failed to move downloaded file into place: {}", dest.display())
    })?;
    Ok(())
}

fn part_path_for(dest: &Path) -> PathBuf {
    dest.with_file_name(format!(
        "{}.part",
        dest.file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("download")
    ))
}

fn fetch_to_file(client: &Client, url: &str, out_path: &Path) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("download request failed: {url}"))?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "download request returned {}: {url}",
            response.status()
        ));
    }

    let mut file = fs::File::create(out_path)
        .with_context(|| format!("failed to create {}", out_path.display()))?;
    io::copy(&mut response, &mut file)
        .with_context(|| format!("failed while writing {}", out_path.display()))?;
    Ok(())
}

/// Installs the application binary. Any failure here is fatal to the run and
/// happens before any PATH or shortcut state is touched.
pub fn install_binary(client: &Client, layout: &InstallLayout, url: &str) -> Result<PathBuf> {
    let binary_path = layout.binary_path();
    download_file(client, url, &binary_path)?;
    set_executable(&binary_path)?;
    Ok(binary_path)
}

/// Icon download is best-effort: the error is handed back for the caller to
/// log as a warning, never to abort the install.
pub fn install_icon(client: &Client, layout: &InstallLayout, url: &str) -> Result<PathBuf> {
    let icon_path = layout.icon_path();
    download_file(client, url, &icon_path)?;
    Ok(icon_path)
}
