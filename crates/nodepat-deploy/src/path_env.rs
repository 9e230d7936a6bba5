use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// Outcome of one idempotent PATH mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathChange {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

pub const PATH_BLOCK_BEGIN: &str = "# >>> nodepat installer >>>";
pub const PATH_BLOCK_END: &str = "# <<< nodepat installer <<<";

/// Persistent user-scope PATH value, modelled as read-modify-write so tests
/// can substitute an in-memory store for the registry-backed one.
pub trait UserPathStore {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, value: &str) -> Result<()>;
}

/// Adds the install directory to the persistent PATH, exactly once.
pub fn add_install_dir_to_path(install_dir: &Path) -> Result<PathChange> {
    if cfg!(windows) {
        return add_dir_to_store(&WindowsPathStore, install_dir, ';');
    }
    add_path_block_to_file(&detect_profile_file()?, install_dir)
}

pub fn remove_install_dir_from_path(install_dir: &Path) -> Result<PathChange> {
    if cfg!(windows) {
        return remove_dir_from_store(&WindowsPathStore, install_dir, ';');
    }
    let _ = install_dir;
    remove_path_block_from_file(&detect_profile_file()?)
}

pub fn add_dir_to_store(
    store: &dyn UserPathStore,
    dir: &Path,
    separator: char,
) -> Result<PathChange> {
    let current = store.read()?;
    match append_path_segment(current.as_deref(), dir, separator) {
        Some(updated) => {
            store.write(&updated)?;
            Ok(PathChange::Added)
        }
        None => Ok(PathChange::AlreadyPresent),
    }
}

pub fn remove_dir_from_store(
    store: &dyn UserPathStore,
    dir: &Path,
    separator: char,
) -> Result<PathChange> {
    let Some(current) = store.read()? else {
        return Ok(PathChange::NotPresent);
    };
    match strip_path_segment(&current, dir, separator) {
        Some(updated) => {
            store.write(&updated)?;
            Ok(PathChange::Removed)
        }
        None => Ok(PathChange::NotPresent),
    }
}

/// Returns the updated PATH value, or `None` when `dir` is already a segment.
pub fn append_path_segment(current: Option<&str>, dir: &Path, separator: char) -> Option<String> {
    let dir = dir.to_string_lossy();
    let current = current.unwrap_or("");
    if current.split(separator).any(|segment| segment == dir) {
        return None;
    }
    if current.is_empty() {
        return Some(dir.into_owned());
    }
    Some(format!("{current}{separator}{dir}"))
}

/// Filters `dir` out of the segment list, preserving the relative order and
/// content of every other segment. `None` when no change is needed.
pub fn strip_path_segment(current: &str, dir: &Path, separator: char) -> Option<String> {
    let dir = dir.to_string_lossy();
    if !current.split(separator).any(|segment| segment == dir) {
        return None;
    }
    let retained = current
        .split(separator)
        .filter(|segment| *segment != dir)
        .collect::<Vec<_>>();
    Some(retained.join(&separator.to_string()))
}

/// User-scope PATH backed by `HKCU\Environment`, edited through the `reg`
/// command so no registry bindings are needed.
pub struct WindowsPathStore;

impl UserPathStore for WindowsPathStore {
    fn read(&self) -> Result<Option<String>> {
        let output = Command::new("reg")
            .args(["query", r"HKCU\Environment", "/v", "Path"])
            .output()
            .context("failed to run reg query for the user PATH")?;
        if !output.status.success() {
            // The value does not exist yet on a fresh profile.
            return Ok(None);
        }
        Ok(parse_reg_query_value(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn write(&self, value: &str) -> Result<()> {
        let output = Command::new("reg")
            .args([
                "add",
                r"HKCU\Environment",
                "/v",
                "Path",
                "/t",
                "REG_EXPAND_SZ",
                "/d",
                value,
                "/f",
            ])
            .output()
            .context("failed to run reg add for the user PATH")?;
        if !output.status.success() {
            return Err(anyhow!(
                "reg add for the user PATH failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(())
    }
}

/// Extracts the value column from `reg query` output, e.g.
/// `    Path    REG_EXPAND_SZ    C:\a;C:\b`.
pub(crate) fn parse_reg_query_value(raw: &str) -> Option<String> {
    for line in raw.lines().map(str::trim) {
        let Some(rest) = line.strip_prefix("Path") else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(rest) = rest
            .strip_prefix("REG_EXPAND_SZ")
            .or_else(|| rest.strip_prefix("REG_SZ"))
        else {
            continue;
        };
        let value = rest.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

/// The export line is fenced by marker comments so removal deletes exactly
/// the block the installer wrote, never a user-authored PATH line.
pub fn render_path_block(dir: &Path) -> String {
    format!(
        "{PATH_BLOCK_BEGIN}\nexport PATH=\"$PATH:{}\"\n{PATH_BLOCK_END}\n",
        dir.display()
    )
}

/// A marker counts only when it is a whole line; marker text embedded in a
/// longer user-authored line is not the installer's block.
fn has_block_marker(content: &str) -> bool {
    content.lines().any(|line| line.trim() == PATH_BLOCK_BEGIN)
}

/// Returns the updated file content, or `None` when the block is already
/// present.
pub fn append_path_block(content: &str, dir: &Path) -> Option<String> {
    if has_block_marker(content) {
        return None;
    }
    let mut updated = String::from(content);
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&render_path_block(dir));
    Some(updated)
}

/// Deletes the fenced block; every line outside the markers is kept verbatim.
/// `None` when no block is present.
pub fn strip_path_block(content: &str) -> Option<String> {
    if !has_block_marker(content) {
        return None;
    }

    let mut retained = Vec::new();
    let mut inside = false;
    for line in content.lines() {
        if line.trim() == PATH_BLOCK_BEGIN {
            inside = true;
            continue;
        }
        if line.trim() == PATH_BLOCK_END {
            inside = false;
            continue;
        }
        if !inside {
            retained.push(line);
        }
    }

    let mut updated = retained.join("\n");
    if !updated.is_empty() {
        updated.push('\n');
    }
    Some(updated)
}

/// Picks the startup file for the user's interactive shell, with `.profile`
/// as the fixed fallback when detection fails.
pub fn profile_file_for_shell(shell: Option<&str>, home: &Path) -> PathBuf {
    let file = match shell.and_then(|value| value.rsplit('/').next()) {
        Some("zsh") => ".zshrc",
        Some("bash") => ".bashrc",
        _ => ".profile",
    };
    home.join(file)
}

fn detect_profile_file() -> Result<PathBuf> {
    let home =
        std::env::var("HOME").context("HOME is not set; cannot locate a shell startup file")?;
    Ok(profile_file_for_shell(
        std::env::var("SHELL").ok().as_deref(),
        Path::new(&home),
    ))
}

pub fn add_path_block_to_file(profile: &Path, dir: &Path) -> Result<PathChange> {
    let content = read_profile(profile)?;
    match append_path_block(&content, dir) {
        Some(updated) => {
            fs::write(profile, updated.as_bytes())
                .with_context(|| format!("failed to update {}", profile.display()))?;
            Ok(PathChange::Added)
        }
        None => Ok(PathChange::AlreadyPresent),
    }
}

pub fn remove_path_block_from_file(profile: &Path) -> Result<PathChange> {
    let content = match fs::read_to_string(profile) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PathChange::NotPresent),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", profile.display()));
        }
    };
    match strip_path_block(&content) {
        Some(updated) => {
            fs::write(profile, updated.as_bytes())
                .with_context(|| format!("failed to update {}", profile.display()))?;
            Ok(PathChange::Removed)
        }
        None => Ok(PathChange::NotPresent),
    }
}

fn read_profile(profile: &Path) -> Result<String> {
    match fs::read_to_string(profile) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", profile.display())),
    }
}
