use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::fs_utils::remove_file_if_exists;
use crate::layout::{InstallLayout, APP_NAME};

/// Icon identifier handed to the desktop environment when the optional icon
/// download did not produce a file.
pub const FALLBACK_ICON: &str = "accessories-text-editor";

pub(crate) fn linux_applications_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("applications")
}

pub(crate) fn windows_desktop_dir(user_profile: &Path) -> PathBuf {
    // Built with an explicit `\` so the projection is exercisable from any
    // host; `join` would insert the host separator instead of the Windows one.
    let mut dir = user_profile.as_os_str().to_os_string();
    dir.push("\\Desktop");
    PathBuf::from(dir)
}

/// Fixed descriptor path for the current platform, derived from the app name.
pub fn desktop_shortcut_path() -> Result<PathBuf> {
    if cfg!(windows) {
        let profile = std::env::var("USERPROFILE")
            .context("USERPROFILE is not set; cannot resolve the desktop directory")?;
        return Ok(windows_desktop_dir(Path::new(&profile)).join(format!("{APP_NAME}.lnk")));
    }

    let home = std::env::var("HOME")
        .context("HOME is not set; cannot resolve the applications directory")?;
    Ok(linux_applications_dir(Path::new(&home)).join("nodepat.desktop"))
}

pub fn render_desktop_entry(binary: &Path, icon: Option<&Path>) -> String {
    let icon_value = icon
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| FALLBACK_ICON.to_string());
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={APP_NAME}\n\
         Comment=Cross-platform text editor\n\
         Exec=\"{}\" %F\n\
         Icon={}\n\
         Terminal=false\n\
         Categories=Utility;TextEditor;\n",
        binary.display(),
        icon_value
    )
}

/// PowerShell statements that create the `.lnk` through the `WScript.Shell`
/// COM object; the icon property is set only when an icon file exists.
pub fn render_shortcut_script(shortcut: &Path, binary: &Path, icon: Option<&Path>) -> String {
    let mut script = format!(
        "$shell = New-Object -ComObject WScript.Shell; \
         $shortcut = $shell.CreateShortcut('{}'); \
         $shortcut.TargetPath = '{}'; ",
        escape_ps_single_quote_path(shortcut),
        escape_ps_single_quote_path(binary)
    );
    if let Some(icon) = icon {
        script.push_str(&format!(
            "$shortcut.IconLocation = '{}'; ",
            escape_ps_single_quote_path(icon)
        ));
    }
    script.push_str("$shortcut.Save()");
    script
}

fn escape_ps_single_quote_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

/// Writes the shortcut/descriptor file. Callers treat a failure here as a
/// warning: installation succeeds without desktop integration.
pub fn register_desktop_shortcut(layout: &InstallLayout, icon: Option<&Path>) -> Result<PathBuf> {
    let shortcut_path = desktop_shortcut_path()?;
    if let Some(parent) = shortcut_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if cfg!(windows) {
        write_windows_shortcut(&shortcut_path, &layout.binary_path(), icon)?;
        return Ok(shortcut_path);
    }

    let payload = render_desktop_entry(&layout.binary_path(), icon);
    fs::write(&shortcut_path, payload.as_bytes())
        .with_context(|| format!("failed to write desktop shortcut: {}", shortcut_path.display()))?;
    Ok(shortcut_path)
}

fn write_windows_shortcut(shortcut: &Path, binary: &Path, icon: Option<&Path>) -> Result<()> {
    let output = Command::new("powershell")
        .arg("-NoProfile")
        .arg("-Command")
        .arg(render_shortcut_script(shortcut, binary, icon))
        .output()
        .context("failed to run powershell to create the desktop shortcut")?;
    if !output.status.success() {
        return Err(anyhow!(
            "desktop shortcut creation failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}

/// Removes the descriptor if present; absence is not an error.
pub fn unregister_desktop_shortcut(shortcut_path: &Path) -> Result<bool> {
    let existed = shortcut_path.exists();
    remove_file_if_exists(shortcut_path).with_context(|| {
        format!(
            "failed to remove desktop shortcut: {}",
            shortcut_path.display()
        )
    })?;
    Ok(existed)
}
