use std::path::Path;

use anyhow::{Context, Result};
use nodepat_deploy::{
    add_install_dir_to_path, default_install_dir, desktop_shortcut_path, download_client,
    install_binary, install_icon, register_desktop_shortcut, remove_install_dir_from_path,
    remove_install_dir_if_empty, remove_installed_files, remove_self, write_uninstaller,
    DirState, InstallLayout, PathChange, RemovalReport, RemovedArtifact, SelfRemoval,
};
use nodepat_release::{expected_asset_name, resolve_artifact, GithubReleaseSource, ResolvedArtifact};

use crate::render::{current_output_style, print_status, print_warning};

pub const RELEASE_OWNER: &str = "nodepat";
pub const RELEASE_REPO: &str = "nodepat";
pub const ICON_URL: &str = "https://raw.githubusercontent.com/nodepat/nodepat/main/assets/Nodepat.jpg";

fn resolve_layout() -> Result<InstallLayout> {
    Ok(InstallLayout::new(default_install_dir()?))
}

pub fn run_install_command() -> Result<()> {
    let style = current_output_style();

    let source = GithubReleaseSource::new(RELEASE_OWNER, RELEASE_REPO)?;
    let artifact = resolve_artifact(&source, expected_asset_name())
        .context("failed to resolve a downloadable release")?;
    print_status(style, "step", &format_resolved_release(&artifact));

    let layout = resolve_layout()?;
    let dir_state = layout.ensure_install_dir()?;

    let client = download_client()?;
    install_binary(&client, &layout, &artifact.download_url)?;
    print_status(
        style,
        "step",
        &format!("installed binary: {}", layout.binary_path().display()),
    );

    let icon_path = match install_icon(&client, &layout, ICON_URL) {
        Ok(path) => Some(path),
        Err(err) => {
            print_warning(style, &format!("icon download skipped: {err:#}"));
            None
        }
    };

    let path_change = add_install_dir_to_path(layout.install_dir())?;

    let shortcut_registered = match register_desktop_shortcut(&layout, icon_path.as_deref()) {
        Ok(_) => true,
        Err(err) => {
            print_warning(style, &format!("desktop shortcut skipped: {err:#}"));
            false
        }
    };

    let uninstaller = write_uninstaller(&layout)?;

    for line in format_install_summary(
        &layout,
        dir_state,
        path_change,
        icon_path.is_some(),
        shortcut_registered,
        &uninstaller,
    ) {
        print_status(style, "step", &line);
    }
    print_status(
        style,
        "ok",
        &format!("Nodepat {} is installed", artifact.version),
    );
    Ok(())
}

pub fn run_uninstall_command() -> Result<()> {
    let style = current_output_style();
    let layout = resolve_layout()?;
    let mut report = RemovalReport::default();

    let shortcut = match desktop_shortcut_path() {
        Ok(path) => Some(path),
        Err(err) => {
            report.warn(format!("desktop shortcut location unknown: {err:#}"));
            None
        }
    };
    remove_installed_files(&layout, shortcut.as_deref(), &mut report);

    match remove_install_dir_from_path(layout.install_dir()) {
        Ok(PathChange::Removed) => report.record(RemovedArtifact::PathEntry),
        Ok(_) => {}
        Err(err) => report.warn(format!("failed to update the user PATH: {err:#}")),
    }

    let self_removal = remove_self(&layout, &mut report);
    if self_removal != SelfRemoval::Scheduled {
        remove_install_dir_if_empty(&layout, &mut report);
    }

    for warning in &report.warnings {
        print_warning(style, warning);
    }
    for line in format_removal_summary(&report) {
        print_status(style, "ok", &line);
    }
    Ok(())
}

pub fn format_resolved_release(artifact: &ResolvedArtifact) -> String {
    let channel = if artifact.prerelease {
        "prerelease"
    } else {
        "stable"
    };
    format!(
        "resolved {} ({channel}), asset {}",
        artifact.version, artifact.asset_name
    )
}

pub fn format_install_summary(
    layout: &InstallLayout,
    dir_state: DirState,
    path_change: PathChange,
    icon_installed: bool,
    shortcut_registered: bool,
    uninstaller: &Path,
) -> Vec<String> {
    let mut lines = vec![match dir_state {
        DirState::Created => format!("created install directory: {}", layout.install_dir().display()),
        DirState::AlreadyPresent => {
            format!("install directory already present: {}", layout.install_dir().display())
        }
    }];
    lines.push(match path_change {
        PathChange::Added => "added the install directory to the user PATH".to_string(),
        _ => "user PATH already contains the install directory".to_string(),
    });
    if icon_installed {
        lines.push("installed icon".to_string());
    }
    if shortcut_registered {
        lines.push("registered desktop shortcut".to_string());
    }
    lines.push(format!("wrote uninstaller: {}", uninstaller.display()));
    lines
}

pub fn format_removal_summary(report: &RemovalReport) -> Vec<String> {
    if report.tally() == 0 {
        return vec!["nothing to uninstall".to_string()];
    }

    let labels = report
        .removed
        .iter()
        .map(RemovedArtifact::label)
        .collect::<Vec<_>>();
    let mut lines = vec![format!("removed: {}", labels.join(", "))];
    if let Some(dir) = &report.retained_install_dir {
        lines.push(format!(
            "kept non-empty install directory: {}",
            dir.display()
        ));
    }
    lines
}
