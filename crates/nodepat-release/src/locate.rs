use anyhow::{anyhow, Result};

use crate::{ReleaseDescriptor, ReleaseSource, ResolvedArtifact};

/// Exact asset file name expected for the running platform. One name per
/// platform/architecture; matching is exact-string, never prefix or fuzzy.
pub fn expected_asset_name() -> &'static str {
    match (std::env::consts::ARCH, std::env::consts::OS) {
        (_, "windows") => "Nodepat.exe",
        ("aarch64", "macos") => "Nodepat-macos-aarch64",
        (_, "macos") => "Nodepat-macos-x86_64",
        ("aarch64", _) => "Nodepat-aarch64",
        _ => "Nodepat-x86_64",
    }
}

/// Resolves exactly one downloadable binary URL for the platform.
///
/// The latest stable release wins. Only the classified "no stable release"
/// condition falls back to the newest entry of the unfiltered release list,
/// prerelease or not; the prerelease flag is carried through for display.
pub fn resolve_artifact(source: &dyn ReleaseSource, asset_name: &str) -> Result<ResolvedArtifact> {
    let release = match source.latest_release()? {
        Some(release) => release,
        None => source
            .all_releases()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no published release found (stable or prerelease)"))?,
    };

    select_asset(&release, asset_name)
}

fn select_asset(release: &ReleaseDescriptor, asset_name: &str) -> Result<ResolvedArtifact> {
    let Some(asset) = release.assets.iter().find(|asset| asset.name == asset_name) else {
        let available = release
            .assets
            .iter()
            .map(|asset| asset.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(anyhow!(
            "release {} has no asset named '{}'; available assets: [{}]",
            release.tag_name,
            asset_name,
            available
        ));
    };

    Ok(ResolvedArtifact {
        version: release.tag_name.clone(),
        prerelease: release.prerelease,
        asset_name: asset.name.clone(),
        download_url: asset.browser_download_url.clone(),
    })
}
