use std::cell::Cell;

use anyhow::{anyhow, Result};

use crate::{resolve_artifact, ReleaseAsset, ReleaseDescriptor, ReleaseSource};

/// Scripted release source: `latest` mirrors the primary endpoint
/// (`Ok(None)` = no stable release), `list` mirrors the unfiltered list.
struct ScriptedSource {
    latest: Option<ReleaseDescriptor>,
    latest_fails: bool,
    list: Vec<ReleaseDescriptor>,
    list_calls: Cell<u32>,
}

impl ScriptedSource {
    fn stable(release: ReleaseDescriptor) -> Self {
        Self {
            latest: Some(release),
            latest_fails: false,
            list: Vec::new(),
            list_calls: Cell::new(0),
        }
    }

    fn no_stable(list: Vec<ReleaseDescriptor>) -> Self {
        Self {
            latest: None,
            latest_fails: false,
            list,
            list_calls: Cell::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            latest: None,
            latest_fails: true,
            list: Vec::new(),
            list_calls: Cell::new(0),
        }
    }
}

impl ReleaseSource for ScriptedSource {
    fn latest_release(&self) -> Result<Option<ReleaseDescriptor>> {
        if self.latest_fails {
            return Err(anyhow!("release metadata request returned 500"));
        }
        Ok(self.latest.clone())
    }

    fn all_releases(&self) -> Result<Vec<ReleaseDescriptor>> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self.list.clone())
    }
}

fn release(tag: &str, prerelease: bool, asset_names: &[&str]) -> ReleaseDescriptor {
    ReleaseDescriptor {
        tag_name: tag.to_string(),
        prerelease,
        assets: asset_names
            .iter()
            .map(|name| ReleaseAsset {
                name: name.to_string(),
                browser_download_url: format!("https://downloads.test/{tag}/{name}"),
            })
            .collect(),
    }
}

#[test]
fn stable_release_resolves_to_matching_asset() {
    let source = ScriptedSource::stable(release("v1.2.0", false, &["Nodepat-x86_64", "Nodepat.exe"]));
    let artifact = resolve_artifact(&source, "Nodepat-x86_64").expect("must resolve");

    assert_eq!(artifact.version, "v1.2.0");
    assert!(!artifact.prerelease);
    assert_eq!(artifact.asset_name, "Nodepat-x86_64");
    assert_eq!(
        artifact.download_url,
        "https://downloads.test/v1.2.0/Nodepat-x86_64"
    );
    assert_eq!(source.list_calls.get(), 0);
}

#[test]
fn asset_matching_is_exact_never_prefix() {
    let source = ScriptedSource::stable(release("v1.2.0", false, &["Nodepat-x86_64", "Nodepat.exe"]));
    let err = resolve_artifact(&source, "Nodepat").expect_err("prefix must not match");
    let message = err.to_string();
    assert!(message.contains("no asset named 'Nodepat'"), "{message}");
}

#[test]
fn missing_asset_error_lists_available_names() {
    let source = ScriptedSource::stable(release("v1.2.0", false, &["Nodepat-aarch64", "README.md"]));
    let err = resolve_artifact(&source, "Nodepat-x86_64").expect_err("must fail");
    let message = err.to_string();
    assert!(message.contains("v1.2.0"), "{message}");
    assert!(
        message.contains("available assets: [Nodepat-aarch64, README.md]"),
        "{message}"
    );
}

#[test]
fn no_stable_release_falls_back_to_first_list_entry() {
    let source = ScriptedSource::no_stable(vec![
        release("v2.0.0-beta", true, &["Nodepat-x86_64"]),
        release("v1.9.0", false, &["Nodepat-x86_64"]),
    ]);
    let artifact = resolve_artifact(&source, "Nodepat-x86_64").expect("must resolve");

    assert_eq!(artifact.version, "v2.0.0-beta");
    assert!(artifact.prerelease);
    assert_eq!(source.list_calls.get(), 1);
}

#[test]
fn fetch_failure_is_fatal_without_fallback() {
    let source = ScriptedSource::failing();
    let err = resolve_artifact(&source, "Nodepat-x86_64").expect_err("must fail");
    assert!(err.to_string().contains("500"), "{err}");
    assert_eq!(source.list_calls.get(), 0, "must not fall back on errors");
}

#[test]
fn empty_release_list_reports_no_release_found() {
    let source = ScriptedSource::no_stable(Vec::new());
    let err = resolve_artifact(&source, "Nodepat-x86_64").expect_err("must fail");
    assert!(err.to_string().contains("no published release"), "{err}");
}

#[test]
fn release_descriptor_parses_endpoint_fields() {
    let raw = r#"{
        "tag_name": "v1.2.0",
        "prerelease": false,
        "name": "Nodepat 1.2.0",
        "assets": [
            {
                "name": "Nodepat-x86_64",
                "browser_download_url": "https://downloads.test/v1.2.0/Nodepat-x86_64",
                "size": 1048576
            }
        ]
    }"#;
    let release: ReleaseDescriptor = serde_json::from_str(raw).expect("must parse");
    assert_eq!(release.tag_name, "v1.2.0");
    assert!(!release.prerelease);
    assert_eq!(release.assets.len(), 1);
    assert_eq!(release.assets[0].name, "Nodepat-x86_64");
}

#[test]
fn release_descriptor_tolerates_missing_optional_fields() {
    let raw = r#"{"tag_name": "v0.1.0"}"#;
    let release: ReleaseDescriptor = serde_json::from_str(raw).expect("must parse");
    assert!(!release.prerelease);
    assert!(release.assets.is_empty());
}
