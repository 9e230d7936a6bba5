use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::ReleaseDescriptor;

/// Read-only view of the release-metadata endpoint.
///
/// `latest_release` returns `Ok(None)` only for the classified "no stable
/// release exists" condition. Every other failure is an error, so callers
/// never fall back to prereleases on arbitrary network trouble.
pub trait ReleaseSource {
    fn latest_release(&self) -> Result<Option<ReleaseDescriptor>>;
    fn all_releases(&self) -> Result<Vec<ReleaseDescriptor>>;
}

const API_BASE: &str = "https://api.github.com";

pub struct GithubReleaseSource {
    client: Client,
    owner: String,
    repo: String,
}

impl GithubReleaseSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("nodepat-setup/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to construct the release API client")?;
        Ok(Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn releases_url(&self) -> String {
        format!("{API_BASE}/repos/{}/{}/releases", self.owner, self.repo)
    }

    fn get_text(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("release metadata request failed: {url}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "release metadata request returned {}: {url}",
                response.status()
            ));
        }

        let body = response
            .text()
            .with_context(|| format!("failed to read release metadata response: {url}"))?;
        Ok(Some(body))
    }
}

impl ReleaseSource for GithubReleaseSource {
    fn latest_release(&self) -> Result<Option<ReleaseDescriptor>> {
        let url = format!("{}/latest", self.releases_url());
        let Some(body) = self.get_text(&url)? else {
            return Ok(None);
        };
        let release = serde_json::from_str(&body)
            .with_context(|| format!("failed to parse release metadata: {url}"))?;
        Ok(Some(release))
    }

    fn all_releases(&self) -> Result<Vec<ReleaseDescriptor>> {
        let url = self.releases_url();
        let Some(body) = self.get_text(&url)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&body)
            .with_context(|| format!("failed to parse release list: {url}"))
    }
}
