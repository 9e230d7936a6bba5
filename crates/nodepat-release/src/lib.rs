mod locate;
mod source;
mod types;

pub use locate::{expected_asset_name, resolve_artifact};
pub use source::{GithubReleaseSource, ReleaseSource};
pub use types::{ReleaseAsset, ReleaseDescriptor, ResolvedArtifact};

#[cfg(test)]
mod tests;
