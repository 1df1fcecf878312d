//! Tool management collaborator contracts.
//!
//! The orchestration layer only sees these traits; downloading, hashing and
//! unpacking live in adapters (or in the host application).

use crate::BoxFuture;
use foundation_shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Description of one downloadable tool version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// Tool name (e.g. `jq`).
    pub name: String,
    /// Concrete version string.
    pub version: String,
    /// Target platform (e.g. `linux`).
    pub platform: String,
    /// Target CPU architecture (e.g. `x86_64`).
    pub arch: String,
    /// Expected artifact checksum (hex sha256).
    pub checksum: Option<String>,
    /// Detached signature, if the vendor publishes one.
    pub signature: Option<String>,
    /// Artifact download URL.
    pub download_url: String,
    /// URL of a published checksum file.
    pub checksum_url: Option<String>,
    /// Preferred install location.
    pub install_path: Option<PathBuf>,
    /// Environment variables the tool expects once installed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_vars: BTreeMap<String, String>,
    /// Names of tools this one depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Executable name inside the install directory.
    pub executable: String,
}

impl ToolMetadata {
    /// Minimal metadata; optional fields start empty.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            executable: name.clone(),
            name,
            version: version.into(),
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            checksum: None,
            signature: None,
            download_url: download_url.into(),
            checksum_url: None,
            install_path: None,
            env_vars: BTreeMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Set the expected checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Add an environment variable exported by the tool.
    #[must_use]
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

/// Cache of installed tool locations.
pub trait ToolCache: Send + Sync {
    /// Installed path for a tool version, if cached.
    fn get(&self, tool: &str, version: &str) -> Option<PathBuf>;

    /// Record an installed path.
    fn store(&self, tool: &str, version: &str, path: &Path) -> Result<()>;

    /// Forget a cached entry.
    fn invalidate(&self, tool: &str, version: &str) -> Result<()>;
}

/// Artifact downloader.
pub trait ToolDownloader: Send + Sync {
    /// Download `url` into `dest`, returning the artifact path.
    fn download_with_progress<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        checksum: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf>>;
}

/// Artifact integrity check.
pub trait ChecksumVerifier: Send + Sync {
    /// Returns whether the file at `path` matches `checksum`.
    fn verify_checksum(&self, path: &Path, checksum: &str) -> Result<bool>;
}

/// Artifact installer.
pub trait ToolInstaller: Send + Sync {
    /// Install a downloaded artifact, returning the install directory.
    fn install<'a>(
        &'a self,
        artifact: &'a Path,
        metadata: &'a ToolMetadata,
    ) -> BoxFuture<'a, Result<PathBuf>>;
}

/// Version spec resolution.
pub trait VersionResolver: Send + Sync {
    /// Pick a concrete version for `spec` out of `available`.
    fn resolve(&self, spec: &str, available: &[String]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_serializes_camel_case_and_skips_empty_collections() -> Result<(), serde_json::Error>
    {
        let metadata = ToolMetadata::new("jq", "1.7.1", "https://example.com/jq")
            .with_checksum("abc123")
            .with_env_var("JQ_COLORS", "1;30");
        let json = serde_json::to_value(&metadata)?;

        assert_eq!(json.get("downloadUrl"), Some(&serde_json::Value::from("https://example.com/jq")));
        assert_eq!(json.get("executable"), Some(&serde_json::Value::from("jq")));
        assert!(json.get("dependencies").is_none());
        assert!(json.pointer("/envVars/JQ_COLORS").is_some());

        let back: ToolMetadata = serde_json::from_value(json)?;
        assert_eq!(back, metadata);
        Ok(())
    }
}
