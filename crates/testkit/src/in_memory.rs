//! In-memory tool collaborators.
//!
//! These implementations are intended for:
//! - Unit/integration tests of tool orchestration
//! - Deterministic contract tests for the tool ports
//!
//! Nothing here touches the network or the filesystem; paths are computed,
//! never created.

use foundation_ports::{
    BoxFuture, ChecksumVerifier, ToolCache, ToolDownloader, ToolInstaller, ToolMetadata,
    VersionResolver,
};
use foundation_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio::sync::RwLock;

/// Tool cache backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryToolCache {
    entries: Mutex<BTreeMap<(String, String), PathBuf>>,
}

impl InMemoryToolCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToolCache for InMemoryToolCache {
    fn get(&self, tool: &str, version: &str) -> Option<PathBuf> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(tool.to_string(), version.to_string()))
            .cloned()
    }

    fn store(&self, tool: &str, version: &str, path: &Path) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((tool.to_string(), version.to_string()), path.to_path_buf());
        Ok(())
    }

    fn invalidate(&self, tool: &str, version: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(tool.to_string(), version.to_string()));
        Ok(())
    }
}

/// Downloader that records requested URLs and "downloads" to `dest/<file>`.
#[derive(Debug, Default)]
pub struct InMemoryDownloader {
    requested: RwLock<Vec<String>>,
    failing: BTreeSet<String>,
}

impl InMemoryDownloader {
    /// Create a downloader that succeeds for every URL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make downloads of `url` fail with an I/O error.
    #[must_use]
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// URLs requested so far, in order.
    pub async fn requested(&self) -> Vec<String> {
        self.requested.read().await.clone()
    }
}

impl ToolDownloader for InMemoryDownloader {
    fn download_with_progress<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        _checksum: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            self.requested.write().await.push(url.to_string());
            if self.failing.contains(url) {
                return Err(ErrorEnvelope::expected(ErrorCode::io(), "download failed")
                    .with_metadata("url", url));
            }
            let file_name = url.rsplit('/').next().filter(|name| !name.is_empty());
            Ok(dest.join(file_name.unwrap_or("artifact")))
        })
    }
}

/// Verifier that answers from a fixed table of path checksums.
///
/// Paths without an entry verify successfully.
#[derive(Debug, Default)]
pub struct TableChecksumVerifier {
    actual: BTreeMap<PathBuf, String>,
}

impl TableChecksumVerifier {
    /// Create a verifier that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the actual checksum of `path`.
    #[must_use]
    pub fn with_actual(mut self, path: impl Into<PathBuf>, checksum: impl Into<String>) -> Self {
        self.actual.insert(path.into(), checksum.into());
        self
    }
}

impl ChecksumVerifier for TableChecksumVerifier {
    fn verify_checksum(&self, path: &Path, checksum: &str) -> Result<bool> {
        Ok(self
            .actual
            .get(path)
            .is_none_or(|actual| actual.eq_ignore_ascii_case(checksum)))
    }
}

/// Installer that records installs and returns `<root>/<name>/<version>`.
#[derive(Debug)]
pub struct InMemoryInstaller {
    root: PathBuf,
    installed: RwLock<Vec<(PathBuf, ToolMetadata)>>,
}

impl InMemoryInstaller {
    /// Create an installer rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            installed: RwLock::new(Vec::new()),
        }
    }

    /// Installed `(artifact, metadata)` pairs, in order.
    pub async fn installed(&self) -> Vec<(PathBuf, ToolMetadata)> {
        self.installed.read().await.clone()
    }
}

impl ToolInstaller for InMemoryInstaller {
    fn install<'a>(
        &'a self,
        artifact: &'a Path,
        metadata: &'a ToolMetadata,
    ) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            self.installed
                .write()
                .await
                .push((artifact.to_path_buf(), metadata.clone()));
            Ok(metadata.install_path.clone().unwrap_or_else(|| {
                self.root.join(&metadata.name).join(&metadata.version)
            }))
        })
    }
}

/// Resolver supporting `latest`, exact versions and dotted prefixes.
///
/// Versions compare numerically per dot-separated component; non-numeric
/// components compare as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixVersionResolver;

impl VersionResolver for PrefixVersionResolver {
    fn resolve(&self, spec: &str, available: &[String]) -> Result<String> {
        let spec = spec.trim();
        if available.iter().any(|version| version == spec) {
            return Ok(spec.to_string());
        }

        let prefix = format!("{spec}.");
        available
            .iter()
            .filter(|version| matches!(spec, "latest" | "*") || version.starts_with(&prefix))
            .max_by(|left, right| compare_versions(left, right))
            .cloned()
            .ok_or_else(|| {
                ErrorEnvelope::expected(
                    ErrorCode::new("tools", "version_not_found"),
                    "no available version matches spec",
                )
                .with_metadata("spec", spec)
            })
    }
}

fn compare_versions(left: &str, right: &str) -> std::cmp::Ordering {
    let mut left_parts = left.split('.');
    let mut right_parts = right.split('.');
    loop {
        match (left_parts.next(), right_parts.next()) {
            (None, None) => return std::cmp::Ordering::Equal,
            (None, Some(_)) => return std::cmp::Ordering::Less,
            (Some(_), None) => return std::cmp::Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ordering.is_ne() {
                    return ordering;
                }
            },
        }
    }
}
