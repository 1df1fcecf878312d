//! Resolve, download, verify, install and cache a tool.

use crate::definition::ToolDefinition;
use foundation_ports::{
    ChecksumVerifier, LoggerPort, ToolCache, ToolDownloader, ToolInstaller, VersionResolver,
    log_fields,
};
use foundation_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Collaborators doing the actual work.
#[derive(Clone)]
pub struct ToolCollaborators {
    /// Installed location cache.
    pub cache: Arc<dyn ToolCache>,
    /// Artifact downloader.
    pub downloader: Arc<dyn ToolDownloader>,
    /// Checksum verifier.
    pub verifier: Arc<dyn ChecksumVerifier>,
    /// Artifact installer.
    pub installer: Arc<dyn ToolInstaller>,
    /// Version spec resolver.
    pub resolver: Arc<dyn VersionResolver>,
}

/// Orchestrates the install pipeline for one tool.
pub struct ToolManager<D> {
    definition: D,
    collaborators: ToolCollaborators,
    download_dir: PathBuf,
    logger: Arc<dyn LoggerPort>,
}

impl<D: ToolDefinition> ToolManager<D> {
    /// Create a manager downloading artifacts into `download_dir`.
    pub fn new(
        definition: D,
        collaborators: ToolCollaborators,
        download_dir: impl Into<PathBuf>,
        logger: Arc<dyn LoggerPort>,
    ) -> Self {
        Self {
            definition,
            collaborators,
            download_dir: download_dir.into(),
            logger,
        }
    }

    /// The managed tool.
    pub const fn definition(&self) -> &D {
        &self.definition
    }

    /// Concrete version for `spec`.
    pub fn resolve_version(&self, spec: &str) -> Result<String> {
        let available = self.definition.available_versions()?;
        self.collaborators.resolver.resolve(spec, &available)
    }

    /// Cached install location of `version`.
    pub fn installed_path(&self, version: &str) -> Option<PathBuf> {
        self.collaborators.cache.get(self.definition.name(), version)
    }

    /// Install the version matching `spec` unless it is already cached.
    ///
    /// An artifact failing checksum verification is never installed; its
    /// cache entry is invalidated and `tools:checksum_mismatch` returned.
    pub async fn ensure_installed(&self, spec: &str) -> Result<PathBuf> {
        let name = self.definition.name();
        let version = self.resolve_version(spec)?;

        if let Some(path) = self.installed_path(&version) {
            self.logger.debug(
                "tools.cache_hit",
                "tool already installed",
                Some(log_fields([("tool", name), ("version", version.as_str())])),
            );
            return Ok(path);
        }

        let metadata = self.definition.metadata(&version)?;
        let artifact = self
            .collaborators
            .downloader
            .download_with_progress(
                &metadata.download_url,
                &self.download_dir,
                metadata.checksum.as_deref(),
            )
            .await?;

        if let Some(checksum) = metadata.checksum.as_deref()
            && !self.collaborators.verifier.verify_checksum(&artifact, checksum)?
        {
            self.collaborators.cache.invalidate(name, &version)?;
            let artifact_display = artifact.display().to_string();
            self.logger.warn(
                "tools.checksum_mismatch",
                "downloaded artifact failed checksum verification",
                Some(log_fields([
                    ("tool", name),
                    ("version", version.as_str()),
                    ("artifact", artifact_display.as_str()),
                ])),
            );
            return Err(checksum_mismatch(name, &version, &artifact));
        }

        let install_dir = self
            .collaborators
            .installer
            .install(&artifact, &metadata)
            .await?;
        self.collaborators
            .cache
            .store(name, &version, &install_dir)?;

        let install_display = install_dir.display().to_string();
        self.logger.info(
            "tools.installed",
            "tool installed",
            Some(log_fields([
                ("tool", name),
                ("version", version.as_str()),
                ("path", install_display.as_str()),
            ])),
        );
        Ok(install_dir)
    }

    /// Forget the cached install of `version`.
    pub fn uninstall(&self, version: &str) -> Result<()> {
        self.collaborators
            .cache
            .invalidate(self.definition.name(), version)
    }

    /// Environment for running an installed version: the tool's own
    /// variables plus `PATH` with the install directory prepended.
    pub fn tool_env(&self, version: &str) -> Result<BTreeMap<String, String>> {
        let install_dir = self.installed_path(version).ok_or_else(|| {
            ErrorEnvelope::expected(ErrorCode::new("tools", "not_installed"), "tool is not installed")
                .with_metadata("tool", self.definition.name())
                .with_metadata("version", version)
        })?;
        let metadata = self.definition.metadata(version)?;

        let mut env = metadata.env_vars;
        let mut entries = vec![install_dir];
        if let Some(existing) = env.get("PATH") {
            entries.extend(std::env::split_paths(existing));
        }
        let path = std::env::join_paths(entries).map_err(|error| {
            ErrorEnvelope::expected(ErrorCode::invalid_input(), error.to_string())
                .with_metadata("tool", self.definition.name())
        })?;
        env.insert("PATH".to_string(), path.to_string_lossy().into_owned());
        Ok(env)
    }
}

fn checksum_mismatch(tool: &str, version: &str, artifact: &Path) -> ErrorEnvelope {
    ErrorEnvelope::expected(
        ErrorCode::new("tools", "checksum_mismatch"),
        "artifact checksum does not match",
    )
    .with_metadata("tool", tool)
    .with_metadata("version", version)
    .with_metadata("artifact", artifact.display().to_string())
}
