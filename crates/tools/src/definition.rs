//! Per-tool description supplied by the host application.

use foundation_ports::ToolMetadata;
use foundation_shared::Result;

/// Describes one installable tool.
pub trait ToolDefinition: Send + Sync {
    /// Tool name, used as the cache key.
    fn name(&self) -> &str;

    /// Versions that can be installed.
    fn available_versions(&self) -> Result<Vec<String>>;

    /// Download and install metadata for a concrete version.
    fn metadata(&self, version: &str) -> Result<ToolMetadata>;
}

impl<T: ToolDefinition + ?Sized> ToolDefinition for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn available_versions(&self) -> Result<Vec<String>> {
        (**self).available_versions()
    }

    fn metadata(&self, version: &str) -> Result<ToolMetadata> {
        (**self).metadata(version)
    }
}
