//! # foundation-tools
//!
//! Thin orchestration over the tool collaborator ports: resolve a version
//! spec, reuse a cached install or download, verify and install it.
//!
//! This crate depends on `ports` and `shared` only.

pub mod definition;
pub mod manager;

pub use definition::ToolDefinition;
pub use manager::{ToolCollaborators, ToolManager};

/// Returns the tools crate version.
#[must_use]
pub const fn tools_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_crate_compiles() {
        assert!(!tools_crate_version().is_empty());
    }
}
