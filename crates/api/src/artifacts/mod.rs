// Path: crates/api/src/artifacts/mod.rs
//! Defines the trait for resolving contract bytecode.

use async_trait::async_trait;
use gauntlet_types::error::ArtifactError;

/// Resolves the wasm bytecode of a contract by id.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Loads `contract` at `version`, or at the source's default version.
    async fn load(&self, contract: &str, version: Option<&str>) -> Result<Vec<u8>, ArtifactError>;
}
