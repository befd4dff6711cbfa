// Path: crates/api/src/rdd/mod.rs
//! Defines the RDD source trait.

use gauntlet_types::error::ConfigError;
use gauntlet_types::rdd::Rdd;
use std::path::Path;

/// Loads reporting-directory-data. The result is read-only input to input construction.
pub trait RddSource: Send + Sync {
    /// Loads the RDD at `path`.
    fn load(&self, path: &str) -> Result<Rdd, ConfigError>;
}

/// Reads RDD files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRddSource;

impl RddSource for FileRddSource {
    fn load(&self, path: &str) -> Result<Rdd, ConfigError> {
        tracing::debug!(target: "rdd", path, "loading RDD");
        Rdd::from_file(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdd.json");
        std::fs::write(&path, r#"{ "contracts": {}, "operators": {} }"#).unwrap();
        let rdd = FileRddSource.load(path.to_str().unwrap()).unwrap();
        assert!(rdd.contracts.is_empty());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = FileRddSource.load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
