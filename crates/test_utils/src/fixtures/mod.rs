//! Test fixtures for reproducible tests

use gauntlet_types::app::{Event, TxResponse, WASM_EVENT};
use gauntlet_types::rdd::Rdd;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A four-operator RDD with one aggregator, [`FIXTURE_AGGREGATOR`].
pub const RDD_JSON: &str = include_str!("../../fixtures/rdd.json");

/// The aggregator address in [`RDD_JSON`].
pub const FIXTURE_AGGREGATOR: &str = "wasm13cz5jjr74ztusal7ttjj3qftjcl3s4e383vptw4mtpaz0p7h827qfaewgt";

/// The account [`crate::MockSubmitter`] signs as by default.
pub const FIXTURE_SENDER: &str = "wasm1pgm8hyk0pvphmlvfjc8wsvk4daluz5tg3ly25n";

/// The transmitter of operator `alpha` in [`RDD_JSON`].
pub const FIXTURE_TRANSMITTER: &str = "wasm1au30n7654adqaqp0u3xa2mqw3vy75er3tx67es";

/// The master secret used by fixtures.
pub const FIXTURE_SECRET: &str = "awe fluke polygon tonic lilly acuity onyx debra bound gilbert wane";

/// A fixed 12-word phrase, so encoded configs are reproducible.
pub const FIXTURE_WORDS: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Parses [`RDD_JSON`].
pub fn rdd_fixture() -> Result<Rdd, serde_json::Error> {
    serde_json::from_str(RDD_JSON)
}

/// A confirmed transaction carrying one `wasm` event with the given attributes.
pub fn wasm_tx(hash: &str, attributes: &[(&str, &str)]) -> TxResponse {
    TxResponse {
        transaction_hash: hash.to_string(),
        events: vec![Event::new(WASM_EVENT, attributes.iter().copied())],
        ..Default::default()
    }
}

/// A confirmed instantiation of `address`.
pub fn instantiate_tx(hash: &str, address: &str) -> TxResponse {
    TxResponse {
        transaction_hash: hash.to_string(),
        contract_address: Some(address.to_string()),
        events: vec![Event::new("instantiate", [("_contract_address", address)])],
        ..Default::default()
    }
}

/// Test fixture manager over a temporary directory, removed on drop
pub struct Fixtures {
    /// Keeps the directory alive
    dir: tempfile::TempDir,
}

impl Fixtures {
    /// Create a new fixtures manager in a fresh temporary directory
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// The base directory
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Get a fixture file path
    pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.dir.path().join(relative_path)
    }

    /// Write data to a fixture file
    pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(
        &self,
        relative_path: P,
        contents: C,
    ) -> io::Result<PathBuf> {
        let path = self.path(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write [`RDD_JSON`] to `rdd.json` and return its path
    pub fn write_rdd(&self) -> io::Result<PathBuf> {
        self.write("rdd.json", RDD_JSON)
    }
}
