/// The run configuration persisted to `args.yaml`.
use serde::{Deserialize, Serialize};

/// Default `--chunk-size`.
pub const DEFAULT_CHUNK_SIZE: &str = "1MB";

/// Default `--total-size`.
pub const DEFAULT_TOTAL_SIZE: &str = "10MB";

/// Default `--algorithm`.
pub const DEFAULT_ALGORITHM: &str = "defaultTestAlgorithm";

/// Parsed scenario arguments for one invocation.
///
/// Sizes are kept as the operator typed them (value plus unit suffix, e.g. `"2MB"`);
/// nothing here interprets them. Field order is the key order in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Path of the web structure file. Contents are opaque.
    pub structure: String,
    /// Size of a single chunk.
    pub chunk_size: String,
    /// Size of the total file.
    pub total_size: String,
    /// Algorithm identifier.
    pub algorithm: String,
}

impl RunConfiguration {
    /// Build a configuration for `structure` with every other field at its default.
    #[cfg(test)]
    #[must_use]
    pub fn with_defaults(structure: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            chunk_size: DEFAULT_CHUNK_SIZE.to_owned(),
            total_size: DEFAULT_TOTAL_SIZE.to_owned(),
            algorithm: DEFAULT_ALGORITHM.to_owned(),
        }
    }

    /// `(key, value)` pairs in persisted order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("structure", &self.structure),
            ("chunk_size", &self.chunk_size),
            ("total_size", &self.total_size),
            ("algorithm", &self.algorithm),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults() {
        let cfg = RunConfiguration::with_defaults("structure.file");
        assert_eq!(cfg.structure, "structure.file");
        assert_eq!(cfg.chunk_size, "1MB");
        assert_eq!(cfg.total_size, "10MB");
        assert_eq!(cfg.algorithm, "defaultTestAlgorithm");
    }

    #[test]
    fn test_entries_follow_field_order() {
        let cfg = RunConfiguration::with_defaults("s.file");
        let keys: Vec<&str> = cfg.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["structure", "chunk_size", "total_size", "algorithm"]);
    }
}
