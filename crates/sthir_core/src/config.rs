use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_FALSE_POSITIVE};
use crate::errors::Result;
use crate::sizing::{validate_chunk_size, validate_false_positive};

/// Build parameters shared by every document in an index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Target false positive rate, in (0, 1].
    pub false_positive: f64,
    /// Bits per counter, in [1, 10]; counters saturate at 2^chunk_size - 1.
    pub chunk_size: u8,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            false_positive: DEFAULT_FALSE_POSITIVE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        validate_false_positive(self.false_positive)?;
        validate_chunk_size(self.chunk_size)
    }

    /// Reads a JSON config; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: BuildConfig = serde_json::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SthirError;

    #[test]
    fn defaults_are_valid() {
        let c = BuildConfig::default();
        assert_eq!(c.chunk_size, 4);
        assert_eq!(c.false_positive, 0.01);
        c.validate().unwrap();
    }

    #[test]
    fn load_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cfg.json");
        fs::write(&p, r#"{ "chunk_size": 6 }"#).unwrap();
        let c = BuildConfig::load(&p).unwrap();
        assert_eq!(c.chunk_size, 6);
        assert_eq!(c.false_positive, DEFAULT_FALSE_POSITIVE);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cfg.json");
        fs::write(&p, r#"{ "false_positive": 2.0 }"#).unwrap();
        assert!(matches!(BuildConfig::load(&p), Err(SthirError::FalsePositive(_))));
    }
}
