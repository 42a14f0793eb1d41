//! Export manifest written alongside the artifacts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Artifact, SnapshotError};
use crate::catalog::CatalogStats;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Record of one export: when it happened, how big each index was, and the
/// SHA-256 of every artifact file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub date_exported: DateTime<Utc>,
    pub counts: CatalogStats,
    /// Artifact file name to lowercase hex digest.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(counts: CatalogStats) -> Self {
        Self {
            date_exported: Utc::now(),
            counts,
            checksums: BTreeMap::new(),
        }
    }

    pub fn record_checksum(&mut self, artifact: Artifact, checksum: String) {
        self.checksums
            .insert(artifact.file_name().to_string(), checksum);
    }

    /// Check loaded counts and checksums against what was exported.
    pub fn verify(
        &self,
        counts: &CatalogStats,
        checksums: &BTreeMap<String, String>,
    ) -> Result<(), SnapshotError> {
        if &self.counts != counts {
            return Err(SnapshotError::ManifestMismatch(format!(
                "counts differ: manifest {:?}, loaded {:?}",
                self.counts, counts
            )));
        }

        for (file, expected) in &self.checksums {
            match checksums.get(file) {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(SnapshotError::ManifestMismatch(format!(
                        "checksum of {} is {}, manifest says {}",
                        file, actual, expected
                    )))
                }
                None => {
                    return Err(SnapshotError::ManifestMismatch(format!(
                        "{} listed in manifest but not loaded",
                        file
                    )))
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(cards: usize) -> CatalogStats {
        CatalogStats {
            cards,
            ..Default::default()
        }
    }

    #[test]
    fn test_verify_accepts_matching() {
        let mut manifest = Manifest::new(counts(3));
        manifest.record_checksum(Artifact::Names, "abc".to_string());

        let loaded: BTreeMap<_, _> = [("names.json".to_string(), "abc".to_string())].into();
        assert!(manifest.verify(&counts(3), &loaded).is_ok());
    }

    #[test]
    fn test_verify_rejects_count_drift() {
        let manifest = Manifest::new(counts(3));
        let err = manifest.verify(&counts(2), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, SnapshotError::ManifestMismatch(_)));
    }

    #[test]
    fn test_verify_rejects_checksum_drift() {
        let mut manifest = Manifest::new(counts(0));
        manifest.record_checksum(Artifact::CardTree, "abc".to_string());

        let loaded: BTreeMap<_, _> = [("cardtree.json".to_string(), "def".to_string())].into();
        let err = manifest.verify(&counts(0), &loaded).unwrap_err();
        assert!(err.to_string().contains("cardtree.json"));
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest::new(counts(5));
        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json["date_exported"].is_string());
        assert_eq!(json["counts"]["cards"], 5);
    }
}
