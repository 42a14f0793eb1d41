use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

use cardcatalog_core::snapshot::{self, Artifact, MANIFEST_FILE};
use cardcatalog_core::testing::fixtures;
use cardcatalog_core::RawCard;

/// Scratch directory holding a config, a records file and the snapshot output
struct JobHarness {
    dir: TempDir,
}

impl JobHarness {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("private")
    }

    fn records_path(&self) -> PathBuf {
        self.dir.path().join("cards.json")
    }

    fn write_records(&self, records: &[RawCard]) {
        std::fs::write(self.records_path(), serde_json::to_vec(records).unwrap()).unwrap();
    }

    fn write_config(&self, upstream: &str) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        let content = format!(
            r#"
[catalog]
data_dir = "{}"

{}
"#,
            self.data_dir().display(),
            upstream
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    fn file_upstream(&self) -> String {
        format!(
            r#"
[upstream]
source = "file"
file = "{}"
"#,
            self.records_path().display()
        )
    }
}

/// Run the job to completion
async fn run_job(config_path: &Path) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_update-cards"))
        .env("CARDCATALOG_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .output()
        .await
        .expect("Failed to run update-cards")
}

#[tokio::test]
async fn test_update_job_writes_snapshot() {
    let harness = JobHarness::new();
    harness.write_records(&fixtures::raw_printings(99, 21));
    let config = harness.write_config(&harness.file_upstream());

    let output = run_job(&config).await;
    assert!(
        output.status.success(),
        "job failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for artifact in Artifact::ALL {
        assert!(
            harness.data_dir().join(artifact.file_name()).exists(),
            "{} missing",
            artifact
        );
    }
    assert!(harness.data_dir().join(MANIFEST_FILE).exists());

    let catalog = snapshot::load_verified(&harness.data_dir()).await.unwrap();
    let stats = catalog.stats();
    assert_eq!(stats.cards, 99);
    assert_eq!(stats.names, 99);
    assert_eq!(stats.tree_buckets, 21);
    assert_eq!(stats.full_name_buckets, 21);
}

#[tokio::test]
async fn test_update_job_expands_double_faced_cards() {
    let harness = JobHarness::new();
    harness.write_records(&[
        fixtures::inspiring_veteran(),
        fixtures::scorned_villager(),
        fixtures::flaxen_intruder(),
    ]);
    let config = harness.write_config(&harness.file_upstream());

    let output = run_job(&config).await;
    assert!(output.status.success());

    let catalog = snapshot::load_verified(&harness.data_dir()).await.unwrap();
    assert_eq!(catalog.dict.len(), 4);
    assert!(catalog.name_to_id.contains_key("moonscarred werewolf"));
    assert!(!catalog.cardimages.contains_key("moonscarred werewolf"));
}

#[tokio::test]
async fn test_update_job_missing_config_fails() {
    let harness = JobHarness::new();
    let output = run_job(&harness.dir.path().join("nope.toml")).await;
    assert!(!output.status.success());
    assert!(!harness.data_dir().exists());
}

#[tokio::test]
async fn test_update_job_invalid_config_fails() {
    let harness = JobHarness::new();
    let config = harness.write_config(
        r#"
[upstream]
source = "file"
"#,
    );

    let output = run_job(&config).await;
    assert!(!output.status.success());
    assert!(!harness.data_dir().exists());
}

#[tokio::test]
async fn test_update_job_unconvertible_records_fail() {
    let harness = JobHarness::new();
    harness.write_records(&[RawCard {
        id: Some("nameless".to_string()),
        ..Default::default()
    }]);
    let config = harness.write_config(&harness.file_upstream());

    let output = run_job(&config).await;
    assert!(!output.status.success());
    assert!(!harness.data_dir().exists());
}
