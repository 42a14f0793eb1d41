//! Reading and writing snapshot directories.

use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

use super::artifact::{Artifact, ArtifactData};
use super::manifest::{Manifest, MANIFEST_FILE};
use super::SnapshotError;
use crate::catalog::Catalog;

/// Write every artifact of `catalog` into `target_dir`, then the manifest.
///
/// Any failure aborts the save. Artifacts already renamed into place stay
/// there; running the save again rewrites all of them.
pub async fn save(catalog: &Catalog, target_dir: &Path) -> Result<Manifest, SnapshotError> {
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| SnapshotError::io(target_dir, e))?;

    let mut manifest = Manifest::new(catalog.stats());

    for artifact in Artifact::ALL {
        let bytes = artifact.to_json(catalog)?;
        manifest.record_checksum(artifact, checksum(&bytes));
        write_atomic(target_dir, artifact.file_name(), &bytes).await?;
        debug!(artifact = %artifact, bytes = bytes.len(), "Wrote artifact");
    }

    let bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| SnapshotError::parse(MANIFEST_FILE, e))?;
    write_atomic(target_dir, MANIFEST_FILE, &bytes).await?;

    info!(
        dir = %target_dir.display(),
        cards = manifest.counts.cards,
        names = manifest.counts.names,
        "Saved catalog snapshot"
    );

    Ok(manifest)
}

/// Read every artifact from `source_dir`. The manifest is not consulted.
pub async fn load(source_dir: &Path) -> Result<Catalog, SnapshotError> {
    let (catalog, _) = load_with_checksums(source_dir).await?;
    info!(
        dir = %source_dir.display(),
        cards = catalog.dict.len(),
        "Loaded catalog snapshot"
    );
    Ok(catalog)
}

/// Read every artifact and check them against `manifest.json`.
pub async fn load_verified(source_dir: &Path) -> Result<Catalog, SnapshotError> {
    let manifest = read_manifest(source_dir).await?;
    let (catalog, checksums) = load_with_checksums(source_dir).await?;
    manifest.verify(&catalog.stats(), &checksums)?;

    info!(
        dir = %source_dir.display(),
        cards = catalog.dict.len(),
        exported = %manifest.date_exported,
        "Loaded verified catalog snapshot"
    );
    Ok(catalog)
}

/// Read a single artifact file.
pub async fn load_artifact(path: &Path, artifact: Artifact) -> Result<ArtifactData, SnapshotError> {
    let bytes = read_file(path, artifact.file_name()).await?;
    parse_blocking(artifact, bytes).await
}

pub async fn read_manifest(dir: &Path) -> Result<Manifest, SnapshotError> {
    let bytes = read_file(&dir.join(MANIFEST_FILE), MANIFEST_FILE).await?;
    serde_json::from_slice(&bytes).map_err(|e| SnapshotError::parse(MANIFEST_FILE, e))
}

async fn load_with_checksums(
    source_dir: &Path,
) -> Result<(Catalog, BTreeMap<String, String>), SnapshotError> {
    let mut catalog = Catalog::new();
    let mut checksums = BTreeMap::new();

    for artifact in Artifact::ALL {
        let path = source_dir.join(artifact.file_name());
        let bytes = read_file(&path, artifact.file_name()).await?;
        checksums.insert(artifact.file_name().to_string(), checksum(&bytes));

        let data = parse_blocking(artifact, bytes).await?;
        data.apply_to(&mut catalog);
        debug!(artifact = %artifact, "Loaded artifact");
    }

    Ok((catalog, checksums))
}

async fn parse_blocking(artifact: Artifact, bytes: Vec<u8>) -> Result<ArtifactData, SnapshotError> {
    tokio::task::spawn_blocking(move || ArtifactData::parse(artifact, &bytes))
        .await
        .map_err(|e| SnapshotError::Task(e.to_string()))?
}

async fn read_file(path: &Path, name: &str) -> Result<Vec<u8>, SnapshotError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SnapshotError::MissingArtifact {
            name: name.to_string(),
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        }),
        Err(e) => Err(SnapshotError::io(path, e)),
    }
}

async fn write_atomic(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<(), SnapshotError> {
    let tmp = dir.join(format!(".{}.tmp", file_name));
    let dest = dir.join(file_name);

    if let Err(e) = fs::write(&tmp, bytes).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(SnapshotError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, &dest).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(SnapshotError::io(&dest, e));
    }
    Ok(())
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
