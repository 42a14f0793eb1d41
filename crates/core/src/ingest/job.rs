use std::ops::AddAssign;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::IngestError;
use crate::card::{convert_card, has_separate_back_face, ConvertError, RawCard};
use crate::catalog::{Catalog, CatalogShard};
use crate::snapshot;
use crate::upstream::UpstreamFeed;

/// Records per shard in a parallel build.
pub const DEFAULT_SHARD_SIZE: usize = 4096;

/// Summary of one catalog build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Upstream records examined.
    pub records_seen: usize,
    /// Cards added to the catalog, extra faces included.
    pub cards_added: usize,
    /// Back faces added as separate cards.
    pub extra_faces: usize,
    /// Records that were malformed or could not be converted.
    pub skipped: usize,
}

impl AddAssign for BuildReport {
    fn add_assign(&mut self, other: Self) {
        self.records_seen += other.records_seen;
        self.cards_added += other.cards_added;
        self.extra_faces += other.extra_faces;
        self.skipped += other.skipped;
    }
}

/// Convert every record and fold the results into a fresh catalog.
///
/// Double-faced layouts contribute their back face first, as an extra face,
/// then their front face. Unconvertible records are skipped with a warning.
pub fn build_catalog(records: &[RawCard]) -> Result<(Catalog, BuildReport), IngestError> {
    let (shard, report) = build_shard(records);
    check_report(&report)?;
    Ok((shard.into_catalog(), report))
}

/// Same result as `build_catalog`, with shards of `shard_size` records built
/// on the rayon pool and merged in feed order.
pub fn build_catalog_parallel(
    records: &[RawCard],
    shard_size: usize,
) -> Result<(Catalog, BuildReport), IngestError> {
    let shards: Vec<(CatalogShard, BuildReport)> = records
        .par_chunks(shard_size.max(1))
        .map(build_shard)
        .collect();

    let mut catalog = Catalog::new();
    let mut report = BuildReport::default();
    for (shard, shard_report) in shards {
        catalog.merge(shard);
        report += shard_report;
    }

    check_report(&report)?;
    Ok((catalog, report))
}

fn build_shard(records: &[RawCard]) -> (CatalogShard, BuildReport) {
    let mut shard = CatalogShard::new();
    let mut report = BuildReport::default();

    for raw in records {
        report.records_seen += 1;
        if let Err(e) = add_record(&mut shard, raw, &mut report) {
            warn!(error = %e, "Skipping unconvertible record");
            report.skipped += 1;
        }
    }

    (shard, report)
}

fn add_record(
    shard: &mut CatalogShard,
    raw: &RawCard,
    report: &mut BuildReport,
) -> Result<(), ConvertError> {
    let back = if has_separate_back_face(raw) {
        Some(convert_card(raw, true)?)
    } else {
        None
    };
    let front = convert_card(raw, false)?;

    if let Some(back) = back {
        shard.add_card(back, true);
        report.extra_faces += 1;
        report.cards_added += 1;
    }
    shard.add_card(front, false);
    report.cards_added += 1;

    Ok(())
}

fn check_report(report: &BuildReport) -> Result<(), IngestError> {
    if report.records_seen > 0 && report.cards_added == 0 {
        return Err(IngestError::NoConvertibleRecords(report.records_seen));
    }
    Ok(())
}

/// Fetch records from `feed`, build a catalog and save it to `target_dir`.
///
/// A feed failure returns before anything is written. Malformed feed
/// records count as skipped.
pub async fn run_update(
    feed: &dyn UpstreamFeed,
    target_dir: &Path,
) -> Result<BuildReport, IngestError> {
    let started = Instant::now();
    info!(feed = feed.name(), "Fetching upstream records");
    let batch = feed.fetch_default_cards().await?;
    let malformed = batch.malformed;
    let records = batch.records;

    info!(records = records.len(), malformed, "Building catalog");
    let (catalog, mut report) = tokio::task::spawn_blocking(move || {
        build_catalog_parallel(&records, DEFAULT_SHARD_SIZE)
    })
    .await
    .map_err(|e| IngestError::Task(e.to_string()))??;

    report.records_seen += malformed;
    report.skipped += malformed;
    check_report(&report)?;

    if report.skipped > 0 {
        warn!(skipped = report.skipped, "Some records were skipped");
    }

    snapshot::save(&catalog, target_dir).await?;

    info!(
        records = report.records_seen,
        cards = report.cards_added,
        extra_faces = report.extra_faces,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Catalog update complete"
    );
    Ok(report)
}
