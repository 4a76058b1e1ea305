//! Export/import orchestration: cross-references the remote emoji set with
//! the local archive and runs the missing work on a bounded worker pool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::archive;
use crate::client::SlackClient;
use crate::error::{Result, SlackError};
use crate::models::{Emoji, EmojiSnapshot};

/// Progress callback type invoked once per finished work item
pub type ProgressCallback = Arc<dyn Fn() + Send + Sync>;

/// Outcome counts for an export run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome counts for an import run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub eligible: usize,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: bool,
}

/// Resolve the authoritative emoji list: a frozen snapshot file when given,
/// the live listing endpoint otherwise. The two are interchangeable inputs
/// for the rest of the export pipeline.
pub async fn resolve_emoji_source(
    client: &dyn SlackClient,
    snapshot: Option<&Path>,
) -> Result<Vec<Emoji>> {
    match snapshot {
        Some(path) => {
            info!(path = %path.display(), "loading emoji list from snapshot");
            let snapshot = EmojiSnapshot::load(path).await?;
            if !snapshot.ok {
                return Err(SlackError::Api(
                    "snapshot file is marked not ok".to_string(),
                ));
            }
            Ok(snapshot.into_emojis())
        }
        None => client.list_emoji().await,
    }
}

/// Download every emoji not already present in `output_dir`.
///
/// Re-runs are idempotent: names found by the archive scanner are skipped
/// without any network traffic. Individual download failures are logged and
/// counted but never abort sibling tasks; the call returns once every
/// submitted task has finished.
pub async fn export_emojis(
    client: &dyn SlackClient,
    emojis: Vec<Emoji>,
    output_dir: &Path,
    concurrency: usize,
    on_progress: Option<ProgressCallback>,
) -> Result<ExportSummary> {
    tokio::fs::create_dir_all(output_dir).await?;

    let downloaded: HashSet<String> = archive::list_downloaded_emojis(output_dir)?
        .into_iter()
        .map(|e| e.name)
        .collect();

    let (pending, skipped): (Vec<Emoji>, Vec<Emoji>) = emojis
        .into_iter()
        .partition(|e| !downloaded.contains(&e.name));
    let skipped = skipped.len();
    info!(pending = pending.len(), skipped, "starting export");

    let outcomes: Vec<bool> = stream::iter(pending.iter())
        .map(|emoji| {
            let on_progress = on_progress.clone();
            async move {
                let outcome = client.export_emoji(emoji, output_dir).await;
                if let Some(callback) = on_progress.as_ref() {
                    callback();
                }
                match outcome {
                    Ok(path) => {
                        debug!(name = %emoji.name, path = %path.display(), "downloaded");
                        true
                    }
                    Err(e) => {
                        error!(name = %emoji.name, error = %e, "error exporting emoji");
                        false
                    }
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let downloaded = outcomes.iter().filter(|ok| **ok).count();
    let failed = outcomes.len() - downloaded;
    info!(downloaded, skipped, failed, "export finished");

    Ok(ExportSummary {
        downloaded,
        skipped,
        failed,
    })
}

/// Upload local emoji files that do not already exist remotely.
///
/// Uploads run sequentially: the add endpoint rate-limits aggressively and
/// parallel submissions only trade progress for 429 churn. Dry-run stops
/// after the eligibility check and reports what would be uploaded.
pub async fn import_emojis(
    client: &dyn SlackClient,
    input_dir: &Path,
    dry_run: bool,
) -> Result<ImportSummary> {
    let files: Vec<(String, PathBuf)> = archive::list_downloaded_emojis(input_dir)?
        .into_iter()
        .map(|e| (e.name, e.dir.join(e.filename)))
        .collect();
    info!(count = files.len(), "found local emoji files");

    let existing: HashSet<String> = client
        .list_emoji()
        .await?
        .into_iter()
        .map(|e| e.name)
        .collect();
    info!(count = existing.len(), "found existing remote emoji");

    let total = files.len();
    let eligible: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter(|(name, _)| {
            if existing.contains(name) {
                debug!(name, "skipping duplicate emoji");
                return false;
            }
            true
        })
        .collect();

    let mut summary = ImportSummary {
        eligible: eligible.len(),
        skipped: total - eligible.len(),
        dry_run,
        ..ImportSummary::default()
    };

    if dry_run {
        info!(eligible = summary.eligible, "dry run, skipping upload");
        return Ok(summary);
    }

    for (name, path) in &eligible {
        match client.import_emoji(name, path).await {
            Ok(()) => summary.uploaded += 1,
            Err(e) => {
                error!(name, error = %e, "error importing emoji");
                summary.failed += 1;
            }
        }
    }

    info!(
        uploaded = summary.uploaded,
        skipped = summary.skipped,
        failed = summary.failed,
        "import finished"
    );
    Ok(summary)
}
