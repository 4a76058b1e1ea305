//! Command-line interface and per-command pipelines

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::info;

use crate::archive;
use crate::client::SlackClient;
use crate::config::Config;
use crate::error::{Result, SlackError};
use crate::pagination;
use crate::report;
use crate::sync::{self, ProgressCallback};

#[derive(Parser, Debug)]
#[command(name = "slackmoji")]
#[command(version)]
#[command(about = "Bulk export/import of Slack custom emoji", long_about = None)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull all emoji from the workspace into a local archive
    Export {
        /// Directory to download into
        #[arg(short, long, default_value = "./export")]
        directory: PathBuf,

        /// Worker pool width (overrides SLACK_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Export from a JSON snapshot file instead of the live listing
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Upload a directory of image files as new custom emoji
    Import {
        /// Directory to read image files from
        #[arg(short, long, default_value = "./import")]
        directory: PathBuf,

        /// List what would be uploaded without uploading anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate paginated Markdown docs for an archive namespace
    Docs {
        /// Namespace directory under the input root
        namespace: String,

        /// Root of the emoji archive
        #[arg(short = 'i', long, default_value = "./emojis")]
        input_root: PathBuf,

        /// Root of the generated docs tree
        #[arg(short = 'o', long, default_value = "./docs")]
        output_root: PathBuf,
    },

    /// Generate and publish release notes for a time window
    ReleaseNotes {
        /// Window start (YYYY-MM-DD or RFC 3339); default 14 days before end
        #[arg(long)]
        start: Option<String>,

        /// Window end; default now
        #[arg(long)]
        end: Option<String>,
    },

    /// Print uploader statistics for the whole workspace
    Stats,

    /// Print the version
    Version,
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>6}/{len:6} {msg}")
            .expect("static progress template")
            .progress_chars("##-");

        Self {
            multi: MultiProgress::new(),
            bar_style,
        }
    }

    pub fn add_progress_bar(&self, len: u64, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(self.bar_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Export pipeline: resolve the emoji source, then drain the download pool
pub async fn run_export(
    config: &Config,
    client: &dyn SlackClient,
    directory: &Path,
    concurrency_override: Option<usize>,
    snapshot: Option<&Path>,
) -> Result<()> {
    let concurrency = concurrency_override.unwrap_or(config.concurrency);
    // the flag bypasses Config::validate, so guard the pool width here too
    if concurrency == 0 {
        return Err(SlackError::Config(
            "concurrency must be at least 1".to_string(),
        ));
    }

    let emojis = sync::resolve_emoji_source(client, snapshot).await?;

    let reporter = ProgressReporter::new();
    let bar = reporter.add_progress_bar(emojis.len() as u64, "Downloading emoji...");
    let on_progress: ProgressCallback = Arc::new({
        let bar = bar.clone();
        move || bar.inc(1)
    });

    let summary =
        sync::export_emojis(client, emojis, directory, concurrency, Some(on_progress)).await?;
    bar.finish_with_message(format!(
        "Downloaded {} emoji ({} already present, {} failed)",
        summary.downloaded, summary.skipped, summary.failed
    ));
    Ok(())
}

/// Import pipeline: filter against the remote set, then upload sequentially
pub async fn run_import(client: &dyn SlackClient, directory: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("Running in DRY RUN mode - nothing will be uploaded");
    }

    let summary = sync::import_emojis(client, directory, dry_run).await?;

    println!("\n========================================");
    println!("Import Summary");
    println!("========================================");
    println!("Eligible: {}", summary.eligible);
    println!("Already on the workspace: {}", summary.skipped);
    if summary.dry_run {
        println!("Uploaded: 0 (dry run)");
    } else {
        println!("Uploaded: {}", summary.uploaded);
        println!("Failed: {}", summary.failed);
    }
    println!("========================================");
    Ok(())
}

/// Docs pipeline: scan one namespace, paginate, write the page files
pub async fn run_docs(namespace: &str, input_root: &Path, output_root: &Path) -> Result<()> {
    let emojis = archive::list_downloaded_emojis(&input_root.join(namespace))?;
    info!(namespace, count = emojis.len(), "scanned archive namespace");

    let pages = pagination::paginate_emoji_list(&emojis, namespace);
    let out_dir = output_root.join(namespace);
    tokio::fs::create_dir_all(&out_dir).await?;

    for page in &pages {
        let path = out_dir.join(format!("{}.md", page.key));
        tokio::fs::write(&path, report::render_doc_page(page, namespace)).await?;
    }
    tokio::fs::write(
        out_dir.join("index.md"),
        report::render_doc_index(&pages, namespace),
    )
    .await?;

    info!(pages = pages.len(), dir = %out_dir.display(), "wrote docs");
    Ok(())
}

/// Release-notes pipeline: list, filter to the window, publish
pub async fn run_release_notes(
    config: &Config,
    client: &dyn SlackClient,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let end = match end {
        Some(raw) => parse_window_time(raw)?,
        None => Utc::now(),
    };
    let start = match start {
        Some(raw) => parse_window_time(raw)?,
        None => end - ChronoDuration::days(14),
    };
    if start > end {
        return Err(SlackError::Config(format!(
            "window start {} is after end {}",
            start, end
        )));
    }

    let emojis = client.list_emoji().await?;
    report::publish_release_notes(
        client,
        &emojis,
        start,
        end,
        config.release_channel.as_deref(),
    )
    .await
}

/// Stats pipeline: list everything and print the aggregate breakdown
pub async fn run_stats(client: &dyn SlackClient) -> Result<()> {
    let emojis = client.list_emoji().await?;
    let stats = report::build_stats(&emojis);
    println!("{}", report::render_stats(&stats));
    Ok(())
}

/// Accept RFC 3339 timestamps or bare dates for the reporting window
fn parse_window_time(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| SlackError::Config(format!("invalid window time {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_time_date() {
        let parsed = parse_window_time("2025-06-01").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-06-01 00:00:00");
    }

    #[test]
    fn test_parse_window_time_rfc3339() {
        let parsed = parse_window_time("2025-06-01T12:30:00Z").unwrap();
        assert_eq!(parsed.timestamp(), 1748781000);
    }

    #[test]
    fn test_parse_window_time_rejects_garbage() {
        assert!(parse_window_time("last tuesday").is_err());
    }

    #[test]
    fn test_cli_parses_export_flags() {
        let cli = Cli::try_parse_from([
            "slackmoji",
            "export",
            "--directory",
            "/tmp/emoji",
            "--concurrency",
            "8",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                directory,
                concurrency,
                snapshot,
            } => {
                assert_eq!(directory, PathBuf::from("/tmp/emoji"));
                assert_eq!(concurrency, Some(8));
                assert!(snapshot.is_none());
            }
            other => panic!("parsed into {:?}", other),
        }
    }

    #[test]
    fn test_cli_import_defaults() {
        let cli = Cli::try_parse_from(["slackmoji", "import"]).unwrap();
        match cli.command {
            Commands::Import { directory, dry_run } => {
                assert_eq!(directory, PathBuf::from("./import"));
                assert!(!dry_run);
            }
            other => panic!("parsed into {:?}", other),
        }
    }
}
