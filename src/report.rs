//! Release-note and documentation rendering: contributor leaderboards,
//! size-capped emoji list batches, and per-page archive markdown.
//!
//! Rendering is plain string building; posted output is split so no single
//! message crosses the platform body limit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::client::SlackClient;
use crate::error::{Result, SlackError};
use crate::models::{Emoji, Rank};
use crate::pagination::EmojiPage;

/// Hard cap on a posted message body
const MESSAGE_HARD_LIMIT: usize = 12_000;

/// Batch flush threshold, a safety margin below the hard cap
const BATCH_LIMIT: usize = 10_000;

/// Uploaders shown in the stats table
const STATS_TOP_N: usize = 25;

/// Count contributions per uploader display name.
///
/// Sorted by descending count; equal counts order alphabetically by name so
/// repeated runs produce identical reports.
pub fn build_ranks(emojis: &[Emoji]) -> Vec<Rank> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for emoji in emojis {
        *counts.entry(emoji.user_display_name.as_str()).or_insert(0) += 1;
    }

    let mut ranks: Vec<Rank> = counts
        .into_iter()
        .map(|(name, count)| Rank {
            name: name.to_string(),
            count,
        })
        .collect();
    ranks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranks
}

/// Render the leaderboard as a fixed-width table inside a code fence,
/// padded to the longest display name.
pub fn render_ranks(ranks: &[Rank]) -> String {
    let width = ranks
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("User".len());

    let mut out = String::from("```\n");
    out.push_str(&format!("{:<width$} | Count\n", "User", width = width));
    out.push_str(&format!("{:-<width$}-+------\n", "", width = width));
    for rank in ranks {
        out.push_str(&format!(
            "{:<width$} | {}\n",
            rank.name,
            rank.count,
            width = width
        ));
    }
    out.push_str("```\n");
    out
}

/// Render every emoji as a list line, concatenated into batches that stay
/// under [`BATCH_LIMIT`] characters.
///
/// A batch is flushed when appending the next line would cross the limit;
/// the final partial batch is always emitted, so the concatenation of all
/// batches reproduces every input line exactly once.
pub fn build_emoji_lists(emojis: &[Emoji]) -> Vec<String> {
    let mut batches = Vec::new();
    let mut batch = String::new();

    for emoji in emojis {
        let rendered = format!("* :{0}: | `:{0}:`\n", emoji.name);
        if batch.len() + rendered.len() > BATCH_LIMIT {
            batches.push(std::mem::take(&mut batch));
        }
        batch.push_str(&rendered);
    }

    batches.push(batch);
    batches
}

/// Title line carrying the reporting window
pub fn render_header(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "# :tada: Emoji Release Notes {} - {}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Keep only emoji created inside the reporting window (inclusive)
pub fn filter_to_window(emojis: &[Emoji], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Emoji> {
    emojis
        .iter()
        .filter(|e| e.created >= start.timestamp() && e.created <= end.timestamp())
        .cloned()
        .collect()
}

/// Build and deliver the release notes for a reporting window.
///
/// When a channel is configured and the rendered body fits the platform
/// limit, the header is posted first and the leaderboard plus each emoji
/// batch follow as threaded replies under it. Oversized bodies (or a
/// missing channel) fall back to standard output.
pub async fn publish_release_notes(
    client: &dyn SlackClient,
    emojis: &[Emoji],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    channel: Option<&str>,
) -> Result<()> {
    let window = filter_to_window(emojis, start, end);
    info!(count = window.len(), "emoji in reporting window");

    let header = render_header(start, end);
    let rank_table = render_ranks(&build_ranks(&window));
    let batches = build_emoji_lists(&window);

    let ranks_section = format!("## Uploaders\n\n{}", rank_table);
    let body_len =
        ranks_section.len() + "## New Emoji\n\n".len() + batches.iter().map(String::len).sum::<usize>();

    let channel = match channel {
        Some(channel) if body_len <= MESSAGE_HARD_LIMIT => channel,
        _ => {
            if body_len > MESSAGE_HARD_LIMIT {
                warn!(
                    length = body_len,
                    limit = MESSAGE_HARD_LIMIT,
                    "release notes exceed the posting limit, printing to stdout"
                );
            }
            println!("{}\n", header);
            println!("{}", ranks_section);
            println!("## New Emoji\n");
            for batch in &batches {
                print!("{}", batch);
            }
            return Ok(());
        }
    };

    let response = client.post_message(&header, channel, None, false).await?;
    if !response.ok {
        return Err(SlackError::Api(response.error.unwrap_or_else(|| {
            "chat.postMessage returned ok=false for the header".to_string()
        })));
    }
    let thread_ts = response.ts.ok_or_else(|| {
        SlackError::Api("chat.postMessage response carried no ts to thread under".to_string())
    })?;

    let ranks_reply = client
        .post_message(&ranks_section, channel, Some(&thread_ts), false)
        .await?;
    if !ranks_reply.ok {
        error!(error = ?ranks_reply.error, "failed posting the leaderboard reply");
    }

    for batch in &batches {
        let reply = client
            .post_message(batch, channel, Some(&thread_ts), false)
            .await?;
        if !reply.ok {
            error!(error = ?reply.error, "failed posting an emoji batch reply");
        }
    }

    Ok(())
}

/// Contribution statistics across the whole archive
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub top: Vec<Rank>,
    pub p99: f64,
    pub p90: f64,
    pub p75: f64,
    pub p50: f64,
    pub p25: f64,
}

/// Aggregate uploader statistics: top contributors plus the percentile
/// breakdown of per-uploader contribution counts.
pub fn build_stats(emojis: &[Emoji]) -> StatsReport {
    let ranks = build_ranks(emojis);
    let mut counts: Vec<usize> = ranks.iter().map(|r| r.count).collect();
    counts.sort_unstable();

    StatsReport {
        p99: percentile(&counts, 99.0),
        p90: percentile(&counts, 90.0),
        p75: percentile(&counts, 75.0),
        p50: percentile(&counts, 50.0),
        p25: percentile(&counts, 25.0),
        top: ranks.into_iter().take(STATS_TOP_N).collect(),
    }
}

pub fn render_stats(stats: &StatsReport) -> String {
    let mut md = String::from("# Emoji upload stats\n\n## Top uploaders\n\n");
    md.push_str(&render_ranks(&stats.top));
    md.push_str("\n## Upload count percentiles\n\n");
    for (label, value) in [
        ("p99", stats.p99),
        ("p90", stats.p90),
        ("p75", stats.p75),
        ("p50", stats.p50),
        ("p25", stats.p25),
    ] {
        md.push_str(&format!("* {}: {:.1}\n", label, value));
    }
    md
}

/// Linear-interpolated percentile over a sorted sample
fn percentile(sorted: &[usize], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let weight = rank - low as f64;
    sorted[low] as f64 * (1.0 - weight) + sorted[high] as f64 * weight
}

/// Render one archive page as a Markdown document
pub fn render_doc_page(page: &EmojiPage, namespace: &str) -> String {
    let mut md = format!("# Emoji archive: {}\n\n", page.key);

    let prev = if page.prev_page.is_empty() {
        "previous".to_string()
    } else {
        format!("[previous]({})", page.prev_page)
    };
    let next = if page.next_page.is_empty() {
        "next".to_string()
    } else {
        format!("[next]({})", page.next_page)
    };
    md.push_str(&format!("{} | {}\n\n", prev, next));

    md.push_str("| Emoji | Name |\n|---|---|\n");
    for emoji in &page.emojis {
        md.push_str(&format!(
            "| ![{0}]({1}) | `:{0}:` |\n",
            emoji.name,
            image_path(namespace, &emoji.filename)
        ));
    }
    md
}

/// Render the index document linking every page of a namespace
pub fn render_doc_index(pages: &[EmojiPage], namespace: &str) -> String {
    let total: usize = pages.iter().map(|p| p.emojis.len()).sum();
    let title = if namespace.is_empty() {
        "emoji archive".to_string()
    } else {
        format!("emoji archive: {}", namespace)
    };

    let mut md = format!("# {}\n\n{} emoji across {} pages.\n\n", title, total, pages.len());
    for page in pages {
        md.push_str(&format!("* [{0}](./{0}.md)\n", page.key));
    }
    md
}

fn image_path(namespace: &str, filename: &str) -> String {
    if namespace.is_empty() {
        format!("/emojis/{}", filename)
    } else {
        format!("/emojis/{}/{}", namespace, filename)
    }
}
