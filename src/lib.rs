//! Slack custom-emoji bulk synchronization
//!
//! A command-line tool that mirrors a workspace's custom emoji into a local
//! archive, uploads new emoji from a directory of image files, paginates the
//! archive into Markdown documentation, and publishes release notes for
//! newly added emoji.
//!
//! # Overview
//!
//! - **Export**: download every emoji not already in the archive, on a
//!   bounded worker pool; re-runs skip everything already present
//! - **Import**: upload local image files whose names are not taken,
//!   sequentially, with bounded rate-limit retry
//! - **Docs**: partition the sorted archive into 100-emoji pages with
//!   prev/next links and write one Markdown file per page
//! - **Release notes**: contributor leaderboard plus the new-emoji list for
//!   a time window, posted as a message thread or printed to stdout
//!
//! # Example Usage
//!
//! ```no_run
//! use slackmoji::client::{HttpSlackClient, SlackClient};
//! use slackmoji::config::Config;
//! use slackmoji::sync;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Credentials come from SLACK_TEAM / SLACK_TOKEN / SLACK_COOKIE
//!     let config = Config::from_env()?;
//!     let client = HttpSlackClient::new(&config)?;
//!
//!     let emojis = client.list_emoji().await?;
//!     let summary = sync::export_emojis(
//!         &client,
//!         emojis,
//!         Path::new("./export"),
//!         config.concurrency,
//!         None,
//!     )
//!     .await?;
//!     println!("downloaded {} emoji", summary.downloaded);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`archive`] - local emoji archive scanner
//! - [`cli`] - command-line interface and per-command pipelines
//! - [`client`] - Slack API client (listing, export, import, messages)
//! - [`config`] - environment-sourced configuration
//! - [`error`] - error types and result alias
//! - [`models`] - core data structures and typed API responses
//! - [`pagination`] - fixed-size archive pagination for docs
//! - [`report`] - release-note and documentation rendering
//! - [`sync`] - export/import orchestration with a bounded worker pool

pub mod archive;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod report;
pub mod sync;

// Re-export commonly used types for convenience
pub use error::{Result, SlackError};

pub use client::{HttpSlackClient, SlackClient};
pub use config::Config;
pub use models::{Emoji, LocalEmoji, Rank};
pub use pagination::EmojiPage;
pub use sync::{ExportSummary, ImportSummary};
