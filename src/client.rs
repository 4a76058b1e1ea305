//! Slack API client: paginated emoji listing, asset export, multipart
//! import with rate-limit retry, and chat message posting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{retry_after_seconds, Result, SlackError};
use crate::models::{ApiAck, Emoji, EmojiListResponse, PostMessageResponse};

/// Page size requested from the listing endpoint
const LIST_PAGE_SIZE: u32 = 1000;

/// Total attempts for a rate-limited upload before giving up
const MAX_UPLOAD_ATTEMPTS: u32 = 3;

/// Trait defining Slack operations for easier testing
#[async_trait]
pub trait SlackClient: Send + Sync {
    /// List every custom emoji in the workspace, concatenating all pages
    async fn list_emoji(&self) -> Result<Vec<Emoji>>;

    /// Download one emoji asset into `dest_dir`, returning the written path
    async fn export_emoji(&self, emoji: &Emoji, dest_dir: &Path) -> Result<PathBuf>;

    /// Upload a local image file as a named custom emoji
    async fn import_emoji(&self, name: &str, file_path: &Path) -> Result<()>;

    /// Post a message, optionally as a threaded reply
    async fn post_message(
        &self,
        text: &str,
        channel: &str,
        thread_ts: Option<&str>,
        broadcast: bool,
    ) -> Result<PostMessageResponse>;
}

/// Production client speaking the workspace admin endpoints over reqwest.
///
/// Listing and uploading authenticate with the session cookie plus the API
/// token in the request body; message posting uses the token as a bearer
/// credential against the public API host.
pub struct HttpSlackClient {
    http: reqwest::Client,
    workspace_url: String,
    message_url: String,
    token: String,
    cookie: String,
}

impl HttpSlackClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_urls(
            format!("https://{}.slack.com", config.team),
            "https://slack.com/api/chat.postMessage".to_string(),
            config.token.clone(),
            config.cookie.clone(),
        )
    }

    /// Construct against explicit endpoints. Tests point this at a local
    /// mock server instead of the real workspace.
    pub fn with_urls(
        workspace_url: String,
        message_url: String,
        token: String,
        cookie: String,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            workspace_url,
            message_url,
            token,
            cookie,
        })
    }
}

#[async_trait]
impl SlackClient for HttpSlackClient {
    async fn list_emoji(&self) -> Result<Vec<Emoji>> {
        let endpoint = format!("{}/api/emoji.adminList", self.workspace_url);
        let mut emojis = Vec::new();
        let mut page: i64 = 1;

        loop {
            debug!(page, "requesting emoji list page");
            let response = self
                .http
                .post(&endpoint)
                .header(COOKIE, self.cookie.as_str())
                .form(&[
                    ("query", String::new()),
                    ("page", page.to_string()),
                    ("count", LIST_PAGE_SIZE.to_string()),
                    ("token", self.token.clone()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(SlackError::UnexpectedStatus {
                    status: response.status().as_u16(),
                    endpoint: "emoji.adminList".to_string(),
                });
            }

            let body: EmojiListResponse = response.json().await?;
            if !body.ok {
                return Err(SlackError::Api(body.error.unwrap_or_else(|| {
                    "emoji.adminList returned ok=false".to_string()
                })));
            }

            emojis.extend(body.emoji);
            match body.paging {
                Some(paging) if paging.page < paging.pages => page = paging.page + 1,
                _ => break,
            }
        }

        info!(count = emojis.len(), "listed remote emoji");
        Ok(emojis)
    }

    async fn export_emoji(&self, emoji: &Emoji, dest_dir: &Path) -> Result<PathBuf> {
        let filename = asset_filename(&emoji.url)?;
        let dest = dest_dir.join(&filename);

        let response = self.http.get(&emoji.url).send().await?;
        if !response.status().is_success() {
            return Err(SlackError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint: emoji.url.clone(),
            });
        }
        let bytes = response.bytes().await?;

        // temp-then-rename keeps partial downloads out of the archive
        let tmp = dest_dir.join(format!(".{}.part", filename));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &dest).await?;

        debug!(name = %emoji.name, path = %dest.display(), "exported emoji");
        Ok(dest)
    }

    async fn import_emoji(&self, name: &str, file_path: &Path) -> Result<()> {
        info!(name, "importing emoji");
        let endpoint = format!("{}/api/emoji.add", self.workspace_url);
        let bytes = tokio::fs::read(file_path).await?;
        let upload_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        for attempt in 1..=MAX_UPLOAD_ATTEMPTS {
            let image = Part::bytes(bytes.clone()).file_name(upload_name.clone());
            let form = Form::new()
                .text("mode", "data")
                .text("name", name.to_string())
                .text("token", self.token.clone())
                .part("image", image);

            let response = self
                .http
                .post(&endpoint)
                .header(COOKIE, self.cookie.as_str())
                .multipart(form)
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after_seconds(&response);
                warn!(name, attempt, wait, "rate limited while uploading, backing off");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !response.status().is_success() {
                return Err(SlackError::UnexpectedStatus {
                    status: response.status().as_u16(),
                    endpoint: "emoji.add".to_string(),
                });
            }

            // HTTP 200 does not mean the upload took; the body's ok flag does
            let ack: ApiAck = response.json().await?;
            if !ack.ok {
                return Err(SlackError::Api(ack.error.unwrap_or_else(|| {
                    format!("emoji.add rejected {}", name)
                })));
            }

            debug!(name, "uploaded emoji");
            return Ok(());
        }

        Err(SlackError::Api(format!(
            "gave up on {} after {} rate-limited attempts",
            name, MAX_UPLOAD_ATTEMPTS
        )))
    }

    async fn post_message(
        &self,
        text: &str,
        channel: &str,
        thread_ts: Option<&str>,
        broadcast: bool,
    ) -> Result<PostMessageResponse> {
        let mut body = serde_json::json!({
            "channel": channel,
            "text": text,
        });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = serde_json::Value::from(ts);
            if broadcast {
                body["reply_broadcast"] = serde_json::Value::from(true);
            }
        }

        let response = self
            .http
            .post(&self.message_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SlackError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint: "chat.postMessage".to_string(),
            });
        }

        let decoded: PostMessageResponse = response.json().await?;
        Ok(decoded)
    }
}

/// Derive the archive filename for an emoji asset URL.
///
/// Asset paths look like `/TEAMID/<name>/<hash>.<ext>`; the stored file is
/// the URL-decoded emoji name plus the asset's original extension.
fn asset_filename(raw: &str) -> Result<String> {
    let parsed =
        Url::parse(raw).map_err(|e| SlackError::InvalidAssetUrl(format!("{}: {}", raw, e)))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();

    let name = segments
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SlackError::InvalidAssetUrl(format!("no name segment in {}", raw)))?;
    let name = urlencoding::decode(name)
        .map_err(|e| SlackError::InvalidAssetUrl(format!("{}: {}", raw, e)))?;

    let ext = segments
        .last()
        .and_then(|last| last.rsplit_once('.').map(|(_, ext)| ext));

    Ok(match ext {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_filename_basic() {
        let filename =
            asset_filename("https://emoji.slack-edge.com/T0123/partyparrot/a1b2c3.gif").unwrap();
        assert_eq!(filename, "partyparrot.gif");
    }

    #[test]
    fn test_asset_filename_decodes_percent_escapes() {
        let filename =
            asset_filename("https://emoji.slack-edge.com/T0123/caf%C3%A9/ffee00.png").unwrap();
        assert_eq!(filename, "café.png");
    }

    #[test]
    fn test_asset_filename_without_extension() {
        let filename = asset_filename("https://emoji.slack-edge.com/T0123/plain/hash").unwrap();
        assert_eq!(filename, "plain");
    }

    #[test]
    fn test_asset_filename_rejects_alias_urls() {
        assert!(asset_filename("alias:partyparrot").is_err());
        assert!(asset_filename("not a url").is_err());
    }
}
