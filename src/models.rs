use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A custom emoji record as returned by the admin listing endpoint.
///
/// Records are immutable once listed; the remote service is the source of
/// truth. Unknown response fields are ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Emoji {
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Creation time in unix seconds
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub is_alias: i64,
    #[serde(default)]
    pub alias_for: String,
    #[serde(default)]
    pub user_display_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub team_id: String,
}

/// Paging block attached to each listing response page
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub count: i64,
    pub page: i64,
    pub pages: i64,
    #[serde(default)]
    pub total: i64,
}

/// One page of the emoji listing endpoint, decoded exactly once
#[derive(Debug, Deserialize)]
pub struct EmojiListResponse {
    pub ok: bool,
    #[serde(default)]
    pub emoji: Vec<Emoji>,
    #[serde(default)]
    pub error: Option<String>,
    pub paging: Option<Paging>,
}

/// Acknowledgement body for write endpoints (`emoji.add`).
///
/// Slack reports application-level failure in the body while still
/// returning HTTP 200, so the `ok` flag is the real success signal.
#[derive(Debug, Deserialize)]
pub struct ApiAck {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `chat.postMessage`; `ts` threads follow-up messages
#[derive(Debug, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A pre-fetched emoji listing kept as a local JSON document.
///
/// Interchangeable with a live listing for the export flow: a success flag
/// plus a name-to-URL map.
#[derive(Debug, Deserialize)]
pub struct EmojiSnapshot {
    pub ok: bool,
    #[serde(default)]
    pub emoji: BTreeMap<String, String>,
}

impl EmojiSnapshot {
    /// Read and decode a snapshot file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot: Self = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Flatten the snapshot into emoji records, sorted by name
    pub fn into_emojis(self) -> Vec<Emoji> {
        self.emoji
            .into_iter()
            .map(|(name, url)| Emoji {
                name,
                url,
                ..Emoji::default()
            })
            .collect()
    }
}

/// A downloaded or prepared emoji file in the local archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEmoji {
    /// Canonical name: the filename up to the first `.`
    pub name: String,
    pub filename: String,
    pub dir: PathBuf,
    /// Documentation directory mirroring the archive namespace
    pub doc_dir: PathBuf,
}

/// An uploader's contribution count within a reporting window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    pub name: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emoji_list_response_deserialization() {
        let body = r#"{
            "ok": true,
            "emoji": [
                {
                    "name": "partyparrot",
                    "url": "https://emoji.example.com/T123/partyparrot/abc123.gif",
                    "created": 1700000000,
                    "is_alias": 0,
                    "alias_for": "",
                    "user_display_name": "erin",
                    "user_id": "U123",
                    "can_delete": true
                }
            ],
            "custom_emoji_total_count": 1,
            "paging": {"count": 1000, "page": 1, "pages": 1, "total": 1}
        }"#;

        let decoded: EmojiListResponse = serde_json::from_str(body).unwrap();
        assert!(decoded.ok);
        assert_eq!(decoded.emoji.len(), 1);
        assert_eq!(decoded.emoji[0].name, "partyparrot");
        assert_eq!(decoded.emoji[0].user_display_name, "erin");
        assert_eq!(decoded.paging.unwrap().pages, 1);
    }

    #[test]
    fn test_error_response_deserialization() {
        let body = r#"{"ok": false, "error": "invalid_auth"}"#;
        let decoded: EmojiListResponse = serde_json::from_str(body).unwrap();
        assert!(!decoded.ok);
        assert_eq!(decoded.error.as_deref(), Some("invalid_auth"));
        assert!(decoded.emoji.is_empty());
        assert!(decoded.paging.is_none());
    }

    #[test]
    fn test_snapshot_into_emojis_sorted() {
        let snapshot = EmojiSnapshot {
            ok: true,
            emoji: BTreeMap::from([
                ("zebra".to_string(), "https://cdn.example.com/zebra.png".to_string()),
                ("aardvark".to_string(), "https://cdn.example.com/aardvark.gif".to_string()),
            ]),
        };

        let emojis = snapshot.into_emojis();
        assert_eq!(emojis.len(), 2);
        assert_eq!(emojis[0].name, "aardvark");
        assert_eq!(emojis[1].name, "zebra");
        assert_eq!(emojis[1].url, "https://cdn.example.com/zebra.png");
    }
}
