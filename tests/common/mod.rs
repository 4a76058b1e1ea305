//! Common test utilities and fixtures

use std::path::{Path, PathBuf};

use mockall::mock;

use slackmoji::client::SlackClient;
use slackmoji::error::Result;
use slackmoji::models::{Emoji, PostMessageResponse};

mock! {
    pub Slack {}

    #[async_trait::async_trait]
    impl SlackClient for Slack {
        async fn list_emoji(&self) -> Result<Vec<Emoji>>;
        async fn export_emoji(&self, emoji: &Emoji, dest_dir: &Path) -> Result<PathBuf>;
        async fn import_emoji(&self, name: &str, file_path: &Path) -> Result<()>;
        #[mockall::concretize]
        async fn post_message(
            &self,
            text: &str,
            channel: &str,
            thread_ts: Option<&str>,
            broadcast: bool,
        ) -> Result<PostMessageResponse>;
    }
}

/// Create a test emoji with default values
pub fn test_emoji(name: &str, uploader: &str) -> Emoji {
    Emoji {
        name: name.to_string(),
        url: format!("https://emoji.example.com/T123/{}/abc123.gif", name),
        created: 1_700_000_000,
        user_display_name: uploader.to_string(),
        user_id: "U123".to_string(),
        ..Emoji::default()
    }
}

/// Create a test emoji pointing at an explicit asset URL
#[allow(dead_code)]
pub fn emoji_with_url(name: &str, url: &str) -> Emoji {
    Emoji {
        url: url.to_string(),
        ..test_emoji(name, "erin")
    }
}

/// Successful chat.postMessage response carrying a thread timestamp
#[allow(dead_code)]
pub fn ok_post_response(ts: &str) -> PostMessageResponse {
    PostMessageResponse {
        ok: true,
        ts: Some(ts.to_string()),
        error: None,
    }
}
