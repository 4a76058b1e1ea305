use thiserror::Error;

/// Type alias for Result with SlackError
pub type Result<T> = std::result::Result<T, SlackError>;

/// Error types for the emoji sync tool
#[derive(Error, Debug)]
pub enum SlackError {
    /// Slack returned an application-level error (`ok: false` body)
    #[error("Slack API error: {0}")]
    Api(String),

    /// Non-success HTTP status on an endpoint that should have succeeded
    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// Rate limit exceeded - should retry after specified seconds
    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    /// Transport-level failure (connection, TLS, body read)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Emoji source URL could not be turned into a local filename
    #[error("invalid asset URL: {0}")]
    InvalidAssetUrl(String),

    /// IO error (file operations, directory walks)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error (missing credentials, bad concurrency)
    #[error("configuration error: {0}")]
    Config(String),

    /// Report/template rendering error
    #[error("render error: {0}")]
    Render(String),
}

impl SlackError {
    /// Check if the error is transient and worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            SlackError::RateLimitExceeded { .. } => true,
            SlackError::UnexpectedStatus { status, .. } => (500..=599).contains(status),
            SlackError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if the error is permanent and should not be retried
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Parse the Retry-After header from an HTTP response.
///
/// Slack sends delay-seconds (e.g. "30"). A missing or unparseable header
/// falls back to a 1 second wait so the retry loop still makes progress.
pub(crate) fn retry_after_seconds(response: &reqwest::Response) -> u64 {
    const DEFAULT_RETRY_AFTER: u64 = 1;

    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        let rate_limit = SlackError::RateLimitExceeded { retry_after: 5 };
        assert!(rate_limit.is_transient());
        assert!(!rate_limit.is_permanent());

        let server_error = SlackError::UnexpectedStatus {
            status: 503,
            endpoint: "emoji.adminList".to_string(),
        };
        assert!(server_error.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        let api = SlackError::Api("error_missing_name".to_string());
        assert!(api.is_permanent());
        assert!(!api.is_transient());

        let not_found = SlackError::UnexpectedStatus {
            status: 404,
            endpoint: "emoji.add".to_string(),
        };
        assert!(not_found.is_permanent());

        let config = SlackError::Config("missing SLACK_TOKEN".to_string());
        assert!(config.is_permanent());
    }

    #[test]
    fn test_error_display() {
        let error = SlackError::RateLimitExceeded { retry_after: 10 };
        let display = format!("{}", error);
        assert!(display.contains("rate limit exceeded"));
        assert!(display.contains("10 seconds"));

        let error = SlackError::UnexpectedStatus {
            status: 500,
            endpoint: "emoji.adminList".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("500"));
        assert!(display.contains("emoji.adminList"));
    }
}
