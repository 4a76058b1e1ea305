use std::env;

use crate::error::{Result, SlackError};

/// Prefix for all environment variables read by this tool
pub const ENV_PREFIX: &str = "SLACK";

const DEFAULT_CONCURRENCY: usize = 2;

/// Runtime configuration sourced from `SLACK_*` environment variables.
///
/// CLI flags may override individual fields after loading. Credentials are
/// required before any API call is attempted; `docs` and `version` do not
/// need a config at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace subdomain, e.g. `myteam` for myteam.slack.com
    pub team: String,
    /// API token (`xoxc-...`)
    pub token: String,
    /// Browser session cookie, required by the admin endpoints
    pub cookie: String,
    /// Worker pool width for concurrent downloads
    pub concurrency: usize,
    /// Channel for posted release notes; stdout fallback when unset
    pub release_channel: Option<String>,
}

impl Config {
    /// Load configuration from the environment and validate it.
    ///
    /// Missing required variables are collected and reported together so a
    /// bare invocation names everything that needs setting.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();

        let team = require_env("TEAM", &mut missing);
        let token = require_env("TOKEN", &mut missing);
        let cookie = require_env("COOKIE", &mut missing);

        if !missing.is_empty() {
            return Err(SlackError::Config(format!(
                "environment variables required: [{}]",
                missing.join(", ")
            )));
        }

        let concurrency = match optional_env("CONCURRENCY") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                SlackError::Config(format!(
                    "{}_CONCURRENCY must be a positive integer, got {:?}",
                    ENV_PREFIX, raw
                ))
            })?,
            None => DEFAULT_CONCURRENCY,
        };

        let config = Self {
            team,
            token,
            cookie,
            concurrency,
            release_channel: optional_env("RELEASE_CHANNEL"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.team.is_empty() {
            return Err(SlackError::Config("team must not be empty".to_string()));
        }
        if self.token.is_empty() {
            return Err(SlackError::Config("token must not be empty".to_string()));
        }
        if self.cookie.is_empty() {
            return Err(SlackError::Config("cookie must not be empty".to_string()));
        }
        // Zero would make the download pool unable to make progress
        if self.concurrency == 0 {
            return Err(SlackError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_key(name: &str) -> String {
    format!("{}_{}", ENV_PREFIX, name)
}

fn optional_env(name: &str) -> Option<String> {
    env::var(env_key(name)).ok().filter(|v| !v.is_empty())
}

fn require_env(name: &str, missing: &mut Vec<String>) -> String {
    match optional_env(name) {
        Some(value) => value,
        None => {
            missing.push(env_key(name));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_slack_env() {
        for key in ["TEAM", "TOKEN", "COOKIE", "CONCURRENCY", "RELEASE_CHANNEL"] {
            env::remove_var(env_key(key));
        }
    }

    #[test]
    #[serial]
    fn test_from_env_complete() {
        clear_slack_env();
        env::set_var("SLACK_TEAM", "testteam");
        env::set_var("SLACK_TOKEN", "xoxc-1234");
        env::set_var("SLACK_COOKIE", "d=some-cookie;");
        env::set_var("SLACK_CONCURRENCY", "4");

        let config = Config::from_env().unwrap();
        assert_eq!(config.team, "testteam");
        assert_eq!(config.concurrency, 4);
        assert!(config.release_channel.is_none());
        clear_slack_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_credentials() {
        clear_slack_env();
        env::set_var("SLACK_TEAM", "testteam");

        let err = Config::from_env().unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("SLACK_TOKEN"));
        assert!(message.contains("SLACK_COOKIE"));
        assert!(!message.contains("SLACK_TEAM"));
        clear_slack_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_concurrency() {
        clear_slack_env();
        env::set_var("SLACK_TEAM", "testteam");
        env::set_var("SLACK_TOKEN", "xoxc-1234");
        env::set_var("SLACK_COOKIE", "d=some-cookie;");

        let config = Config::from_env().unwrap();
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        clear_slack_env();
    }

    #[test]
    #[serial]
    fn test_zero_concurrency_rejected() {
        clear_slack_env();
        env::set_var("SLACK_TEAM", "testteam");
        env::set_var("SLACK_TOKEN", "xoxc-1234");
        env::set_var("SLACK_COOKIE", "d=some-cookie;");
        env::set_var("SLACK_CONCURRENCY", "0");

        let err = Config::from_env().unwrap_err();
        assert!(format!("{}", err).contains("concurrency"));
        clear_slack_env();
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = Config {
            team: "testteam".to_string(),
            token: String::new(),
            cookie: "d=c;".to_string(),
            concurrency: 2,
            release_channel: None,
        };
        assert!(config.validate().is_err());
    }
}
