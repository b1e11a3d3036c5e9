//! Configuration management for `sheetsync`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`SHEETSYNC_*`)
//! 3. Config file (`sheetsync.yaml`, or `--config`)
//! 4. Defaults

use crate::error::{Result, SyncError};
use crate::model::BotIdentity;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename looked up in the working directory.
const DEFAULT_CONFIG_FILENAME: &str = "sheetsync.yaml";
/// Issue classification applied to every created issue.
const DEFAULT_ISSUE_TYPE: &str = "Task";
/// Label that scopes both the outbound create and the inbound search.
const DEFAULT_LABEL: &str = "sheetsync";
/// Single-page search bound; reaching it triggers a truncation warning.
const DEFAULT_PAGE_SIZE: usize = 1000;
/// Remote statuses excluded from the inbound search.
const DEFAULT_EXCLUDED_STATUSES: &[&str] = &["Done", "Canceled"];
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw file-level configuration; every field optional so partial files merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub label: Option<String>,
    pub issue_type: Option<String>,
    pub page_size: Option<usize>,
    pub excluded_statuses: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub bot: Option<FileBotConfig>,
}

/// Bot identity section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileBotConfig {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub account_id: Option<String>,
}

/// Values captured from the environment, injectable for tests.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub label: Option<String>,
    pub bot_name: Option<String>,
    pub bot_display_name: Option<String>,
    pub bot_account_id: Option<String>,
}

impl EnvOverrides {
    /// Snapshot the `SHEETSYNC_*` variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            base_url: non_empty_var("SHEETSYNC_URL"),
            token: non_empty_var("SHEETSYNC_TOKEN"),
            project: non_empty_var("SHEETSYNC_PROJECT"),
            label: non_empty_var("SHEETSYNC_LABEL"),
            bot_name: non_empty_var("SHEETSYNC_BOT_NAME"),
            bot_display_name: non_empty_var("SHEETSYNC_BOT_DISPLAY"),
            bot_account_id: non_empty_var("SHEETSYNC_BOT_ACCOUNT"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub project: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracker base URL without a trailing slash.
    pub base_url: String,
    pub token: String,
    pub project: String,
    pub label: String,
    pub issue_type: String,
    pub page_size: usize,
    pub excluded_statuses: Vec<String>,
    pub timeout_secs: u64,
    pub bot: BotIdentity,
}

impl Config {
    /// Load and resolve configuration from file, environment, and CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file is missing or
    /// any present file fails to parse.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let file = load_file_config(cli.config_path.as_deref())?;
        Ok(resolve(file, EnvOverrides::from_process(), cli))
    }

    /// Validate the fields a sync run cannot proceed without.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] when the token is missing and
    /// [`SyncError::Config`] for other missing required fields. This check
    /// runs before any reconciliation starts.
    pub fn validate_for_sync(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SyncError::Config(
                "tracker base URL is not set (SHEETSYNC_URL or config file)".to_string(),
            ));
        }
        if self.token.trim().is_empty() {
            return Err(SyncError::Auth(
                "no tracker token (set SHEETSYNC_TOKEN or the config file token field)".to_string(),
            ));
        }
        if self.project.trim().is_empty() {
            return Err(SyncError::Config(
                "tracker project key is not set (--project, SHEETSYNC_PROJECT, or config file)"
                    .to_string(),
            ));
        }
        if self.bot.account_id.trim().is_empty() {
            return Err(SyncError::Config(
                "bot account id is not set (bot.account_id); created issues must self-assign"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the config file, if one is present.
///
/// An explicitly passed path must exist; the default filename is optional.
fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(SyncError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !candidate.is_file() {
                return Ok(FileConfig::default());
            }
            candidate
        }
    };

    let contents = fs::read_to_string(&path)?;
    let parsed: FileConfig = serde_yaml::from_str(&contents)?;
    Ok(parsed)
}

/// Merge the three layers over the defaults.
fn resolve(file: FileConfig, env: EnvOverrides, cli: &CliOverrides) -> Config {
    let file_bot = file.bot.unwrap_or_default();

    let base_url = cli
        .base_url
        .clone()
        .or(env.base_url)
        .or(file.base_url)
        .unwrap_or_default();

    Config {
        base_url: normalize_base_url(&base_url),
        token: env.token.or(file.token).unwrap_or_default(),
        project: cli
            .project
            .clone()
            .or(env.project)
            .or(file.project)
            .unwrap_or_default(),
        label: env
            .label
            .or(file.label)
            .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        issue_type: file
            .issue_type
            .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
        page_size: file.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        excluded_statuses: file.excluded_statuses.unwrap_or_else(|| {
            DEFAULT_EXCLUDED_STATUSES
                .iter()
                .map(ToString::to_string)
                .collect()
        }),
        timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        bot: BotIdentity {
            name: env
                .bot_name
                .or(file_bot.name)
                .unwrap_or_else(|| "bot".to_string()),
            display_name: env
                .bot_display_name
                .or(file_bot.display_name)
                .unwrap_or_else(|| "Sync Bot".to_string()),
            account_id: env.bot_account_id.or(file_bot.account_id).unwrap_or_default(),
        },
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(yaml: &str) -> FileConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn defaults_apply_when_all_layers_are_empty() {
        let config = resolve(
            FileConfig::default(),
            EnvOverrides::default(),
            &CliOverrides::default(),
        );
        assert_eq!(config.label, DEFAULT_LABEL);
        assert_eq!(config.issue_type, DEFAULT_ISSUE_TYPE);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.excluded_statuses, vec!["Done", "Canceled"]);
        assert_eq!(config.bot.name, "bot");
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let file = file_config(
            "base_url: https://file.example.com\nproject: FILE\nlabel: file_label\n",
        );
        let env = EnvOverrides {
            base_url: Some("https://env.example.com".to_string()),
            project: Some("ENV".to_string()),
            ..EnvOverrides::default()
        };
        let cli = CliOverrides {
            project: Some("CLI".to_string()),
            ..CliOverrides::default()
        };

        let config = resolve(file, env, &cli);
        assert_eq!(config.base_url, "https://env.example.com");
        assert_eq!(config.project, "CLI");
        assert_eq!(config.label, "file_label");
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let file = file_config("base_url: https://jira.example.com/\n");
        let config = resolve(file, EnvOverrides::default(), &CliOverrides::default());
        assert_eq!(config.base_url, "https://jira.example.com");
    }

    #[test]
    fn bot_section_merges_per_field() {
        let file = file_config(
            "bot:\n  name: subaru\n  display_name: Harada, Naohisa\n  account_id: uig17323\n",
        );
        let env = EnvOverrides {
            bot_display_name: Some("Harada, N.".to_string()),
            ..EnvOverrides::default()
        };
        let config = resolve(file, env, &CliOverrides::default());
        assert_eq!(config.bot.name, "subaru");
        assert_eq!(config.bot.display_name, "Harada, N.");
        assert_eq!(config.bot.account_id, "uig17323");
    }

    #[test]
    fn validate_for_sync_reports_the_first_missing_field() {
        let mut config = resolve(
            FileConfig::default(),
            EnvOverrides::default(),
            &CliOverrides::default(),
        );
        assert!(matches!(
            config.validate_for_sync(),
            Err(SyncError::Config(_))
        ));

        config.base_url = "https://jira.example.com".to_string();
        assert!(matches!(config.validate_for_sync(), Err(SyncError::Auth(_))));

        config.token = "secret".to_string();
        config.project = "PROJ".to_string();
        assert!(matches!(
            config.validate_for_sync(),
            Err(SyncError::Config(_))
        ));

        config.bot.account_id = "uig17323".to_string();
        assert!(config.validate_for_sync().is_ok());
    }
}
