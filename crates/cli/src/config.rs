//! Configuration loading and management

use anyhow::{Context, Result};
use devpulse_domain::model::{Category, Source};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_state_db_path")]
    pub state_db_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Category assigned when no classification rule matches
    #[serde(default = "default_category")]
    pub default_category: String,
}

/// Per-source enable flags plus source-specific knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_true")]
    pub devto: bool,

    #[serde(default = "default_true")]
    pub hackernews: bool,

    #[serde(default = "default_true")]
    pub newsapi: bool,

    #[serde(default = "default_true")]
    pub github: bool,

    #[serde(default = "default_true")]
    pub vercel: bool,

    #[serde(default = "default_true")]
    pub react: bool,

    #[serde(default = "default_true")]
    pub meta: bool,

    #[serde(default = "default_true")]
    pub google: bool,

    #[serde(default = "default_true")]
    pub cloudflare: bool,

    #[serde(default = "default_true")]
    pub reddit: bool,

    #[serde(default = "default_true")]
    pub medium: bool,

    #[serde(default = "default_true")]
    pub nvd: bool,

    #[serde(default = "default_reddit_subreddits")]
    pub reddit_subreddits: Vec<String>,

    /// Env var holding the NewsAPI key; unset means the source is skipped
    #[serde(default = "default_newsapi_key_env")]
    pub newsapi_key_env: String,
}

// Default value functions
fn default_state_db_path() -> PathBuf {
    PathBuf::from("./devpulse.sqlite")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_category() -> String {
    "Web Dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_reddit_subreddits() -> Vec<String> {
    devpulse_adapters::sources::reddit::default_subreddits()
}

fn default_newsapi_key_env() -> String {
    "NEWSAPI_KEY".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state_db_path: default_state_db_path(),
            log_level: default_log_level(),
            fetch_timeout_secs: default_fetch_timeout(),
            default_category: default_category(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            devto: true,
            hackernews: true,
            newsapi: true,
            github: true,
            vercel: true,
            react: true,
            meta: true,
            google: true,
            cloudflare: true,
            reddit: true,
            medium: true,
            nvd: true,
            reddit_subreddits: default_reddit_subreddits(),
            newsapi_key_env: default_newsapi_key_env(),
        }
    }
}

impl SourcesConfig {
    /// Enabled sources in registry order
    pub fn enabled_sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| match source {
                Source::Devto => self.devto,
                Source::HackerNews => self.hackernews,
                Source::NewsApi => self.newsapi,
                Source::Github => self.github,
                Source::Vercel => self.vercel,
                Source::React => self.react,
                Source::Meta => self.meta,
                Source::Google => self.google,
                Source::Cloudflare => self.cloudflare,
                Source::Reddit => self.reddit,
                Source::Medium => self.medium,
                Source::Nvd => self.nvd,
            })
            .collect()
    }

    /// Read the NewsAPI key from the configured env var, if any
    pub fn newsapi_key(&self) -> Option<SecretString> {
        if self.newsapi_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.newsapi_key_env)
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::new(value.into()))
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("DEVPULSE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.general.fetch_timeout_secs)
    }

    /// Fallback category for unmatched articles
    pub fn default_category(&self) -> Result<Category> {
        self.general
            .default_category
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# devpulse configuration

[general]
state_db_path = "./devpulse.sqlite"
log_level = "info"
fetch_timeout_secs = 15
# Category used when no classification rule matches:
# Security, "Web Dev", "AI/ML", DevOps, Mobile, "Open Source"
default_category = "Web Dev"

[sources]
devto = true
hackernews = true
newsapi = true
github = true
vercel = true
react = true
meta = true
google = true
cloudflare = true
reddit = true
medium = true
nvd = true

reddit_subreddits = ["javascript", "reactjs", "programming", "webdev", "typescript"]

# NewsAPI is skipped when this env var is unset
newsapi_key_env = "NEWSAPI_KEY"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_every_source() {
        let config = AppConfig::default();
        assert_eq!(config.sources.enabled_sources(), Source::ALL.to_vec());
        assert_eq!(config.general.fetch_timeout_secs, 15);
    }

    #[test]
    fn test_example_toml_parses_back() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.general.default_category, "Web Dev");
        assert_eq!(config.sources.reddit_subreddits.len(), 5);
    }

    #[test]
    fn test_disabled_sources_are_filtered() {
        let config: AppConfig = toml::from_str(
            r#"
            [sources]
            newsapi = false
            medium = false
            "#,
        )
        .unwrap();

        let enabled = config.sources.enabled_sources();
        assert!(!enabled.contains(&Source::NewsApi));
        assert!(!enabled.contains(&Source::Medium));
        assert!(enabled.contains(&Source::Devto));
    }

    #[test]
    fn test_default_category_parses() {
        let config = AppConfig::default();
        assert_eq!(config.default_category().unwrap(), Category::WebDev);
    }
}
