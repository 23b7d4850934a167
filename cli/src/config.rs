//! CLI configuration loading.
//!
//! The backend URL is resolved in order: `--url` flag, `MACHINA_URL`
//! environment variable, `~/.config/machina/config.toml`, built-in default.
//! A missing config file is fine; a malformed one is an error.

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_URL: &str = "http://localhost:8000";

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    #[serde(default)]
    pub url: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("machina").join("config.toml"))
}

impl CliConfig {
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolve the backend URL against the flag and environment overrides.
    /// `env` is the value of `MACHINA_URL`, passed in so resolution stays
    /// deterministic under test.
    pub fn resolve_url(&self, flag: Option<String>, env: Option<String>) -> String {
        flag.or(env)
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| DEFAULT_URL.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flag_wins_over_env_and_config() {
        let config = CliConfig {
            url: Some("http://configured:8000".into()),
        };
        assert_eq!(
            config.resolve_url(
                Some("http://flag:8000".into()),
                Some("http://env:8000".into())
            ),
            "http://flag:8000"
        );
    }

    #[test]
    fn env_wins_over_config() {
        let config = CliConfig {
            url: Some("http://configured:8000".into()),
        };
        assert_eq!(
            config.resolve_url(None, Some("http://env:8000".into())),
            "http://env:8000"
        );
    }

    #[test]
    fn config_wins_over_default() {
        let config = CliConfig {
            url: Some("http://configured:8000".into()),
        };
        assert_eq!(config.resolve_url(None, None), "http://configured:8000");
    }

    #[test]
    fn default_applies_last() {
        let config = CliConfig::default();
        assert_eq!(config.resolve_url(None, None), DEFAULT_URL);
    }
}
