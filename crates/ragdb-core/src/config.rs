//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Provides a helper to expand `~` and `${VAR}` in user-provided paths.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract the `[retrieval]` section, filling defaults for absent keys.
    pub fn retrieval(&self) -> anyhow::Result<RetrievalConfig> {
        let cfg: RetrievalConfig = self
            .figment
            .extract_inner("retrieval")
            .unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Retrieval tuning, captured once at startup and passed by value into the
/// pipeline. Never re-read mid-request.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Minimum similarity (0-1) required to keep a fragment.
    pub min_score: f32,
    /// Fragments returned when the request does not cap max_sources.
    pub default_top_k: usize,
    /// Hard ceiling on fragments fetched per query.
    pub max_k: usize,
    /// Upper bound on total selected context size, in characters.
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            default_top_k: 8,
            max_k: 12,
            max_context_chars: 6000,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::InvalidConfig(
                "retrieval.min_score must be within [0, 1]".to_string(),
            ));
        }
        if self.default_top_k == 0 || self.max_k == 0 {
            return Err(Error::InvalidConfig(
                "retrieval top-k values must be >= 1".to_string(),
            ));
        }
        if self.default_top_k > self.max_k {
            return Err(Error::InvalidConfig(
                "retrieval.default_top_k must not exceed retrieval.max_k".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested fragment count into `1..=max_k`, defaulting to
    /// `default_top_k` when the request leaves it unset.
    pub fn clamp_top_k(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top_k)
            .clamp(1, self.max_k)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
