//! Configuration handling for branchsweep
//!
//! Settings are layered: built-in defaults, then the user file
//! `<config_dir>/branchsweep/config.toml`, then `<repo>/.branchsweep.toml`.
//! Command line overrides are applied by the caller on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Repository-level config file name
pub const REPO_CONFIG_FILE: &str = ".branchsweep.toml";

/// Branchsweep configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sweep settings
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Core sweep settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    /// Remote whose HEAD names the default branch
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branches probed in order when the remote HEAD is unavailable
    #[serde(default = "default_fallback_branches")]
    pub fallback_branches: Vec<String>,

    /// Per git invocation timeout in seconds, 0 disables it
    #[serde(default)]
    pub command_timeout_secs: u64,

    /// Worker count for squash detection
    #[serde(default = "default_squash_jobs")]
    pub squash_jobs: usize,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_fallback_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_squash_jobs() -> usize {
    1
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            fallback_branches: default_fallback_branches(),
            command_timeout_secs: 0,
            squash_jobs: default_squash_jobs(),
        }
    }
}

impl SweepConfig {
    /// Timeout as a `Duration`, `None` when disabled
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}

/// Partial config used for layering; absent keys leave the lower layer intact
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    sweep: SweepLayer,
}

#[derive(Debug, Default, Deserialize)]
struct SweepLayer {
    remote: Option<String>,
    fallback_branches: Option<Vec<String>>,
    command_timeout_secs: Option<u64>,
    squash_jobs: Option<usize>,
}

impl Config {
    /// Load the layered configuration for a repository
    pub fn load(repo_root: &Path) -> Result<Self, SweepError> {
        let mut config = Config::default();
        if let Some(user_file) = user_config_path() {
            config.merge_file(&user_file)?;
        }
        config.merge_file(&repo_root.join(REPO_CONFIG_FILE))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a single TOML document over the defaults
    pub fn from_toml(content: &str) -> Result<Self, SweepError> {
        let mut config = Config::default();
        config.merge_str(content, "<inline>")?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), SweepError> {
        if !path.is_file() {
            return Ok(());
        }
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading config");
        self.merge_str(&content, &path.display().to_string())
    }

    fn merge_str(&mut self, content: &str, origin: &str) -> Result<(), SweepError> {
        let layer: ConfigLayer = toml::from_str(content)
            .map_err(|e| SweepError::Config(format!("{}: {}", origin, e)))?;
        let sweep = layer.sweep;
        if let Some(remote) = sweep.remote {
            self.sweep.remote = remote;
        }
        if let Some(fallback) = sweep.fallback_branches {
            self.sweep.fallback_branches = fallback;
        }
        if let Some(secs) = sweep.command_timeout_secs {
            self.sweep.command_timeout_secs = secs;
        }
        if let Some(jobs) = sweep.squash_jobs {
            self.sweep.squash_jobs = jobs;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), SweepError> {
        if self.sweep.remote.trim().is_empty() {
            return Err(SweepError::Config("sweep.remote must not be empty".to_string()));
        }
        if self.sweep.squash_jobs == 0 {
            return Err(SweepError::Config(
                "sweep.squash_jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("branchsweep").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sweep.remote, "origin");
        assert_eq!(config.sweep.fallback_branches, vec!["main", "master"]);
        assert_eq!(config.sweep.command_timeout(), None);
        assert_eq!(config.sweep.squash_jobs, 1);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::from_toml("[sweep]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.sweep.remote, "upstream");
        assert_eq!(config.sweep.fallback_branches, vec!["main", "master"]);
    }

    #[test]
    fn test_timeout_and_jobs() {
        let config =
            Config::from_toml("[sweep]\ncommand_timeout_secs = 15\nsquash_jobs = 4\n").unwrap();
        assert_eq!(config.sweep.command_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.sweep.squash_jobs, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("[sweep]\nsquash_jobs = 0\n"),
            Err(SweepError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[sweep]\nremote = \"  \"\n"),
            Err(SweepError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("not toml ["),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn test_repo_file_layer() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(REPO_CONFIG_FILE),
            "[sweep]\nfallback_branches = [\"trunk\"]\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.sweep.fallback_branches, vec!["trunk"]);
    }
}
