use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete configuration for git-autotag.
///
/// Loaded from `autotag.toml` when present; command-line arguments override
/// individual fields afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Prefix shared by every version tag, `v` by default
    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Also maintain floating `v1.2` / `v1` style aliases
    #[serde(default)]
    pub include_shorter_versions: bool,

    /// Push created tags (and the changelog commit) to the remote
    #[serde(default)]
    pub push: bool,

    #[serde(default)]
    pub dev: DevConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Dev-branch tagging configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DevConfig {
    /// Branch to tag with pre-release versions; unset means tag the main branch
    #[serde(default)]
    pub branch: Option<String>,

    /// First pre-release identifier of every dev tag
    #[serde(default = "default_dev_suffix")]
    pub suffix: String,

    /// Use the nested `<suffix>.M.m.p` numbering instead of a flat counter
    #[serde(default)]
    pub semantic: bool,
}

/// Changelog generation configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ChangelogConfig {
    /// File to prepend the release section to; unset disables the changelog
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Extra message added at the top of the release section
    #[serde(default)]
    pub message: Option<String>,
}

fn default_version_prefix() -> String {
    "v".to_string()
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_dev_suffix() -> String {
    "dev".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_prefix: default_version_prefix(),
            main_branch: default_main_branch(),
            remote: default_remote(),
            include_shorter_versions: false,
            push: false,
            dev: DevConfig::default(),
            changelog: ChangelogConfig::default(),
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        DevConfig {
            branch: None,
            suffix: default_dev_suffix(),
            semantic: false,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `.autotag.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./autotag.toml").exists() {
        fs::read_to_string("./autotag.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".autotag.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
