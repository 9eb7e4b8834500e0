use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `.gitsyncrc` (TOML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub colored: bool,

    #[serde(default)]
    pub verbose: bool,

    /// Indent JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Emit `{"config": ...}` instead of the bare config.
    #[serde(default)]
    pub wrap_app: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            pretty: true,
            wrap_app: false,
        }
    }
}

impl Config {
    /// Loads the first rc file found in the working directory, then the
    /// home directory. Defaults apply when there is none.
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from(".gitsyncrc"),
            PathBuf::from(".gitsyncrc.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(".gitsyncrc"));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Command-line flags win over rc values.
    pub fn merge_cli_args(&mut self, verbose: bool, no_color: bool) {
        if verbose {
            self.verbose = true;
        }

        if no_color {
            self.colored = false;
        }
    }
}
