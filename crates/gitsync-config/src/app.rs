//! Host-facing wrapper around a parsed [`AppConfig`].

use crate::error::ConfigError;
use crate::model::AppConfig;
use crate::parser::{APP_NAME, parse_app_config};
use gitsync_syntax::Dispenser;
use serde::{Deserialize, Serialize};

/// Serialized body of the `git` app: `{"config": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitApp {
    pub config: AppConfig,
}

/// A named app value ready to be handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub name: String,
    pub value: serde_json::Value,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let value = serde_json::to_value(GitApp { config })?;
        Ok(Self {
            name: APP_NAME.to_string(),
            value,
        })
    }

    /// Recovers the typed config from the JSON value.
    pub fn config(&self) -> Result<AppConfig, ConfigError> {
        let app: GitApp = serde_json::from_value(self.value.clone())?;
        Ok(app.config)
    }
}

/// Parses the `git` block and wraps it for the host.
pub fn parse_app(d: &mut Dispenser) -> Result<App, ConfigError> {
    App::new(parse_app_config(d)?)
}
