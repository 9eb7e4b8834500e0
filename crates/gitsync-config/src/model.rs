//! Typed configuration produced by the directive walker.
//!
//! Every type serializes to the JSON shape the host application consumes.
//! Fields that were never set in the source are omitted from the output.

use serde::{Deserialize, Serialize};

/// All repositories configured in a `git { ... }` block, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

impl AppConfig {
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Repositories carrying `name`. Duplicate names are kept, so this may
    /// yield more than one entry.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RepositoryConfig> + 'a {
        self.repositories.iter().filter(move |r| r.name == name)
    }
}

/// One `repo <name> { ... }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,

    /// Clone depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,

    /// Seconds between pulls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_delay: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<WebhookConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_pull_exec: Vec<ExecConfig>,
}

impl RepositoryConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Credentials for fetching a repository.
///
/// Serialized without a tag; the two shapes are told apart by their keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthConfig {
    Key {
        key_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_passphrase: Option<String>,
    },
    UsernamePassword {
        username: String,
        password: String,
    },
}

impl AuthConfig {
    pub fn key(key_path: impl Into<String>) -> Self {
        AuthConfig::Key {
            key_path: key_path.into(),
            key_passphrase: None,
        }
    }

    pub fn key_with_passphrase(key_path: impl Into<String>, passphrase: impl Into<String>) -> Self {
        AuthConfig::Key {
            key_path: key_path.into(),
            key_passphrase: Some(passphrase.into()),
        }
    }

    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::UsernamePassword {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub name: String,
    pub header: String,
    pub secret: String,
}

/// A command to run after a successful pull.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}
