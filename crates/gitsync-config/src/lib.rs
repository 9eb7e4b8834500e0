//! Typed configuration for the gitsync repository synchronizer.
//!
//! [`parse_app_config`] walks a [`Dispenser`](gitsync_syntax::Dispenser)
//! positioned before a `git` block and returns an [`AppConfig`]:
//!
//! ```
//! use gitsync_config::{AuthConfig, parse_source};
//!
//! let config = parse_source("Caddyfile", r#"
//!     git {
//!       repo authp.github.io {
//!         url git@github.com:authp/authp.github.io.git
//!         auth key ~/.ssh/id_rsa passphrase foobar
//!         webhook Github X-Hub-Signature-256 foobar
//!       }
//!     }"#).unwrap();
//!
//! let repo = &config.repositories[0];
//! assert_eq!(repo.address.as_deref(), Some("git@github.com:authp/authp.github.io.git"));
//! assert_eq!(repo.auth, Some(AuthConfig::key_with_passphrase("~/.ssh/id_rsa", "foobar")));
//! assert_eq!(repo.webhooks.len(), 1);
//! ```

pub mod app;
pub mod directives;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use app::{App, GitApp, parse_app};
pub use error::ConfigError;
pub use model::{AppConfig, AuthConfig, ExecConfig, RepositoryConfig, WebhookConfig};
pub use parser::{APP_NAME, parse_app_config, parse_source, parse_source_with_imports};
