//! Parse `git { repo ... }` configuration blocks into typed repository
//! settings.
//!
//! ```
//! use gitsync::prelude::*;
//!
//! let config = parse_str("Caddyfile", "git {\n  repo docs {\n    url https://example.com/docs.git\n  }\n}")
//!     .expect("valid config");
//! assert_eq!(config.repositories[0].name, "docs");
//! ```

pub use gitsync_config::directives;
pub use gitsync_config::{
    APP_NAME, App, AppConfig, AuthConfig, ConfigError, ExecConfig, GitApp, RepositoryConfig,
    WebhookConfig, parse_app, parse_app_config, parse_source, parse_source_with_imports,
};
pub use gitsync_syntax::{Dispenser, LexError, Location, ParseError, Token, format_error, tokenize};

/// Parses a whole configuration document attributed to `file`.
pub fn parse_str(file: &str, source: &str) -> Result<AppConfig, ParseError> {
    parse_source(file, source)
}

pub mod prelude {
    pub use crate::parse_str;
    pub use crate::{AppConfig, AuthConfig, Dispenser, ParseError, RepositoryConfig};
}
