//! Renders an [`AppConfig`] back into directive text.
//!
//! The output is canonical: one directive per line, two-space indentation,
//! fields in a fixed order. Parsing the rendered text yields an equal config.

use crate::model::{AppConfig, AuthConfig, ExecConfig, RepositoryConfig};
use std::fmt::{self, Write};

const INDENT: &str = "  ";

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "git {{")?;
        for repo in &self.repositories {
            write_repository(f, repo)?;
        }
        writeln!(f, "}}")
    }
}

fn write_repository(f: &mut fmt::Formatter<'_>, repo: &RepositoryConfig) -> fmt::Result {
    writeln!(f, "{INDENT}repo {} {{", quote(&repo.name))?;

    let mut line = |words: &[&str]| -> fmt::Result {
        f.write_str(INDENT)?;
        f.write_str(INDENT)?;
        write_words(f, words)
    };

    if let Some(address) = &repo.address {
        line(&["url", address.as_str()])?;
    }
    if let Some(base_dir) = &repo.base_dir {
        line(&["base_dir", base_dir.as_str()])?;
    }
    if let Some(branch) = &repo.branch {
        line(&["branch", branch.as_str()])?;
    }
    if repo.force {
        line(&["force", "true"])?;
    }
    if let Some(depth) = repo.depth {
        line(&["depth", depth.to_string().as_str()])?;
    }
    if let Some(delay) = repo.update_delay {
        line(&["update", "every", delay.to_string().as_str()])?;
    }
    match &repo.auth {
        Some(AuthConfig::Key {
            key_path,
            key_passphrase: Some(passphrase),
        }) => line(&["auth", "key", key_path.as_str(), "passphrase", passphrase.as_str()])?,
        Some(AuthConfig::Key { key_path, .. }) => line(&["auth", "key", key_path.as_str()])?,
        Some(AuthConfig::UsernamePassword { username, password }) => {
            line(&["auth", "username", username.as_str(), "password", password.as_str()])?
        }
        None => {}
    }
    for hook in &repo.webhooks {
        line(&["webhook", hook.name.as_str(), hook.header.as_str(), hook.secret.as_str()])?;
    }
    for exec in &repo.post_pull_exec {
        write_exec(f, exec)?;
    }

    writeln!(f, "{INDENT}}}")
}

fn write_exec(f: &mut fmt::Formatter<'_>, exec: &ExecConfig) -> fmt::Result {
    writeln!(f, "{INDENT}{INDENT}post pull exec {{")?;
    let prefix = INDENT.repeat(3);
    if let Some(name) = &exec.name {
        f.write_str(&prefix)?;
        write_words(f, &["name", name.as_str()])?;
    }
    if let Some(command) = &exec.command {
        f.write_str(&prefix)?;
        write_words(f, &["command", command.as_str()])?;
    }
    for arg in &exec.args {
        f.write_str(&prefix)?;
        write_words(f, &["args", arg.as_str()])?;
    }
    writeln!(f, "{INDENT}{INDENT}}}")
}

fn write_words(f: &mut fmt::Formatter<'_>, words: &[&str]) -> fmt::Result {
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        f.write_str(&quote(word))?;
    }
    f.write_char('\n')
}

/// Quotes `word` when it would not survive tokenization as a bare word.
///
/// Backticks are used when the word contains `"` or ends in `\`, double
/// quotes otherwise. A word that needs quoting, contains a backtick and ends
/// in `\` has no quoted form: a trailing `\"` always reads as an escaped
/// quote. Such a word is written in double quotes and does not parse back.
pub fn quote(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word == "{"
        || word == "}"
        || word == "{}"
        || word.starts_with('#')
        || word.starts_with('"')
        || word.starts_with('`')
        || word == "\\"
        || word.chars().any(char::is_whitespace);

    if !needs_quotes {
        return word.to_string();
    }
    if (word.contains('"') || word.ends_with('\\')) && !word.contains('`') {
        return format!("`{}`", word);
    }
    format!("\"{}\"", word.replace('"', "\\\""))
}
