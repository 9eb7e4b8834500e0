//! Handlers for the directives allowed inside a `repo` block.
//!
//! Each handler declares its [`Arity`]; the walker checks it before calling
//! [`Directive::apply`], so handlers only validate shape beyond the count.

use crate::model::{AuthConfig, ExecConfig, RepositoryConfig, WebhookConfig};
use gitsync_syntax::{Args, Dispenser, Location, ParseError};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

static DIRECTIVES: Lazy<HashMap<&'static str, &'static dyn Directive>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static dyn Directive> = HashMap::with_capacity(16);
    m.insert("base_dir", &BaseDir);
    m.insert("url", &Url);
    m.insert("branch", &Branch);
    m.insert("force", &Force);
    m.insert("depth", &Depth);
    m.insert("update", &Update);
    m.insert("auth", &Auth);
    m.insert("webhook", &Webhook);
    m.insert("post", &PostPullExec);
    m
});

pub fn lookup(keyword: &str) -> Option<&'static dyn Directive> {
    DIRECTIVES.get(keyword).copied()
}

/// Supported keywords, sorted.
pub fn keywords() -> Vec<&'static str> {
    let mut keys: Vec<_> = DIRECTIVES.keys().copied().collect();
    keys.sort_unstable();
    keys
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub fn check(
        &self,
        directive: &str,
        got: usize,
        location: &Location,
    ) -> Result<(), ParseError> {
        if got < self.min {
            return Err(ParseError::too_few_arguments(
                directive,
                got,
                self.min,
                location.clone(),
            ));
        }
        if self.max.is_some_and(|max| got > max) {
            return Err(ParseError::unexpected_arguments(directive, location.clone()));
        }
        Ok(())
    }
}

/// One directive line: keyword, its arguments and where the keyword sits.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub key: String,
    pub args: Args,
    pub location: Location,
}

impl Invocation {
    /// Reads the keyword under the cursor and the rest of its line.
    pub fn read(d: &mut Dispenser) -> Self {
        let key = d.val().to_string();
        let location = d.location();
        let args = d.remaining_args();
        Self {
            key,
            args,
            location,
        }
    }

    fn check(&self, name: &str, args: &[String], arity: Arity) -> Result<(), ParseError> {
        arity.check(name, args.len(), &self.location)
    }

    fn unsupported(&self, key: &str) -> ParseError {
        ParseError::unsupported_key(key, self.location.clone())
    }

    fn invalid(&self, value: &str, expected: &str) -> ParseError {
        ParseError::invalid_value(&self.key, value, expected, self.location.clone())
    }
}

pub trait Directive: Sync {
    fn arity(&self) -> Arity;

    fn apply(
        &self,
        call: &Invocation,
        d: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError>;
}

struct BaseDir;

impl Directive for BaseDir {
    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        repo.base_dir = Some(call.args[0].clone());
        Ok(())
    }
}

struct Url;

impl Directive for Url {
    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        repo.address = Some(call.args[0].clone());
        Ok(())
    }
}

struct Branch;

impl Directive for Branch {
    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        repo.branch = Some(call.args[0].clone());
        Ok(())
    }
}

struct Force;

impl Directive for Force {
    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        let value = &call.args[0];
        repo.force = parse_bool(value).ok_or_else(|| call.invalid(value, "a boolean"))?;
        Ok(())
    }
}

struct Depth;

impl Directive for Depth {
    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        let value = &call.args[0];
        let depth = value
            .parse::<u32>()
            .map_err(|_| call.invalid(value, "a non-negative integer"))?;
        repo.depth = Some(depth);
        Ok(())
    }
}

/// `update every <seconds>`
struct Update;

impl Directive for Update {
    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        if call.args[0] != "every" {
            return Err(call.unsupported(&call.args[0]));
        }
        let value = &call.args[1];
        let seconds = value
            .parse::<u64>()
            .map_err(|_| call.invalid(value, "a number of seconds"))?;
        repo.update_delay = Some(seconds);
        Ok(())
    }
}

/// `auth key <path> [passphrase <value>]` or
/// `auth username <name> password <value>`. The last `auth` line wins.
struct Auth;

impl Directive for Auth {
    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        let rest = &call.args[1..];
        let auth = match call.args[0].as_str() {
            "key" => {
                call.check("auth key", rest, Arity::at_least(1))?;
                let key_path = rest[0].clone();
                let mut key_passphrase = None;

                let mut options = rest[1..].iter();
                while let Some(option) = options.next() {
                    match option.as_str() {
                        "passphrase" => match options.next() {
                            Some(value) => key_passphrase = Some(value.clone()),
                            None => {
                                return Err(ParseError::too_few_arguments(
                                    "auth key passphrase",
                                    0,
                                    1,
                                    call.location.clone(),
                                ));
                            }
                        },
                        other => return Err(call.unsupported(other)),
                    }
                }

                AuthConfig::Key {
                    key_path,
                    key_passphrase,
                }
            }
            "username" => {
                call.check("auth username", rest, Arity::exactly(3))?;
                if rest[1] != "password" {
                    return Err(call.unsupported(&rest[1]));
                }
                AuthConfig::UsernamePassword {
                    username: rest[0].clone(),
                    password: rest[2].clone(),
                }
            }
            other => return Err(call.unsupported(other)),
        };

        repo.auth = Some(auth);
        Ok(())
    }
}

/// `webhook <name> <header> <secret>`
struct Webhook;

impl Directive for Webhook {
    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn apply(
        &self,
        call: &Invocation,
        _: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        repo.webhooks.push(WebhookConfig {
            name: call.args[0].clone(),
            header: call.args[1].clone(),
            secret: call.args[2].clone(),
        });
        Ok(())
    }
}

/// `post pull exec { name ..; command ..; args .. }`
struct PostPullExec;

impl Directive for PostPullExec {
    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn apply(
        &self,
        call: &Invocation,
        d: &mut Dispenser,
        repo: &mut RepositoryConfig,
    ) -> Result<(), ParseError> {
        if call.args[0] != "pull" || call.args[1] != "exec" {
            return Err(call.unsupported(&format!("post {}", call.args.join(" "))));
        }

        let mut exec = ExecConfig::default();
        let nesting = d.nesting();
        while d.next_block(nesting) {
            let inner = Invocation::read(d);
            trace!(key = %inner.key, line = inner.location.line, "post pull exec directive");
            match inner.key.as_str() {
                "name" => {
                    inner.check("name", &inner.args, Arity::exactly(1))?;
                    exec.name = Some(inner.args[0].clone());
                }
                "command" => {
                    inner.check("command", &inner.args, Arity::exactly(1))?;
                    exec.command = Some(inner.args[0].clone());
                }
                "args" => {
                    inner.check("args", &inner.args, Arity::at_least(1))?;
                    exec.args.extend(inner.args.iter().cloned());
                }
                other => return Err(inner.unsupported(other)),
            }
        }

        repo.post_pull_exec.push(exec);
        Ok(())
    }
}

/// `1`, `t`, `true` and their upper-case forms, or the matching false spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
