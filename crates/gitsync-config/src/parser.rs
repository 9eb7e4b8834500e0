use crate::directives::{self, Invocation};
use crate::model::{AppConfig, RepositoryConfig};
use gitsync_syntax::{Dispenser, ParseError};
use tracing::{debug, trace};

/// Name of the top-level option block.
pub const APP_NAME: &str = "git";

/// Walks a `git { repo <name> { ... } }` block into an [`AppConfig`].
///
/// Fails fast: the first unsupported key or arity violation is returned and
/// nothing built so far escapes.
pub fn parse_app_config(d: &mut Dispenser) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();

    while d.next() {
        if d.val() != APP_NAME {
            return Err(d.unsupported_key());
        }
        let option = Invocation::read(d);
        if !option.args.is_empty() {
            return Err(ParseError::unexpected_arguments(APP_NAME, option.location));
        }

        let nesting = d.nesting();
        while d.next_block(nesting) {
            if d.val() != "repo" {
                return Err(d.unsupported_key());
            }
            config.repositories.push(parse_repository(d)?);
        }
    }

    debug!(repositories = config.repositories.len(), "parsed git app config");
    Ok(config)
}

fn parse_repository(d: &mut Dispenser) -> Result<RepositoryConfig, ParseError> {
    let call = Invocation::read(d);
    match call.args.len() {
        0 => return Err(ParseError::too_few_arguments("repo", 0, 1, call.location)),
        1 => {}
        _ => return Err(ParseError::unexpected_arguments("repo", call.location)),
    }
    if call.args[0].is_empty() {
        return Err(ParseError::invalid_value(
            "repo",
            "",
            "a non-empty repository name",
            call.location,
        ));
    }

    let mut repo = RepositoryConfig::new(call.args[0].clone());
    let nesting = d.nesting();
    while d.next_block(nesting) {
        let directive = directives::lookup(d.val()).ok_or_else(|| d.unsupported_key())?;
        let call = Invocation::read(d);
        trace!(repo = %repo.name, key = %call.key, line = call.location.line, "directive");
        directive
            .arity()
            .check(&call.key, call.args.len(), &call.location)?;
        directive.apply(&call, d, &mut repo)?;
    }

    debug!(repo = %repo.name, "parsed repository");
    Ok(repo)
}

/// Tokenizes `source` and parses it in one step.
pub fn parse_source(file: &str, source: &str) -> Result<AppConfig, ParseError> {
    parse_source_with_imports(file, source, std::iter::empty::<String>())
}

/// Like [`parse_source`], attributing every token to `import_chain`.
pub fn parse_source_with_imports<I, S>(
    file: &str,
    source: &str,
    import_chain: I,
) -> Result<AppConfig, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut d = Dispenser::from_source_with_imports(file, source, import_chain)?;
    parse_app_config(&mut d)
}
