//! # gitsync-cli
//!
//! Command-line front end for gitsync configuration files.
//!
//! Parses a `git { repo ... }` block and prints it as JSON, validates it, or
//! rewrites it in canonical form.

mod config;
mod errors;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use gitsync::{App, AppConfig, ParseError, RepositoryConfig, parse_source_with_imports};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use config::Config;
use errors::enhance_parse_error;

#[derive(Parser)]
#[command(name = "gitsync")]
#[command(about = "Parse and check gitsync repository configuration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Read settings from this file instead of searching for .gitsyncrc
    #[arg(long, global = true, value_name = "PATH")]
    rc: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Parse a configuration file and print it as JSON")]
    Parse {
        #[command(flatten)]
        input: Input,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Wrap the output as {"config": ...}
        #[arg(long)]
        app: bool,
    },
    #[command(about = "Validate a configuration file")]
    Check {
        #[command(flatten)]
        input: Input,
    },
    #[command(about = "Print a configuration file in canonical form")]
    Fmt {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
struct Input {
    /// Configuration file to read
    file: PathBuf,

    /// Import chain entry reported in errors, outermost first
    #[arg(short, long = "import", value_name = "FILE:LINE")]
    imports: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.rc {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    settings.merge_cli_args(cli.verbose, cli.no_color);

    init_tracing(settings.verbose);
    if !settings.colored {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Parse {
            input,
            compact,
            app,
        } => {
            let config = load_config(&input)?;
            let pretty = settings.pretty && !compact;
            println!("{}", to_json(config, app || settings.wrap_app, pretty)?);
        }
        Commands::Check { input } => {
            let config = load_config(&input)?;
            print_summary(&input.file, &config);
        }
        Commands::Fmt { input } => {
            let config = load_config(&input)?;
            print!("{}", config);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and parses `input`. Parse errors are reported and end the process.
fn load_config(input: &Input) -> Result<AppConfig> {
    let source = fs::read_to_string(&input.file)
        .with_context(|| format!("Failed to read config from {:?}", input.file))?;

    let file = input.file.display().to_string();
    info!(file = %file, imports = input.imports.len(), "parsing");

    match parse_source_with_imports(&file, &source, input.imports.iter().cloned()) {
        Ok(config) => {
            debug!(repositories = config.repositories.len(), "parsed");
            Ok(config)
        }
        Err(err) => report(&err, &source),
    }
}

fn report(err: &ParseError, source: &str) -> ! {
    enhance_parse_error(err, source).display();
    std::process::exit(1);
}

fn to_json(config: AppConfig, wrap: bool, pretty: bool) -> Result<String> {
    let value = if wrap {
        App::new(config)?.value
    } else {
        serde_json::to_value(config)?
    };

    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

fn print_summary(path: &Path, config: &AppConfig) {
    println!(
        "{} {}",
        "✓".green().bold(),
        format!(
            "{} is valid ({} repositor{})",
            path.display(),
            config.repositories.len(),
            if config.repositories.len() == 1 { "y" } else { "ies" }
        )
        .bold()
    );

    for repo in &config.repositories {
        println!("  {}", describe(repo));
    }
}

fn describe(repo: &RepositoryConfig) -> String {
    let mut line = format!(
        "{} {}",
        repo.name.cyan().bold(),
        repo.address.as_deref().unwrap_or("(no url)").dimmed()
    );

    if let Some(branch) = &repo.branch {
        line.push_str(&format!(" @ {}", branch));
    }
    if !repo.webhooks.is_empty() {
        line.push_str(&format!(", {} webhook(s)", repo.webhooks.len()));
    }
    if !repo.post_pull_exec.is_empty() {
        line.push_str(&format!(", {} post-pull command(s)", repo.post_pull_exec.len()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    fn sample() -> AppConfig {
        gitsync::parse_str("Caddyfile", "git {\n repo a {\n  url u\n }\n}").unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "gitsync", "parse", "git.caddy", "-i", "Caddyfile:3", "--compact", "--no-color",
        ])
        .unwrap();
        assert!(cli.no_color);
        match cli.command {
            Commands::Parse {
                input,
                compact,
                app,
            } => {
                assert_eq!(input.file, PathBuf::from("git.caddy"));
                assert_eq!(input.imports, ["Caddyfile:3"]);
                assert!(compact);
                assert!(!app);
            }
            _ => panic!("expected parse"),
        }
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(sample(), false, false).unwrap();
        assert_eq!(json, r#"{"repositories":[{"address":"u","name":"a"}]}"#);
    }

    #[test]
    fn test_to_json_wrapped() {
        let json = to_json(sample(), true, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            json!({ "config": { "repositories": [{ "name": "a", "address": "u" }] } })
        );
    }

    #[test]
    fn test_describe() {
        colored::control::set_override(false);
        let config = sample();
        assert_eq!(describe(&config.repositories[0]), "a u");
    }
}
