use colored::*;
use gitsync::ParseError;
use gitsync::directives;
use std::fmt;

/// Parse failure with the offending source line and a hint
pub struct EnhancedError {
    pub message: String,
    pub line: Option<usize>,
    pub file: Option<String>,
    pub source: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            file: None,
            source: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message.bold());

        if let (Some(file), Some(line)) = (&self.file, self.line) {
            eprintln!("  {} {}:{}", "-->".blue().bold(), file, line);
        }

        if let (Some(source), Some(line)) = (&self.source, self.line) {
            eprintln!();
            self.display_source_line(source, line);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!();
            eprintln!("{} {}", "suggestion:".green().bold(), suggestion);
        }

        if let Some(help) = &self.help {
            eprintln!();
            eprintln!("{} {}", "help:".cyan().bold(), help);
        }
    }

    fn display_source_line(&self, source: &str, line: usize) {
        let lines: Vec<&str> = source.lines().collect();

        let line_idx = line.saturating_sub(1);
        if line_idx >= lines.len() {
            return;
        }

        let max_line = (line + 2).min(lines.len());
        let line_num_width = max_line.to_string().len();

        // two lines of context either side
        let start = line_idx.saturating_sub(2);
        let end = (line_idx + 3).min(lines.len());

        for (i, text) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;

            if line_num == line {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().blue().bold(),
                    "|".blue().bold(),
                    text,
                    width = line_num_width
                );

                let indent = text.len() - text.trim_start().len();
                let word_len = text
                    .trim_start()
                    .split_whitespace()
                    .next()
                    .map_or(1, |w| w.chars().count());
                eprintln!(
                    "{:>width$} {} {}{}",
                    "",
                    "|".blue().bold(),
                    &text[..indent],
                    "^".repeat(word_len).red().bold(),
                    width = line_num_width
                );
            } else {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().dimmed(),
                    "|".blue().bold(),
                    text,
                    width = line_num_width
                );
            }
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

/// Attaches location, source and a hint matching the error kind
pub fn enhance_parse_error(err: &ParseError, source: &str) -> EnhancedError {
    let location = err.location();
    let enhanced = EnhancedError::new(err.to_string())
        .with_file(location.file.to_string())
        .with_line(location.line)
        .with_source(source);

    match err {
        ParseError::UnsupportedKey { key, .. } => {
            let enhanced = match closest_keyword(key) {
                Some(keyword) => enhanced.with_suggestion(format!("did you mean '{}'?", keyword)),
                None => enhanced,
            };
            enhanced.with_help(format!(
                "Supported repo directives: {}",
                directives::keywords().join(", ")
            ))
        }
        ParseError::TooFewArguments { directive, min, .. } => enhanced.with_suggestion(format!(
            "'{}' needs at least {} argument{}",
            directive,
            min,
            if *min == 1 { "" } else { "s" }
        )),
        ParseError::UnexpectedArguments { .. } => enhanced
            .with_suggestion("Remove the extra arguments")
            .with_help("Quote values that contain spaces: \"like this\""),
        ParseError::InvalidValue { expected, .. } => {
            enhanced.with_suggestion(format!("Use {}", expected))
        }
        ParseError::LexError(_) => {
            enhanced.with_help("Check for unclosed quotes and unbalanced { } braces")
        }
    }
}

/// Nearest known directive within two edits, if any.
fn closest_keyword(key: &str) -> Option<&'static str> {
    directives::keywords()
        .into_iter()
        .map(|keyword| (edit_distance(key, keyword), keyword))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, keyword)| keyword)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }

    prev[b.len()]
}
