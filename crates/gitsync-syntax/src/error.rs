use std::fmt;
use std::sync::Arc;

/// Renders a diagnostic in the `<file>:<line> - Error during parsing: ...` shape.
///
/// Every error produced by this crate and by the directive walker goes
/// through here, so a configuration author always sees the same layout.
pub fn format_error(
    file: &str,
    line: usize,
    message: impl fmt::Display,
    import_chain: &[String],
) -> String {
    format!(
        "{}:{} - Error during parsing: {}, import chain: [{}]",
        file,
        line,
        message,
        format_import_chain(import_chain)
    )
}

/// Quotes and joins the import chain. An empty chain renders as `''`.
pub fn format_import_chain(import_chain: &[String]) -> String {
    format!("'{}'", import_chain.join("','"))
}

/// Where a token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Arc<str>,
    pub line: usize,
    pub imports: Arc<[String]>,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            imports: Arc::from(Vec::new()),
        }
    }

    pub fn with_imports(mut self, imports: Arc<[String]>) -> Self {
        self.imports = imports;
        self
    }

    /// Formats `message` at this location.
    pub fn diagnostic(&self, message: impl fmt::Display) -> String {
        format_error(&self.file, self.line, message, &self.imports)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnterminatedQuote { quote: char, location: Location },
    UnexpectedClosingBrace { location: Location },
    UnclosedBrace { location: Location },
}

impl LexError {
    pub fn location(&self) -> &Location {
        match self {
            LexError::UnterminatedQuote { location, .. } => location,
            LexError::UnexpectedClosingBrace { location } => location,
            LexError::UnclosedBrace { location } => location,
        }
    }

    fn message(&self) -> String {
        match self {
            LexError::UnterminatedQuote { quote, .. } => {
                format!("unterminated {} quoted string", quote)
            }
            LexError::UnexpectedClosingBrace { .. } => "unexpected '}'".to_string(),
            LexError::UnclosedBrace { .. } => "unclosed '{' block".to_string(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location().diagnostic(self.message()))
    }
}

impl std::error::Error for LexError {}

/// A failure while walking directives. The first one aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnsupportedKey {
        key: String,
        location: Location,
    },
    TooFewArguments {
        directive: String,
        got: usize,
        min: usize,
        location: Location,
    },
    UnexpectedArguments {
        directive: String,
        location: Location,
    },
    InvalidValue {
        directive: String,
        value: String,
        expected: String,
        location: Location,
    },
    LexError(LexError),
}

impl ParseError {
    pub fn unsupported_key(key: impl Into<String>, location: Location) -> Self {
        ParseError::UnsupportedKey {
            key: key.into(),
            location,
        }
    }

    pub fn too_few_arguments(
        directive: impl Into<String>,
        got: usize,
        min: usize,
        location: Location,
    ) -> Self {
        ParseError::TooFewArguments {
            directive: directive.into(),
            got,
            min,
            location,
        }
    }

    pub fn unexpected_arguments(directive: impl Into<String>, location: Location) -> Self {
        ParseError::UnexpectedArguments {
            directive: directive.into(),
            location,
        }
    }

    pub fn invalid_value(
        directive: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
        location: Location,
    ) -> Self {
        ParseError::InvalidValue {
            directive: directive.into(),
            value: value.into(),
            expected: expected.into(),
            location,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            ParseError::UnsupportedKey { location, .. } => location,
            ParseError::TooFewArguments { location, .. } => location,
            ParseError::UnexpectedArguments { location, .. } => location,
            ParseError::InvalidValue { location, .. } => location,
            ParseError::LexError(e) => e.location(),
        }
    }

    /// The message without the location prefix and import chain suffix.
    pub fn message(&self) -> String {
        match self {
            ParseError::UnsupportedKey { key, .. } => format!("unsupported {:?} key", key),
            ParseError::TooFewArguments {
                directive,
                got,
                min,
                ..
            } => format!(
                "too few args for {:?} directive (config: {}, min: {})",
                directive, got, min
            ),
            ParseError::UnexpectedArguments { directive, .. } => format!(
                "wrong argument count or unexpected line ending after {:?}",
                directive
            ),
            ParseError::InvalidValue {
                directive,
                value,
                expected,
                ..
            } => format!(
                "invalid value {:?} for {:?} directive, expected {}",
                value, directive, expected
            ),
            ParseError::LexError(e) => e.message(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location().diagnostic(self.message()))
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::LexError(err)
    }
}
