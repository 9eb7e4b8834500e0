use crate::error::{LexError, Location, ParseError};
use crate::lexer::{Token, tokenize, tokenize_with_imports};
use smallvec::SmallVec;
use std::sync::Arc;

/// File name used by [`Dispenser::test`].
pub const TEST_FILE: &str = "Testfile";

/// Arguments of one directive line. Most directives take four or fewer.
pub type Args = SmallVec<[String; 4]>;

/// Cursor over a token stream that understands lines and `{ }` blocks.
///
/// The cursor starts before the first token; call [`Dispenser::next`] to
/// load it. Directive handlers then pull arguments from the same line with
/// [`Dispenser::next_arg`] / [`Dispenser::remaining_args`] and step through
/// nested blocks with [`Dispenser::next_block`].
#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Tokenizes `source` and wraps the result.
    pub fn from_source(file: &str, source: &str) -> Result<Self, LexError> {
        Ok(Self::new(tokenize(file, source)?))
    }

    /// Tokenizes `source` under an import chain. Lex errors carry the chain
    /// too.
    pub fn from_source_with_imports<I, S>(
        file: &str,
        source: &str,
        chain: I,
    ) -> Result<Self, LexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chain: Arc<[String]> = chain.into_iter().map(Into::into).collect();
        Ok(Self::new(tokenize_with_imports(file, source, chain)?))
    }

    /// Dispenser over `source` attributed to [`TEST_FILE`].
    ///
    /// # Panics
    ///
    /// Panics if `source` does not tokenize.
    pub fn test(source: &str) -> Self {
        match Self::from_source(TEST_FILE, source) {
            Ok(d) => d,
            Err(e) => panic!("test source failed to tokenize: {}", e),
        }
    }

    /// Attaches the chain of enclosing imports to every token.
    pub fn with_import_chain<I, S>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chain: Arc<[String]> = chain.into_iter().map(Into::into).collect();
        for token in &mut self.tokens {
            token.imports = Arc::clone(&chain);
        }
        self
    }

    #[inline]
    pub fn token(&self) -> Option<&Token> {
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor.map_or(0, |i| i + 1))
    }

    #[inline]
    fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Text of the current token, or `""` before the first token.
    pub fn val(&self) -> &str {
        self.token().map_or("", |t| t.text.as_str())
    }

    pub fn line(&self) -> usize {
        self.token().map_or(0, |t| t.line)
    }

    pub fn file(&self) -> &str {
        self.token().map_or("", |t| &*t.file)
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Location of the current token. Falls back to the first token (or an
    /// empty location) before the cursor has moved.
    pub fn location(&self) -> Location {
        self.token()
            .or_else(|| self.tokens.first())
            .map_or_else(|| Location::new("", 0), Token::location)
    }

    /// Loads the next token regardless of line or nesting.
    pub fn next(&mut self) -> bool {
        self.advance()
    }

    /// Moves back one token.
    pub fn prev(&mut self) -> bool {
        match self.cursor {
            Some(0) => {
                self.cursor = None;
                true
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                true
            }
            None => false,
        }
    }

    fn next_on_same_line(&self) -> bool {
        match (self.token(), self.peek()) {
            (Some(cur), Some(next)) => {
                cur.file == next.file && cur.line + cur.line_breaks() == next.line
            }
            _ => false,
        }
    }

    /// Loads the next token if it continues the current line. Never steps
    /// onto a block brace.
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        if self
            .peek()
            .is_some_and(|t| t.is_open_brace() || t.is_close_brace())
        {
            return false;
        }
        self.advance()
    }

    /// Loads the next token only if it starts a new line.
    pub fn next_line(&mut self) -> bool {
        if self.cursor.is_some() && self.next_on_same_line() {
            return false;
        }
        self.advance()
    }

    /// Consumes and returns every argument left on the current line.
    pub fn remaining_args(&mut self) -> Args {
        let mut args = Args::new();
        while self.next_arg() {
            args.push(self.val().to_string());
        }
        args
    }

    /// Whether a block opens at the end of the current line.
    pub fn has_block(&self) -> bool {
        self.next_on_same_line() && self.peek().is_some_and(Token::is_open_brace)
    }

    /// Steps to the next directive inside the block that belongs to the
    /// current line.
    ///
    /// Typical use:
    ///
    /// ```
    /// # use gitsync_syntax::Dispenser;
    /// let mut d = Dispenser::test("repo foo {\n url a\n branch b\n}");
    /// d.next();
    /// d.remaining_args();
    /// let mut keys = Vec::new();
    /// let nesting = d.nesting();
    /// while d.next_block(nesting) {
    ///     keys.push(d.val().to_string());
    ///     d.remaining_args();
    /// }
    /// assert_eq!(keys, ["url", "branch"]);
    /// ```
    ///
    /// Returns `false` once the closing brace is consumed, when the block is
    /// empty, or when the line carries no block at all.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.advance() {
                return false;
            }
            if self.token().is_some_and(Token::is_close_brace) {
                self.nesting -= 1;
                return false;
            }
            return true;
        }

        if !self.has_block() {
            return false;
        }
        self.advance();

        if !self.advance() {
            return false;
        }
        if self.token().is_some_and(Token::is_close_brace) {
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Skips the rest of the current line and any block opened on it.
    pub fn skip_block(&mut self) {
        let nesting = self.nesting;
        while self.next_block(nesting) {
            self.remaining_args();
            self.skip_block();
        }
    }

    pub fn unsupported_key(&self) -> ParseError {
        ParseError::unsupported_key(self.val(), self.location())
    }

    pub fn too_few_arguments(&self, directive: &str, got: usize, min: usize) -> ParseError {
        ParseError::too_few_arguments(directive, got, min, self.location())
    }

    pub fn unexpected_arguments(&self, directive: &str) -> ParseError {
        ParseError::unexpected_arguments(directive, self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_starts_before_first_token() {
        let mut d = Dispenser::test("git");
        assert_eq!(d.val(), "");
        assert!(d.next());
        assert_eq!(d.val(), "git");
        assert!(!d.next());
    }

    #[test]
    fn test_remaining_args_stop_at_line_end() {
        let mut d = Dispenser::test("webhook a b c\nurl x");
        d.next();
        assert_eq!(d.remaining_args().as_slice(), ["a", "b", "c"]);
        assert!(d.next_line());
        assert_eq!(d.val(), "url");
    }

    #[test]
    fn test_remaining_args_stop_at_block() {
        let mut d = Dispenser::test("post pull exec {\n name x\n}");
        d.next();
        assert_eq!(d.remaining_args().as_slice(), ["pull", "exec"]);
        assert!(d.has_block());
    }

    #[test]
    fn test_remaining_args_follow_continuation() {
        let mut d = Dispenser::test("webhook Github \\\n   X-Hub foobar\nurl x");
        d.next();
        assert_eq!(d.remaining_args().as_slice(), ["Github", "X-Hub", "foobar"]);
        assert!(d.next_line());
        assert_eq!(d.val(), "url");
        assert_eq!(d.line(), 3);
    }

    #[test]
    fn test_empty_braces_open_an_empty_block() {
        let mut d = Dispenser::test("git {}
next");
        d.next();
        assert!(d.remaining_args().is_empty());
        assert!(!d.next_block(0));
        assert_eq!(d.nesting(), 0);
        assert!(d.next());
        assert_eq!(d.val(), "next");
    }

    #[test]
    fn test_from_source_with_imports_tags_lex_errors() {
        let err = Dispenser::from_source_with_imports("git.caddy", "git {", ["Caddyfile:2"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "git.caddy:1 - Error during parsing: unclosed '{' block, import chain: ['Caddyfile:2']"
        );
    }

    #[test]
    fn test_block_on_one_line() {
        let mut d = Dispenser::test("repo x { url u }");
        d.next();
        assert_eq!(d.remaining_args().as_slice(), ["x"]);
        assert!(d.next_block(0));
        assert_eq!(d.val(), "url");
        assert_eq!(d.remaining_args().as_slice(), ["u"]);
        assert!(!d.next_block(0));
        assert_eq!(d.nesting(), 0);
    }

    #[test]
    fn test_next_line_refuses_same_line() {
        let mut d = Dispenser::test("a b\nc");
        d.next();
        assert!(!d.next_line());
        d.next();
        assert!(d.next_line());
        assert_eq!(d.val(), "c");
    }

    #[test]
    fn test_nested_blocks_track_nesting() {
        let mut d = Dispenser::test("git {\n repo x {\n  url u\n }\n}");
        d.next();
        assert!(d.next_block(0));
        assert_eq!(d.val(), "repo");
        assert_eq!(d.nesting(), 1);
        d.remaining_args();

        assert!(d.next_block(1));
        assert_eq!(d.val(), "url");
        assert_eq!(d.nesting(), 2);
        d.remaining_args();
        assert!(!d.next_block(1));
        assert_eq!(d.nesting(), 1);

        assert!(!d.next_block(0));
        assert_eq!(d.nesting(), 0);
        assert!(!d.next());
    }

    #[test]
    fn test_empty_block() {
        let mut d = Dispenser::test("git {\n}");
        d.next();
        assert!(!d.next_block(0));
        assert_eq!(d.nesting(), 0);
    }

    #[test]
    fn test_block_must_open_on_same_line() {
        let mut d = Dispenser::test("git\n{\n}");
        d.next();
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "git");
    }

    #[test]
    fn test_skip_block() {
        let mut d = Dispenser::test("a {\n b {\n  c d\n }\n}\ne");
        d.next();
        d.skip_block();
        assert_eq!(d.nesting(), 0);
        assert!(d.next());
        assert_eq!(d.val(), "e");
    }

    #[test]
    fn test_import_chain_reaches_errors() {
        let mut d = Dispenser::test("bar").with_import_chain(["Caddyfile:10"]);
        d.next();
        assert_eq!(
            d.unsupported_key().to_string(),
            "Testfile:1 - Error during parsing: unsupported \"bar\" key, import chain: ['Caddyfile:10']"
        );
    }

    #[test]
    fn test_prev() {
        let mut d = Dispenser::test("a b");
        assert!(!d.prev());
        d.next();
        d.next();
        assert!(d.prev());
        assert_eq!(d.val(), "a");
        assert!(d.prev());
        assert_eq!(d.val(), "");
    }
}
