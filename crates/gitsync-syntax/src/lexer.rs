use crate::error::{LexError, Location};
use std::fmt;
use std::sync::Arc;

/// A single word of a configuration file.
///
/// Tokens are whitespace-delimited words; braces are ordinary tokens whose
/// text is `{` or `}`. A quoted `"{"` is a plain word, not a block delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub file: Arc<str>,
    pub line: usize,
    pub quoted: bool,
    pub imports: Arc<[String]>,
}

impl Token {
    #[inline]
    pub fn is_open_brace(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    #[inline]
    pub fn is_close_brace(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    /// Newlines embedded in a quoted token. The next token's line is
    /// offset by this many lines.
    #[inline]
    pub fn line_breaks(&self) -> usize {
        if self.quoted {
            self.text.matches('\n').count()
        } else {
            0
        }
    }

    pub fn location(&self) -> Location {
        Location {
            file: Arc::clone(&self.file),
            line: self.line,
            imports: Arc::clone(&self.imports),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "{:?}", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// Splits `input` into tokens, tagging each with `file` and its 1-based line.
///
/// Recognizes `#` comments at the start of a word, `"..."` strings with
/// `\"` escapes, backtick raw strings and `\` line continuations. Brace
/// balance is validated before the tokens are returned.
pub fn tokenize(file: &str, input: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with_imports(file, input, Arc::from(Vec::new()))
}

/// Like [`tokenize`], attaching `imports` to every token and to any
/// [`LexError`].
pub fn tokenize_with_imports(
    file: &str,
    input: &str,
    imports: Arc<[String]>,
) -> Result<Vec<Token>, LexError> {
    let file: Arc<str> = Arc::from(file);
    let mut tokens = Vec::with_capacity(input.len() / 4);
    let mut chars = input.chars().peekable();
    let mut line = 1;
    // lines joined by `\` continuations, added back at the next real newline
    let mut skipped = 0;

    let push = |tokens: &mut Vec<Token>, text: String, line: usize, quoted: bool| {
        tokens.push(Token {
            text,
            file: Arc::clone(&file),
            line,
            quoted,
            imports: Arc::clone(&imports),
        });
    };

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                chars.next();
                line += 1 + skipped;
                skipped = 0;
            }

            ' ' | '\t' | '\r' => {
                chars.next();
            }

            '#' => {
                while let Some(&ch) = chars.peek() {
                    if ch == '\n' {
                        break;
                    }
                    chars.next();
                }
            }

            '\\' if is_continuation(&chars) => {
                chars.next();
                if chars.peek() == Some(&'\r') {
                    chars.next();
                }
                chars.next();
                skipped += 1;
            }

            '"' => {
                let start_line = line;
                chars.next();

                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(LexError::UnterminatedQuote {
                                quote: '"',
                                location: Location::new(Arc::clone(&file), start_line)
                                    .with_imports(Arc::clone(&imports)),
                            });
                        }
                        Some('\\') if chars.peek() == Some(&'"') => {
                            chars.next();
                            text.push('"');
                        }
                        Some('"') => break,
                        Some(ch) => {
                            if ch == '\n' {
                                line += 1;
                            }
                            text.push(ch);
                        }
                    }
                }

                push(&mut tokens, text, start_line, true);
            }

            '`' => {
                let start_line = line;
                chars.next();

                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(LexError::UnterminatedQuote {
                                quote: '`',
                                location: Location::new(Arc::clone(&file), start_line)
                                    .with_imports(Arc::clone(&imports)),
                            });
                        }
                        Some('`') => break,
                        Some(ch) => {
                            if ch == '\n' {
                                line += 1;
                            }
                            text.push(ch);
                        }
                    }
                }

                push(&mut tokens, text, start_line, true);
            }

            _ => {
                let mut text = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() {
                        break;
                    }
                    text.push(ch);
                    chars.next();
                }

                // `{}` is an empty block, not a word
                if text == "{}" {
                    push(&mut tokens, "{".to_string(), line, false);
                    push(&mut tokens, "}".to_string(), line, false);
                } else {
                    push(&mut tokens, text, line, false);
                }
            }
        }
    }

    check_braces(&tokens)?;

    Ok(tokens)
}

fn is_continuation(chars: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    ahead.next();
    match ahead.next() {
        Some('\n') => true,
        Some('\r') => ahead.next() == Some('\n'),
        _ => false,
    }
}

fn check_braces(tokens: &[Token]) -> Result<(), LexError> {
    let mut open: Vec<&Token> = Vec::new();

    for token in tokens {
        if token.is_open_brace() {
            open.push(token);
        } else if token.is_close_brace() && open.pop().is_none() {
            return Err(LexError::UnexpectedClosingBrace {
                location: token.location(),
            });
        }
    }

    match open.pop() {
        Some(token) => Err(LexError::UnclosedBrace {
            location: token.location(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_words_and_braces() {
        let tokens = tokenize("Testfile", "git {\n  repo foo {\n  }\n}").unwrap();
        assert_eq!(texts(&tokens), ["git", "{", "repo", "foo", "{", "}", "}"]);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[6].line, 4);
    }

    #[test]
    fn test_comment_is_skipped() {
        let tokens = tokenize("Testfile", "url foo # trailing\n# full line\nbranch main").unwrap();
        assert_eq!(texts(&tokens), ["url", "foo", "branch", "main"]);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_hash_inside_word_is_kept() {
        let tokens = tokenize("Testfile", "secret abc#123").unwrap();
        assert_eq!(texts(&tokens), ["secret", "abc#123"]);
    }

    #[test]
    fn test_quoted_string_keeps_spaces() {
        let tokens = tokenize("Testfile", r#"args "pulled the \"main\" repo""#).unwrap();
        assert_eq!(tokens[1].text, r#"pulled the "main" repo"#);
        assert!(tokens[1].quoted);
        assert!(!tokens[0].quoted);
    }

    #[test]
    fn test_backtick_string_is_raw() {
        let tokens = tokenize("Testfile", r#"args `say "hi" \n`"#).unwrap();
        assert_eq!(tokens[1].text, r#"say "hi" \n"#);
    }

    #[test]
    fn test_multiline_quote_advances_line() {
        let tokens = tokenize("Testfile", "args \"a\nb\"\nnext").unwrap();
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].line_breaks(), 1);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_line_continuation() {
        let tokens = tokenize("Testfile", "webhook a \\\n  b c\nurl x").unwrap();
        assert_eq!(texts(&tokens), ["webhook", "a", "b", "c", "url", "x"]);
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[3].line, 1);
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_several_continuations_keep_line_numbers() {
        let tokens = tokenize("Testfile", "a \\\n b \\\n c\nd\ne").unwrap();
        assert_eq!(texts(&tokens), ["a", "b", "c", "d", "e"]);
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, [1, 1, 1, 4, 5]);
    }

    #[test]
    fn test_empty_braces_are_a_block() {
        let tokens = tokenize("Testfile", "git {}").unwrap();
        assert_eq!(texts(&tokens), ["git", "{", "}"]);
        assert!(tokens[1].is_open_brace());
        assert!(tokens[2].is_close_brace());

        let tokens = tokenize("Testfile", "args \"{}\" a{}").unwrap();
        assert_eq!(texts(&tokens), ["args", "{}", "a{}"]);
    }

    #[test]
    fn test_lex_errors_carry_imports() {
        let imports: Arc<[String]> = Arc::from(vec!["Caddyfile:4".to_string()]);
        let err = tokenize_with_imports("git.caddy", "git {\n", Arc::clone(&imports)).unwrap_err();
        assert_eq!(&*err.location().imports, &*imports);

        let err = tokenize_with_imports("git.caddy", "url \"x", imports).unwrap_err();
        assert_eq!(err.location().imports.len(), 1);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("Testfile", "url\n\"oops").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedQuote { quote: '"', .. }));
        assert_eq!(err.location().line, 2);
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = tokenize("Testfile", "git {\n}\n}").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedClosingBrace { .. }));
        assert_eq!(err.location().line, 3);

        let err = tokenize("Testfile", "git {\n repo x {\n}").unwrap_err();
        assert!(matches!(err, LexError::UnclosedBrace { .. }));
        assert_eq!(err.location().line, 1);
    }

    #[test]
    fn test_quoted_brace_is_not_a_delimiter() {
        let tokens = tokenize("Testfile", "args \"{\"").unwrap();
        assert!(!tokens[1].is_open_brace());
    }
}
