use gitsync_syntax::lexer::tokenize;
use gitsync_syntax::LexError;

#[test]
fn test_caddyfile_block() {
    let source = r#"
git {
  repo authp.github.io {
    base_dir /tmp
    url https://github.com/authp/authp.github.io.git
    branch gh-pages
  }
}"#;
    let tokens = tokenize("Caddyfile", source).unwrap();

    let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        words,
        [
            "git",
            "{",
            "repo",
            "authp.github.io",
            "{",
            "base_dir",
            "/tmp",
            "url",
            "https://github.com/authp/authp.github.io.git",
            "branch",
            "gh-pages",
            "}",
            "}",
        ]
    );

    // leading newline puts `git` on line 2
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[5].line, 4);
    assert!(tokens.iter().all(|t| &*t.file == "Caddyfile"));
}

#[test]
fn test_tabs_and_crlf() {
    let tokens = tokenize("Caddyfile", "url\tfoo\r\nbranch\tmain\r\n").unwrap();
    let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(words, ["url", "foo", "branch", "main"]);
    assert_eq!(tokens[2].line, 2);
}

#[test]
fn test_empty_input() {
    assert!(tokenize("Caddyfile", "").unwrap().is_empty());
    assert!(tokenize("Caddyfile", "  # only a comment\n\n").unwrap().is_empty());
}

#[test]
fn test_empty_quoted_string_is_a_token() {
    let tokens = tokenize("Caddyfile", r#"args """#).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].text, "");
    assert!(tokens[1].quoted);
}

#[test]
fn test_unterminated_backtick() {
    let err = tokenize("Caddyfile", "args `never closed").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedQuote { quote: '`', .. }));
    assert_eq!(
        err.to_string(),
        "Caddyfile:1 - Error during parsing: unterminated ` quoted string, import chain: ['']"
    );
}
