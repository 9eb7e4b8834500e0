//! # gitsync syntax
//!
//! Tokenizer, dispenser and diagnostics for the gitsync directive grammar.
//!
//! ## Overview
//!
//! Configuration files are written in a Caddyfile-style block grammar:
//!
//! ```text
//! git {
//!   repo authp.github.io {
//!     base_dir /tmp
//!     url https://github.com/authp/authp.github.io.git
//!     branch gh-pages
//!   }
//! }
//! ```
//!
//! - **Lexer**: splits source into whitespace-delimited [`Token`]s, each
//!   tagged with file name, line and import chain
//! - **Dispenser**: a cursor that walks tokens line by line and block by block
//! - **Errors**: [`LexError`] / [`ParseError`], rendered as
//!   `<file>:<line> - Error during parsing: <message>, import chain: [...]`
//!
//! ## Example
//!
//! ```rust
//! use gitsync_syntax::Dispenser;
//!
//! let mut d = Dispenser::from_source("Caddyfile", "url https://example.com/repo.git")
//!     .expect("tokenization failed");
//!
//! assert!(d.next());
//! assert_eq!(d.val(), "url");
//! assert_eq!(d.remaining_args().as_slice(), ["https://example.com/repo.git"]);
//! ```

pub mod dispenser;
pub mod error;
pub mod lexer;

pub use dispenser::{Args, Dispenser, TEST_FILE};
pub use error::{LexError, Location, ParseError, format_error, format_import_chain};
pub use lexer::{Token, tokenize, tokenize_with_imports};
