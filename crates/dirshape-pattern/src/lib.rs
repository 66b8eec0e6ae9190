//! Grammar for dirshape file-name patterns.
//!
//! A pattern is a list of `|`-separated alternatives. Inside an alternative
//! `*` is a wildcard and `\` escapes the next character; everything else is
//! literal text that the core crate lowers into a regex.
mod ast;
mod error;
mod parser;
use chumsky::Parser;

pub use ast::{Alternative, Node, Pattern};
pub use error::ParseError;

pub fn parse_pattern(input: &str) -> Result<Pattern, ParseError> {
    parser::pattern_parser()
        .parse(input)
        .map_err(|errs| match errs.into_iter().next() {
            Some(e) => ParseError::from(e),
            None => ParseError {
                index: 0,
                message: "invalid pattern".into(),
            },
        })
}
