// src/parser.rs
use crate::ast::{Alternative, Node, Pattern};
use chumsky::prelude::*;

pub fn pattern_parser() -> impl Parser<char, Pattern, Error = Simple<char>> {
    // `\x` keeps the escaped character, whatever it is.
    let escaped = just('\\').ignore_then(any()).map(Node::Escaped);

    let star = just('*').to(Node::Star);

    let literal = none_of("\\*|")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(Node::Literal);

    let alternative = choice((escaped, star, literal))
        .repeated()
        .map(|nodes| Alternative { nodes });

    alternative
        .separated_by(just('|'))
        .then_ignore(end())
        .map(|mut alternatives| {
            // "" still has to mean "exactly the empty name".
            if alternatives.is_empty() {
                alternatives.push(Alternative::default());
            }
            Pattern { alternatives }
        })
}
