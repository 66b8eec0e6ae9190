#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub index: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at char {}: {}", self.index, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<chumsky::error::Simple<char>> for ParseError {
    fn from(e: chumsky::error::Simple<char>) -> Self {
        ParseError {
            index: e.span().start,
            message: e.to_string(),
        }
    }
}
