/// One piece of a single alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text. Passed through to the regex, except that `.` is escaped.
    Literal(String),

    /// An unescaped `*`: any run of characters, including none.
    Star,

    /// A backslash escape such as `\|` or `\*`. Holds the escaped character.
    Escaped(char),
}

/// One `|`-separated branch of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alternative {
    pub nodes: Vec<Node>,
}

impl Alternative {
    pub fn has_star(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, Node::Star))
    }
}

/// A parsed file-name pattern.
///
/// Example:
///   `*.ts|*.txt`  -> two alternatives, each `Star` followed by a literal
///   `README.md`   -> one alternative holding a single literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub alternatives: Vec<Alternative>,
}

impl Pattern {
    /// True when the pattern can only ever accept one exact name.
    pub fn is_fixed(&self) -> bool {
        self.alternatives.len() <= 1 && !self.alternatives.iter().any(Alternative::has_star)
    }
}
