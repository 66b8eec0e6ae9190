// Compilation module: lowers a parsed file-name pattern into an anchored regex.

use dirshape_pattern::{Alternative, Node, Pattern, parse_pattern};
use regex::Regex;

use crate::error::Error;

/// A compiled file-name predicate.
#[derive(Debug, Clone)]
pub struct Matcher {
    source: String,
    test: Test,
}

#[derive(Debug, Clone)]
enum Test {
    Exact,
    Regex(Regex),
}

impl Matcher {
    /// Wrap a caller-built regex. It is used as-is, so it is not anchored
    /// unless the caller anchored it.
    pub fn from_regex(regex: Regex) -> Self {
        Matcher {
            source: regex.as_str().to_string(),
            test: Test::Regex(regex),
        }
    }

    /// A matcher accepting exactly `name`.
    pub fn exact(name: &str) -> Self {
        Matcher {
            source: name.to_string(),
            test: Test::Exact,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.test {
            Test::Exact => self.source == name,
            Test::Regex(re) => re.is_match(name),
        }
    }

    /// The text the matcher was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for matchers built by [`Matcher::exact`].
    pub fn is_exact(&self) -> bool {
        matches!(self.test, Test::Exact)
    }
}

/// Parse and compile a pattern such as `*.ts|*.txt`.
pub fn compile(pattern: &str) -> Result<Matcher, Error> {
    let ast = parse(pattern)?;
    compile_ast(pattern, &ast)
}

pub(crate) fn parse(pattern: &str) -> Result<Pattern, Error> {
    parse_pattern(pattern).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        msg: e.to_string(),
    })
}

/// Compile an already parsed pattern.
///
/// All alternatives go into one `^(?:a|b)$` regex, so a name is accepted
/// when any alternative covers the whole of it.
pub(crate) fn compile_ast(source: &str, ast: &Pattern) -> Result<Matcher, Error> {
    let alts: Vec<String> = ast.alternatives.iter().map(lower_alternative).collect();

    let pat = format!("^(?:{})$", alts.join("|"));

    let regex = Regex::new(&pat).map_err(|e| Error::Pattern {
        pattern: source.to_string(),
        msg: format!("invalid regex pattern: {}", e),
    })?;

    Ok(Matcher {
        source: source.to_string(),
        test: Test::Regex(regex),
    })
}

fn lower_alternative(alt: &Alternative) -> String {
    let mut out = String::new();
    for node in &alt.nodes {
        match node {
            // Only `.` is escaped; brackets, braces and the like stay regex syntax.
            Node::Literal(lit) => out.push_str(&lit.replace('.', "\\.")),
            Node::Star => out.push_str(".*"),
            Node::Escaped(c) => {
                out.push('\\');
                out.push(*c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_extension() {
        let m = compile("*.ts").unwrap();
        assert!(m.matches("main.ts"));
        assert!(m.matches(".ts"));
        assert!(!m.matches("main.tsx"));
        assert!(!m.matches("main_ts"));
    }

    #[test]
    fn dot_is_literal() {
        let m = compile("a.b").unwrap();
        assert!(m.matches("a.b"));
        assert!(!m.matches("axb"));
    }

    #[test]
    fn whole_name_must_match() {
        let m = compile("src").unwrap();
        assert!(m.matches("src"));
        assert!(!m.matches("src2"));
        assert!(!m.matches("my_src"));
    }

    #[test]
    fn alternation_is_a_union() {
        let m = compile("*.ts|*.txt").unwrap();
        assert!(m.matches("a.ts"));
        assert!(m.matches("a.txt"));
        assert!(!m.matches("a.md"));
    }

    #[test]
    fn regex_classes_pass_through() {
        let m = compile("rest[0-9]{3}.txt|*.any").unwrap();
        assert!(m.matches("rest100.txt"));
        assert!(m.matches("foo12021bar.any"));
        assert!(!m.matches("rest10.txt"));
        assert!(!m.matches("rest1000.txt"));
    }

    #[test]
    fn escaped_pipe_and_star_are_literal() {
        let m = compile(r"a\|b").unwrap();
        assert!(m.matches("a|b"));
        assert!(!m.matches("a"));

        let m = compile(r"\*.md").unwrap();
        assert!(m.matches("*.md"));
        assert!(!m.matches("x.md"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_name() {
        let m = compile("").unwrap();
        assert!(m.matches(""));
        assert!(!m.matches("a"));
    }

    #[test]
    fn deterministic() {
        let a = compile("some_*.txt|*.log").unwrap();
        let b = compile("some_*.txt|*.log").unwrap();
        for name in ["some_1.txt", "x.log", "some_.txt", "other.txt", ""] {
            assert_eq!(a.matches(name), b.matches(name));
        }
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(matches!(compile("a(b"), Err(Error::Pattern { .. })));
        assert!(matches!(compile(r"x\"), Err(Error::Pattern { .. })));
    }

    #[test]
    fn exact_escapes_everything() {
        let m = Matcher::exact("a+b(1).txt");
        assert!(m.is_exact());
        assert!(m.matches("a+b(1).txt"));
        assert!(!m.matches("aab1.txt"));
    }

    #[test]
    fn from_regex_is_unanchored() {
        let m = Matcher::from_regex(Regex::new("$^").unwrap());
        assert!(!m.matches("a.txt"));

        let m = Matcher::from_regex(Regex::new(r"\.rs").unwrap());
        assert!(m.matches("lib.rs"));
        assert!(m.matches("lib.rs.bak"));
    }
}
