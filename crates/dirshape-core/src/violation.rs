//! Violations and the collector that gathers them during a walk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

/// Every way a directory tree can disagree with its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DirectoryMissing,
    FileMissing,
    ExpectedFileFoundDirectory,
    ExpectedDirectoryFoundFile,
    UnexpectedDirectory,
    UnexpectedFile,
    InvalidContent,
    InvalidInput,
}

impl ViolationKind {
    /// Stable machine-readable code, used by the JSON report.
    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::DirectoryMissing => "directory_missing",
            ViolationKind::FileMissing => "file_missing",
            ViolationKind::ExpectedFileFoundDirectory => "expected_file_found_directory",
            ViolationKind::ExpectedDirectoryFoundFile => "expected_directory_found_file",
            ViolationKind::UnexpectedDirectory => "unexpected_directory",
            ViolationKind::UnexpectedFile => "unexpected_file",
            ViolationKind::InvalidContent => "invalid_content",
            ViolationKind::InvalidInput => "invalid_input",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ViolationKind::DirectoryMissing => "directory does not exist",
            ViolationKind::FileMissing => "file does not exist",
            ViolationKind::ExpectedFileFoundDirectory => "expected a file, found a directory",
            ViolationKind::ExpectedDirectoryFoundFile => "expected a directory, found a file",
            ViolationKind::UnexpectedDirectory => "unexpected directory",
            ViolationKind::UnexpectedFile => "unexpected file",
            ViolationKind::InvalidContent => "invalid content",
            ViolationKind::InvalidInput => "invalid schema",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One mismatch between the schema and the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub path: PathBuf,
    /// Extra context: the content validator's message, or what was wrong with the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Violation {
    pub fn new(kind: ViolationKind, path: impl Into<PathBuf>) -> Self {
        Violation {
            kind,
            path: path.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at: {}", self.kind.message(), self.path.display())?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Keep every violation.
    Accumulate,
    /// Turn the first violation into an error.
    Throw,
}

/// Flat, ordered list of violations produced by one validation call.
///
/// The strategy is fixed at construction: an accumulating collector stores
/// everything pushed into it, a throwing collector fails on the first push.
#[derive(Debug, Clone)]
pub struct ErrorCollector {
    strategy: Strategy,
    violations: Vec<Violation>,
}

impl Default for ErrorCollector {
    fn default() -> Self {
        ErrorCollector::accumulating()
    }
}

impl ErrorCollector {
    pub fn accumulating() -> Self {
        ErrorCollector {
            strategy: Strategy::Accumulate,
            violations: Vec::new(),
        }
    }

    pub fn throwing() -> Self {
        ErrorCollector {
            strategy: Strategy::Throw,
            violations: Vec::new(),
        }
    }

    pub(crate) fn for_mode(crash: bool) -> Self {
        if crash {
            ErrorCollector::throwing()
        } else {
            ErrorCollector::accumulating()
        }
    }

    pub fn is_throwing(&self) -> bool {
        self.strategy == Strategy::Throw
    }

    pub fn push(&mut self, violation: Violation) -> Result<(), Error> {
        match self.strategy {
            Strategy::Accumulate => {
                self.violations.push(violation);
                Ok(())
            }
            Strategy::Throw => Err(Error::Violation(violation)),
        }
    }

    /// Move every violation from `other` into this collector, flattening it.
    pub fn absorb(&mut self, other: ErrorCollector) -> Result<(), Error> {
        for v in other.violations {
            self.push(v)?;
        }
        Ok(())
    }

    pub fn list(&self) -> &[Violation] {
        &self.violations
    }

    pub fn count(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn of_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.violations
    }
}

impl IntoIterator for ErrorCollector {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorCollector {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
