//! The schema model: what a directory tree is expected to look like.
//!
//! A [`Schema`] is an ordered list of named members plus an optional rest
//! node. Schemas are plain values: build them once, then instantiate or
//! validate them against as many paths as needed.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use regex::Regex;

use crate::compile::{Matcher, compile_ast, parse};
use crate::error::{BoxError, Error};
use crate::fs::File;

/// Checks a file's content. Each returned string is one problem.
///
/// Return `Err` for failures such as unreadable files. A panic is caught
/// and reported as a problem too, but it still goes through the process
/// panic hook, so it is not a quiet way to fail.
pub type ContentValidator = Arc<dyn Fn(&File) -> Result<Vec<String>, BoxError> + Send + Sync>;

/// Content written to a file when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(s) => s.as_bytes(),
            Content::Bytes(b) => b,
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Content::Bytes(b)
    }
}

impl From<&[u8]> for Content {
    fn from(b: &[u8]) -> Self {
        Content::Bytes(b.to_vec())
    }
}

/// Default content and content validator shared by both file node kinds.
#[derive(Clone, Default)]
pub struct FileOptions {
    pub default_content: Option<Content>,
    pub validator: Option<ContentValidator>,
}

impl fmt::Debug for FileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileOptions")
            .field("default_content", &self.default_content)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl FileOptions {
    /// Run the content validator, if any, against `file`.
    ///
    /// A validator that fails outright or panics is reported the same way as
    /// one that returns a problem: as a message.
    pub fn check_content(&self, file: &File) -> Vec<String> {
        let Some(validator) = &self.validator else {
            return Vec::new();
        };
        match panic::catch_unwind(AssertUnwindSafe(|| validator(file))) {
            Ok(Ok(problems)) => problems,
            Ok(Err(e)) => vec![format!("validator failed: {e}")],
            Err(payload) => vec![format!("validator panicked: {}", panic_message(&*payload))],
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Files whose names match a pattern.
#[derive(Debug, Clone)]
pub struct FilePattern {
    pub matcher: Matcher,
    pub options: FileOptions,
}

/// A file with one exact name.
#[derive(Debug, Clone)]
pub struct FixedFile {
    pub name: String,
    pub options: FileOptions,
}

/// What a [`DirNode`] contains.
#[derive(Debug, Clone)]
pub enum DirBody {
    /// Only files, each matching the pattern.
    Files(FilePattern),
    /// Members described by a nested schema.
    Schema(Schema),
}

/// A directory with a fixed name.
#[derive(Debug, Clone)]
pub struct DirNode {
    pub name: String,
    pub body: DirBody,
}

#[derive(Debug, Clone)]
pub enum SchemaNode {
    Pattern(FilePattern),
    File(FixedFile),
    Dir(DirNode),
    Schema(Schema),
}

/// An ordered set of named members plus at most one rest node.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: Option<String>,
    members: Vec<(String, SchemaNode)>,
    rest: Option<Box<SchemaNode>>,
}

macro_rules! file_builders {
    ($ty:ty) => {
        impl $ty {
            /// Content written when the file is created.
            pub fn default_content(mut self, content: impl Into<Content>) -> Self {
                self.options.default_content = Some(content.into());
                self
            }

            /// Attach a content validator.
            pub fn validator<F>(mut self, f: F) -> Self
            where
                F: Fn(&File) -> Result<Vec<String>, BoxError> + Send + Sync + 'static,
            {
                self.options.validator = Some(Arc::new(f));
                self
            }
        }
    };
}

file_builders!(FilePattern);
file_builders!(FixedFile);

impl FilePattern {
    /// The pattern text, which is also the name used when the pattern is
    /// instantiated as a schema member.
    pub fn source(&self) -> &str {
        self.matcher.source()
    }
}

impl From<FixedFile> for FilePattern {
    fn from(f: FixedFile) -> Self {
        FilePattern {
            matcher: Matcher::exact(&f.name),
            options: f.options,
        }
    }
}

impl From<FilePattern> for DirBody {
    fn from(p: FilePattern) -> Self {
        DirBody::Files(p)
    }
}

impl From<FixedFile> for DirBody {
    fn from(f: FixedFile) -> Self {
        DirBody::Files(f.into())
    }
}

impl From<Schema> for DirBody {
    fn from(s: Schema) -> Self {
        DirBody::Schema(s)
    }
}

impl From<FilePattern> for SchemaNode {
    fn from(p: FilePattern) -> Self {
        SchemaNode::Pattern(p)
    }
}

impl From<FixedFile> for SchemaNode {
    fn from(f: FixedFile) -> Self {
        SchemaNode::File(f)
    }
}

impl From<DirNode> for SchemaNode {
    fn from(d: DirNode) -> Self {
        SchemaNode::Dir(d)
    }
}

impl From<Schema> for SchemaNode {
    fn from(s: Schema) -> Self {
        SchemaNode::Schema(s)
    }
}

impl SchemaNode {
    /// Whether the node stands for a directory on disk.
    pub fn is_dir(&self) -> bool {
        matches!(self, SchemaNode::Dir(_) | SchemaNode::Schema(_))
    }

    /// The on-disk name this node is looked up by, when it has one.
    pub fn expected_name(&self) -> Option<&str> {
        match self {
            SchemaNode::Pattern(p) => Some(p.source()),
            SchemaNode::File(f) => Some(&f.name),
            SchemaNode::Dir(d) => Some(&d.name),
            SchemaNode::Schema(s) => s.name(),
        }
    }
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// A schema for a directory called `name`, usable as a bare member.
    pub fn named(name: impl Into<String>) -> Self {
        Schema {
            name: Some(name.into()),
            ..Schema::default()
        }
    }

    /// Add a member. Reusing a key replaces the earlier node in place.
    pub fn member(mut self, key: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        let key = key.into();
        let node = node.into();
        match self.members.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = node,
            None => self.members.push((key, node)),
        }
        self
    }

    /// Set the node every unnamed entry must satisfy. Replaces any earlier one.
    pub fn rest(mut self, node: impl Into<SchemaNode>) -> Self {
        self.rest = Some(Box::new(node.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.members.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.members.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn rest_node(&self) -> Option<&SchemaNode> {
        self.rest.as_deref()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Files matching a wildcard pattern such as `*.ts|*.txt`.
///
/// `*` matches any run of characters, `|` separates alternatives and `\`
/// escapes either. `.` is literal; other regex syntax such as `[0-9]{3}`
/// is kept. The whole name must match.
pub fn pattern(pat: &str) -> Result<FilePattern, Error> {
    let ast = parse(pat)?;
    // "" is the usual way to say "must be empty", so it gets no warning.
    if ast.is_fixed() && !pat.is_empty() {
        tracing::warn!(pattern = pat, "pattern has no wildcard; use file() for a fixed name");
    }
    let matcher = compile_ast(pat, &ast)?;
    Ok(FilePattern {
        matcher,
        options: FileOptions::default(),
    })
}

/// Files whose names match a caller-built regex. The regex is not anchored for you.
pub fn pattern_regex(regex: Regex) -> FilePattern {
    FilePattern {
        matcher: Matcher::from_regex(regex),
        options: FileOptions::default(),
    }
}

/// A file called exactly `name`.
pub fn file(name: impl Into<String>) -> FixedFile {
    FixedFile {
        name: name.into(),
        options: FileOptions::default(),
    }
}

/// A directory called `name` holding either pattern-matched files or a nested schema.
pub fn dir(name: impl Into<String>, body: impl Into<DirBody>) -> DirNode {
    DirNode {
        name: name.into(),
        body: body.into(),
    }
}
