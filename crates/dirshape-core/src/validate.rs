//! Check an existing directory tree against a schema.
//!
//! The walk goes one directory level at a time: first every schema member
//! in declaration order, then every entry no member claimed ("rest"
//! entries), in name order. Rest handling is local to a level; what a
//! parent matched never affects a child directory.

use std::collections::HashSet;
use std::path::Path;

use crate::compile::Matcher;
use crate::error::Error;
use crate::fs::{Directory, Entry, File};
use crate::schema::{DirBody, FileOptions, FilePattern, Schema, SchemaNode};
use crate::violation::{ErrorCollector, Violation, ViolationKind};

/// Knobs for a validation run.
#[derive(Debug, Clone)]
pub struct ValidateSettings {
    /// Fail on the first violation instead of collecting all of them.
    pub crash: bool,

    /// Classify symlinks by their target (`true`) or as plain files (`false`).
    pub follow_symlinks: bool,
}

impl Default for ValidateSettings {
    fn default() -> Self {
        ValidateSettings {
            crash: false,
            follow_symlinks: true,
        }
    }
}

/// Validate the tree at `path` against `schema`.
///
/// With `crash` set the first violation is returned as
/// `Err(Error::Violation(..))`; otherwise every violation is collected.
/// I/O failures while reading the tree are always errors.
pub fn validate(schema: &Schema, path: &Path, crash: bool) -> Result<ErrorCollector, Error> {
    let settings = ValidateSettings {
        crash,
        ..ValidateSettings::default()
    };
    validate_with(schema, path, &settings)
}

pub fn validate_with(
    schema: &Schema,
    path: &Path,
    settings: &ValidateSettings,
) -> Result<ErrorCollector, Error> {
    let mut walker = Walker {
        settings,
        errs: ErrorCollector::for_mode(settings.crash),
        depth: 0,
    };

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => walker.walk_schema(schema, path)?,
        Ok(_) => walker.report(ViolationKind::ExpectedDirectoryFoundFile, path)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            walker.report(ViolationKind::DirectoryMissing, path)?
        }
        Err(e) => return Err(Error::io(path, e)),
    }

    Ok(walker.errs)
}

/// True when the tree at `path` has no violations.
pub fn is_valid(schema: &Schema, path: &Path) -> Result<bool, Error> {
    Ok(validate(schema, path, false)?.is_empty())
}

struct Walker<'s> {
    settings: &'s ValidateSettings,
    errs: ErrorCollector,
    depth: usize,
}

impl Walker<'_> {
    fn report(&mut self, kind: ViolationKind, path: &Path) -> Result<(), Error> {
        self.push(Violation::new(kind, path))
    }

    fn push(&mut self, v: Violation) -> Result<(), Error> {
        tracing::debug!(kind = %v.kind, path = %v.path.display(), "violation");
        self.errs.push(v)
    }

    fn entries(&self, path: &Path) -> Result<Vec<Entry>, Error> {
        Directory::new(path).entries_with(self.settings.follow_symlinks)
    }

    /// One directory level. `path` is known to be a directory.
    fn walk_schema(&mut self, schema: &Schema, path: &Path) -> Result<(), Error> {
        tracing::debug!(depth = self.depth, path = %path.display(), "enter");

        let entries = self.entries(path)?;
        // Names some member asked for, found or not; `matched` holds only the found ones.
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut matched: HashSet<String> = HashSet::new();

        for (key, node) in schema.members() {
            let Some(name) = node.expected_name() else {
                self.push(
                    Violation::new(ViolationKind::InvalidInput, path)
                        .with_detail(format!("nested schema `{key}` has no directory name")),
                )?;
                continue;
            };

            let child_path = path.join(name);

            if name.contains(std::path::is_separator) {
                self.push(
                    Violation::new(ViolationKind::InvalidInput, &child_path)
                        .with_detail(format!("member `{key}` name is not a single path component")),
                )?;
                continue;
            }

            if !claimed.insert(name) {
                self.push(
                    Violation::new(ViolationKind::InvalidInput, &child_path)
                        .with_detail(format!("member `{key}` names an entry already claimed")),
                )?;
                continue;
            }

            let Some(entry) = entries.iter().find(|e| e.name() == name) else {
                let kind = if node.is_dir() {
                    ViolationKind::DirectoryMissing
                } else {
                    ViolationKind::FileMissing
                };
                self.report(kind, &child_path)?;
                continue;
            };

            matched.insert(name.to_string());
            self.check(node, entry, false)?;
        }

        for entry in entries.iter().filter(|e| !matched.contains(&e.name())) {
            match schema.rest_node() {
                Some(rest) => self.check(rest, entry, true)?,
                None => self.report(unexpected(entry), entry.path())?,
            }
        }

        tracing::debug!(depth = self.depth, path = %path.display(), "exit");
        Ok(())
    }

    /// Classify one on-disk entry against the node responsible for it.
    ///
    /// `is_rest` turns on the name check for file nodes: a member was found
    /// by its exact name already, a rest entry was not.
    fn check(&mut self, node: &SchemaNode, entry: &Entry, is_rest: bool) -> Result<(), Error> {
        match (node, entry) {
            (SchemaNode::Pattern(_) | SchemaNode::File(_), Entry::Dir(d)) => {
                self.report(ViolationKind::ExpectedFileFoundDirectory, d.path())
            }
            (SchemaNode::Pattern(p), Entry::File(f)) => {
                self.check_file(&p.matcher, &p.options, f, is_rest)
            }
            (SchemaNode::File(fixed), Entry::File(f)) => {
                self.check_file(&Matcher::exact(&fixed.name), &fixed.options, f, is_rest)
            }
            (SchemaNode::Dir(_) | SchemaNode::Schema(_), Entry::File(f)) => {
                self.report(ViolationKind::ExpectedDirectoryFoundFile, f.path())
            }
            (SchemaNode::Dir(node), Entry::Dir(d)) => match &node.body {
                DirBody::Files(p) => self.check_files_only(p, d),
                DirBody::Schema(inner) => self.descend(inner, d),
            },
            (SchemaNode::Schema(inner), Entry::Dir(d)) => self.descend(inner, d),
        }
    }

    fn check_file(
        &mut self,
        matcher: &Matcher,
        options: &FileOptions,
        file: &File,
        is_rest: bool,
    ) -> Result<(), Error> {
        if is_rest && !matcher.matches(&file.base()) {
            return self.report(ViolationKind::UnexpectedFile, file.path());
        }
        self.check_content(options, file)
    }

    fn check_content(&mut self, options: &FileOptions, file: &File) -> Result<(), Error> {
        for problem in options.check_content(file) {
            self.push(Violation::new(ViolationKind::InvalidContent, file.path()).with_detail(problem))?;
        }
        Ok(())
    }

    /// A directory that may hold only files matching `pattern`.
    fn check_files_only(&mut self, pattern: &FilePattern, dir: &Directory) -> Result<(), Error> {
        for entry in self.entries(dir.path())? {
            match &entry {
                Entry::Dir(d) => self.report(ViolationKind::UnexpectedDirectory, d.path())?,
                Entry::File(f) => self.check_file(&pattern.matcher, &pattern.options, f, true)?,
            }
        }
        Ok(())
    }

    fn descend(&mut self, schema: &Schema, dir: &Directory) -> Result<(), Error> {
        self.depth += 1;
        let res = self.walk_schema(schema, dir.path());
        self.depth -= 1;
        res
    }
}

fn unexpected(entry: &Entry) -> ViolationKind {
    if entry.is_dir() {
        ViolationKind::UnexpectedDirectory
    } else {
        ViolationKind::UnexpectedFile
    }
}
