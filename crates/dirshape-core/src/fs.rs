//! Path-bound file and directory handles.
//!
//! These are thin wrappers over `std::fs`; the instantiator hands them back
//! to the caller and content validators read through them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::violation::{Violation, ViolationKind};

/// A file at a fixed path. The file need not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        File { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name with extension, e.g. `config.json`.
    pub fn base(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without the extension, e.g. `config`.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    pub fn parent(&self) -> Option<Directory> {
        self.path.parent().map(Directory::new)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the file if it is absent, writing `default` (or nothing).
    ///
    /// An existing file is left untouched. A directory at this path is a
    /// role mismatch and is reported as such.
    pub fn create(&self, default: Option<&[u8]>) -> Result<&Self, Error> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Err(Violation::new(
                ViolationKind::ExpectedFileFoundDirectory,
                &self.path,
            )
            .into()),
            Ok(_) => Ok(self),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.write(default.unwrap_or_default())?;
                Ok(self)
            }
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<&Self, Error> {
        fs::write(&self.path, data).map_err(|e| Error::io(&self.path, e))?;
        Ok(self)
    }

    pub fn read(&self) -> Result<Vec<u8>, Error> {
        fs::read(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    pub fn read_to_string(&self) -> Result<String, Error> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}

/// A directory at a fixed path. The directory need not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    path: PathBuf,
}

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(File),
    Dir(Directory),
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File(f) => f.path(),
            Entry::Dir(d) => d.path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    /// Base name of the entry.
    pub fn name(&self) -> String {
        match self {
            Entry::File(f) => f.base(),
            Entry::Dir(d) => d.name(),
        }
    }
}

impl Directory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Directory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Create the directory if absent. Parents must already exist.
    pub fn create(&self) -> Result<&Self, Error> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Ok(self),
            Ok(_) => Err(Violation::new(
                ViolationKind::ExpectedDirectoryFoundFile,
                &self.path,
            )
            .into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir(&self.path).map_err(|e| Error::io(&self.path, e))?;
                Ok(self)
            }
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Handle for a file directly inside this directory.
    pub fn file(&self, name: &str) -> File {
        File::new(self.path.join(name))
    }

    /// Handle for a directory directly inside this directory.
    pub fn dir(&self, name: &str) -> Directory {
        Directory::new(self.path.join(name))
    }

    /// Immediate children sorted by name. Symlinks are followed.
    pub fn entries(&self) -> Result<Vec<Entry>, Error> {
        self.entries_with(true)
    }

    /// Immediate children sorted by name.
    ///
    /// With `follow_symlinks` off, a symlink is classified by the link
    /// itself, so a link to a directory is listed as a file.
    pub fn entries_with(&self, follow_symlinks: bool) -> Result<Vec<Entry>, Error> {
        let rd = fs::read_dir(&self.path).map_err(|e| Error::io(&self.path, e))?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for ent in rd {
            let ent = ent.map_err(|e| Error::io(&self.path, e))?;
            paths.push(ent.path());
        }
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let meta = if follow_symlinks {
                fs::metadata(&path)
            } else {
                fs::symlink_metadata(&path)
            };
            // A dangling link has no target to stat; report it as a plain file.
            let is_dir = match meta {
                Ok(m) => m.is_dir(),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
                Err(e) => return Err(Error::io(&path, e)),
            };
            entries.push(if is_dir {
                Entry::Dir(Directory::new(path))
            } else {
                Entry::File(File::new(path))
            });
        }
        Ok(entries)
    }

    /// Every entry below this directory, depth first, parents before children.
    pub fn walk(&self) -> Result<Vec<Entry>, Error> {
        let mut out = Vec::new();
        self.walk_into(&mut out)?;
        Ok(out)
    }

    fn walk_into(&self, out: &mut Vec<Entry>) -> Result<(), Error> {
        for entry in self.entries()? {
            let child = match &entry {
                Entry::Dir(d) => Some(d.clone()),
                Entry::File(_) => None,
            };
            out.push(entry);
            if let Some(d) = child {
                d.walk_into(out)?;
            }
        }
        Ok(())
    }

    /// Files directly inside, or anywhere below when `recursive`.
    pub fn files(&self, recursive: bool) -> Result<Vec<File>, Error> {
        let entries = if recursive {
            self.walk()?
        } else {
            self.entries()?
        };
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::File(f) => Some(f),
                Entry::Dir(_) => None,
            })
            .collect())
    }

    /// Directories directly inside, or anywhere below when `recursive`.
    pub fn dirs(&self, recursive: bool) -> Result<Vec<Directory>, Error> {
        let entries = if recursive {
            self.walk()?
        } else {
            self.entries()?
        };
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Dir(d) => Some(d),
                Entry::File(_) => None,
            })
            .collect())
    }
}
