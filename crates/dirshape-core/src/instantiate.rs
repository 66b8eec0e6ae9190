//! Materialize a schema on disk.

use std::path::Path;

use crate::error::Error;
use crate::fs::{Directory, Entry, File};
use crate::schema::{DirBody, FileOptions, Schema, SchemaNode};

/// Callbacks fired while a schema is instantiated.
///
/// `on_create` fires for every file and directory, before the
/// type-specific callback.
pub trait CreateListener {
    fn on_create(&mut self, _entry: &Entry) {}
    fn on_create_file(&mut self, _file: &File) {}
    fn on_create_dir(&mut self, _dir: &Directory) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl CreateListener for NoopListener {}

type Callback<'a, T> = Box<dyn FnMut(&T) + 'a>;

/// Closure-based listener; unset callbacks are skipped.
#[derive(Default)]
pub struct Listeners<'a> {
    pub on_create: Option<Callback<'a, Entry>>,
    pub on_create_file: Option<Callback<'a, File>>,
    pub on_create_dir: Option<Callback<'a, Directory>>,
}

impl CreateListener for Listeners<'_> {
    fn on_create(&mut self, entry: &Entry) {
        if let Some(f) = self.on_create.as_mut() {
            f(entry);
        }
    }

    fn on_create_file(&mut self, file: &File) {
        if let Some(f) = self.on_create_file.as_mut() {
            f(file);
        }
    }

    fn on_create_dir(&mut self, dir: &Directory) {
        if let Some(f) = self.on_create_dir.as_mut() {
            f(dir);
        }
    }
}

/// What instantiating one member produced.
#[derive(Debug, Clone)]
pub enum Instantiated {
    File(File),
    Dir(Directory),
    Schema(Instance),
}

/// Handles to everything one schema level created, keyed like the schema.
#[derive(Debug, Clone)]
pub struct Instance {
    dir: Directory,
    members: Vec<(String, Instantiated)>,
}

impl Instance {
    /// The directory this level operated on.
    pub fn dir(&self) -> &Directory {
        &self.dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn get(&self, key: &str) -> Option<&Instantiated> {
        self.members.iter().find(|(k, _)| k == key).map(|(_, i)| i)
    }

    pub fn file(&self, key: &str) -> Option<&File> {
        match self.get(key)? {
            Instantiated::File(f) => Some(f),
            _ => None,
        }
    }

    /// The directory created for `key`, whether it has a pattern or a nested schema.
    pub fn directory(&self, key: &str) -> Option<&Directory> {
        match self.get(key)? {
            Instantiated::Dir(d) => Some(d),
            Instantiated::Schema(i) => Some(&i.dir),
            Instantiated::File(_) => None,
        }
    }

    pub fn nested(&self, key: &str) -> Option<&Instance> {
        match self.get(key)? {
            Instantiated::Schema(i) => Some(i),
            _ => None,
        }
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &Instantiated)> {
        self.members.iter().map(|(k, i)| (k.as_str(), i))
    }
}

/// Create `schema` at `path`.
///
/// Existing files and directories are reused; existing file content is
/// never overwritten. The rest node is not instantiated. On failure the
/// tree may be left partially created.
pub fn instantiate(schema: &Schema, path: &Path) -> Result<Instance, Error> {
    instantiate_with(schema, path, &mut NoopListener)
}

/// Like [`instantiate`], reporting each created entry to `listener`.
pub fn instantiate_with(
    schema: &Schema,
    path: &Path,
    listener: &mut impl CreateListener,
) -> Result<Instance, Error> {
    let dir = create_dir(path, listener)?;
    let mut members = Vec::with_capacity(schema.len());

    for (key, node) in schema.members() {
        let created = match node {
            SchemaNode::File(f) => {
                Instantiated::File(create_file(&dir, &f.name, &f.options, listener)?)
            }
            SchemaNode::Pattern(p) => {
                Instantiated::File(create_file(&dir, p.source(), &p.options, listener)?)
            }
            SchemaNode::Dir(d) => match &d.body {
                // A pattern constrains future contents; nothing inside is created.
                DirBody::Files(_) => {
                    Instantiated::Dir(create_dir(&dir.path().join(&d.name), listener)?)
                }
                DirBody::Schema(inner) => Instantiated::Schema(instantiate_with(
                    inner,
                    &dir.path().join(&d.name),
                    listener,
                )?),
            },
            SchemaNode::Schema(inner) => {
                let name = inner.name().ok_or_else(|| Error::MissingDirName {
                    key: key.to_string(),
                })?;
                Instantiated::Schema(instantiate_with(inner, &dir.path().join(name), listener)?)
            }
        };
        members.push((key.to_string(), created));
    }

    Ok(Instance { dir, members })
}

fn create_dir(path: &Path, listener: &mut impl CreateListener) -> Result<Directory, Error> {
    let dir = Directory::new(path);
    dir.create()?;
    tracing::debug!(path = %path.display(), "dir ready");

    listener.on_create(&Entry::Dir(dir.clone()));
    listener.on_create_dir(&dir);
    Ok(dir)
}

fn create_file(
    parent: &Directory,
    name: &str,
    options: &FileOptions,
    listener: &mut impl CreateListener,
) -> Result<File, Error> {
    let file = parent.file(name);
    file.create(options.default_content.as_ref().map(|c| c.as_bytes()))?;
    tracing::debug!(path = %file.path().display(), "file ready");

    listener.on_create(&Entry::File(file.clone()));
    listener.on_create_file(&file);
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{dir, file, pattern};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl CreateListener for Recorder {
        fn on_create(&mut self, entry: &Entry) {
            self.events.push(format!("create {}", entry.name()));
        }
        fn on_create_file(&mut self, file: &File) {
            self.events.push(format!("file {}", file.base()));
        }
        fn on_create_dir(&mut self, dir: &Directory) {
            self.events.push(format!("dir {}", dir.name()));
        }
    }

    #[test]
    fn listener_sees_pre_order_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");

        let schema = Schema::new()
            .member("a", file("a.txt"))
            .member("sub", dir("sub", Schema::new().member("b", file("b.txt"))))
            .member("logs", dir("logs", pattern("*.log").unwrap()));

        let mut rec = Recorder::default();
        instantiate_with(&schema, &root, &mut rec).unwrap();

        assert_eq!(
            rec.events,
            vec![
                "create root",
                "dir root",
                "create a.txt",
                "file a.txt",
                "create sub",
                "dir sub",
                "create b.txt",
                "file b.txt",
                "create logs",
                "dir logs",
            ]
        );
    }

    #[test]
    fn closure_listeners() {
        let tmp = tempfile::tempdir().unwrap();
        let schema = Schema::new()
            .member("a", file("a.txt"))
            .member("b", file("b.txt"));

        let mut files = 0;
        let mut all = 0;
        {
            let mut listeners = Listeners {
                on_create: Some(Box::new(|_: &Entry| all += 1)),
                on_create_file: Some(Box::new(|_: &File| files += 1)),
                on_create_dir: None,
            };
            instantiate_with(&schema, tmp.path(), &mut listeners).unwrap();
        }
        assert_eq!(files, 2);
        assert_eq!(all, 3);
    }

    #[test]
    fn nameless_nested_schema_fails_fast() {
        let tmp = tempfile::tempdir().unwrap();
        let schema = Schema::new()
            .member("first", file("first.txt"))
            .member("anon", Schema::new().member("x", file("x")))
            .member("last", file("last.txt"));

        let err = instantiate(&schema, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::MissingDirName { ref key } if key == "anon"));
        assert!(tmp.path().join("first.txt").exists());
        assert!(!tmp.path().join("last.txt").exists());
    }

    #[test]
    fn instance_exposes_handles() {
        let tmp = tempfile::tempdir().unwrap();
        let schema = Schema::new()
            .member("cfg", file("cfg.toml"))
            .member("data", dir("data", pattern("*.csv").unwrap()))
            .member("nested", Schema::named("nested").member("inner", file("inner")));

        let inst = instantiate(&schema, tmp.path()).unwrap();

        assert_eq!(inst.path(), tmp.path());
        assert_eq!(inst.file("cfg").map(File::base), Some("cfg.toml".into()));
        assert_eq!(inst.directory("data").map(Directory::name), Some("data".into()));
        assert!(inst.nested("nested").and_then(|n| n.file("inner")).is_some());
        assert_eq!(
            inst.directory("nested").map(|d| d.path().to_path_buf()),
            Some(tmp.path().join("nested"))
        );
        assert!(inst.get("missing").is_none());
    }
}
