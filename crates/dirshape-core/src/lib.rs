//! Declare the shape of a directory tree, then create it or check it.
//!
//! ```no_run
//! use std::path::Path;
//! use dirshape_core::{Schema, dir, file, instantiate, pattern, validate};
//!
//! # fn main() -> Result<(), dirshape_core::Error> {
//! let schema = Schema::new()
//!     .member("readme", file("README.md").default_content("hello"))
//!     .member("src", dir("src", pattern("*.ts")?));
//!
//! let inst = instantiate(&schema, Path::new("project"))?;
//! assert_eq!(validate(&schema, inst.path(), false)?.count(), 0);
//! # Ok(())
//! # }
//! ```
mod compile;
mod error;
pub mod fs;
mod instantiate;
pub mod report;
mod schema;
mod validate;
mod violation;

pub use compile::{Matcher, compile};
pub use error::{BoxError, Error};
pub use instantiate::{
    CreateListener, Instance, Instantiated, Listeners, NoopListener, instantiate, instantiate_with,
};
pub use schema::{
    Content, ContentValidator, DirBody, DirNode, FileOptions, FilePattern, FixedFile, Schema,
    SchemaNode, dir, file, pattern, pattern_regex,
};
pub use validate::{ValidateSettings, is_valid, validate, validate_with};
pub use violation::{ErrorCollector, Violation, ViolationKind};
