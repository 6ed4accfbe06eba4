//! In-memory filesystem tree, path resolution and archive import.
//!
//! The tree is a plain owned structure: every node but the root belongs to
//! exactly one directory, and nodes are always found again by walking names
//! from the root.

pub(crate) mod archive;
mod importer;
mod resolver;
mod tree;

pub use archive::{ArchiveEntry, ArchiveError, EntryKind, read_zip};
pub use importer::{ImportError, Importer};
pub use resolver::{ResolveError, ResolvedEntry, resolve_directory, resolve_entry, resolve_node};
pub use tree::{Children, Node, NodeKind, Tree};
