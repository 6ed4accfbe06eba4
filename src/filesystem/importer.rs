use std::collections::HashSet;

use snafu::Snafu;
use tracing::{debug, info};

use super::archive::{ArchiveEntry, EntryKind};
use super::tree::{Node, Tree};

/// Builds a [`Tree`] out of archive entries.
///
/// Entries are staged into a fresh tree that is only handed out once every
/// entry went in, so a failed import never leaves a half-built tree behind.
#[derive(Debug, Clone)]
pub struct Importer {
    owner: String,
}

impl Importer {
    /// `owner` is assigned to the root, to entries that carry no owner of
    /// their own and to directories created only because a deeper entry
    /// needed them.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }

    pub fn import(
        &self,
        entries: impl IntoIterator<Item = ArchiveEntry>,
    ) -> Result<Tree, ImportError> {
        let mut staging = Staging {
            tree: Tree::new(self.owner.clone()),
            implicit_dirs: HashSet::new(),
        };

        let mut count = 0usize;
        for entry in entries {
            staging.add(entry, &self.owner)?;
            count += 1;
        }

        info!("Imported {} archive entries", count);
        Ok(staging.tree)
    }
}

struct Staging {
    tree: Tree,
    /// Directories nobody has set an owner for yet
    implicit_dirs: HashSet<Vec<String>>,
}

impl Staging {
    fn add(&mut self, entry: ArchiveEntry, default_owner: &str) -> Result<(), ImportError> {
        let segments = split_entry_path(&entry.path)?;
        let Some((name, parents)) = segments.split_last() else {
            debug!("Skipping archive entry without a name: '{}'", entry.path);
            return Ok(());
        };

        let parent = self.ensure_directories(&entry.path, parents, default_owner)?;
        let owner = entry.owner.unwrap_or_else(|| default_owner.to_string());
        let mut location = parent.clone();
        location.push(name.clone());

        match entry.kind {
            EntryKind::Directory => match self.tree.node_mut(&location) {
                Some(Node::Directory { owner: existing, .. }) => {
                    if self.implicit_dirs.remove(&location) {
                        *existing = owner;
                    }
                }
                Some(Node::File { .. }) => {
                    return Err(ImportError::Conflict {
                        entry: entry.path,
                        segment: location.join("/"),
                    });
                }
                None => self.insert(&parent, name, Node::directory(owner))?,
            },
            EntryKind::File(content) => {
                self.implicit_dirs.retain(|dir| !dir.starts_with(&location));
                self.insert(&parent, name, Node::file(owner, content))?;
            }
        }

        Ok(())
    }

    /// Walks `parents`, creating missing directories, and returns the location
    /// of the last one
    fn ensure_directories(
        &mut self,
        entry_path: &str,
        parents: &[String],
        default_owner: &str,
    ) -> Result<Vec<String>, ImportError> {
        let mut location = Vec::with_capacity(parents.len());

        for segment in parents {
            let existing = self
                .tree
                .children(&location)
                .and_then(|children| children.get(segment))
                .map(Node::is_directory);

            match existing {
                Some(true) => {}
                Some(false) => {
                    location.push(segment.clone());
                    return Err(ImportError::Conflict {
                        entry: entry_path.to_string(),
                        segment: location.join("/"),
                    });
                }
                None => {
                    self.insert(&location, segment, Node::directory(default_owner))?;
                    let mut created = location.clone();
                    created.push(segment.clone());
                    self.implicit_dirs.insert(created);
                }
            }
            location.push(segment.clone());
        }

        Ok(location)
    }

    fn insert(&mut self, parent: &[String], name: &str, node: Node) -> Result<(), ImportError> {
        self.tree
            .insert(parent, name.to_string(), node)
            .map_err(|_| ImportError::Conflict {
                entry: name.to_string(),
                segment: parent.join("/"),
            })
    }
}

fn split_entry_path(path: &str) -> Result<Vec<String>, ImportError> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| match segment {
            ".." => Err(ImportError::InvalidEntry {
                entry: path.to_string(),
            }),
            name => Ok(name.to_string()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ImportError {
    #[snafu(display("cannot import '{entry}': '{segment}' is a file"))]
    Conflict { entry: String, segment: String },
    #[snafu(display("invalid archive entry '{entry}'"))]
    InvalidEntry { entry: String },
}
