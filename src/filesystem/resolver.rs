//! Turns path strings into locations inside a [`Tree`].
//!
//! Absolute paths start at the root, everything else starts at the current
//! directory. Empty and `.` segments are skipped and `..` never climbs above
//! the root.

use snafu::Snafu;
use tracing::debug;

use super::tree::{Node, Tree};

const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ResolveError {
    #[snafu(display("no such file or directory"))]
    NotFound { segment: String },
    #[snafu(display("not a directory"))]
    NotADirectory { segment: String },
    #[snafu(display("invalid empty name"))]
    EmptyName,
    #[snafu(display("'{segment}' cannot be used as a name"))]
    ReservedName { segment: String },
}

/// A parent directory plus a name inside it, with the node currently stored
/// under that name if there is one.
#[derive(Debug)]
pub struct ResolvedEntry<'a> {
    pub parent: Vec<String>,
    pub name: String,
    pub target: Option<&'a Node>,
}

impl ResolvedEntry<'_> {
    pub fn absolute_path(&self) -> Vec<String> {
        let mut path = self.parent.clone();
        path.push(self.name.clone());
        path
    }
}

fn starting_point(path: &str, current_dir: &[String]) -> Vec<String> {
    if path.starts_with(SEPARATOR) {
        Vec::new()
    } else {
        current_dir.to_vec()
    }
}

/// Applies `segments` to `location`, requiring every named segment to be an
/// existing directory.
fn walk_directories<'s>(
    tree: &Tree,
    mut location: Vec<String>,
    segments: impl Iterator<Item = &'s str>,
) -> Result<Vec<String>, ResolveError> {
    // The starting point itself has to exist; a stale current directory fails here
    if tree.children(&location).is_none() {
        return Err(ResolveError::NotFound {
            segment: location.last().cloned().unwrap_or_default(),
        });
    }

    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                location.pop();
            }
            name => {
                let children = tree.children(&location).ok_or_else(|| {
                    ResolveError::NotADirectory {
                        segment: name.to_string(),
                    }
                })?;
                match children.get(name) {
                    Some(node) if node.is_directory() => location.push(name.to_string()),
                    Some(_) => {
                        return Err(ResolveError::NotADirectory {
                            segment: name.to_string(),
                        });
                    }
                    None => {
                        return Err(ResolveError::NotFound {
                            segment: name.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(location)
}

/// Resolves `path` to the absolute name sequence of an existing directory
pub fn resolve_directory(
    tree: &Tree,
    current_dir: &[String],
    path: &str,
) -> Result<Vec<String>, ResolveError> {
    let resolved = walk_directories(
        tree,
        starting_point(path, current_dir),
        path.split(SEPARATOR),
    )?;
    debug!("Resolved directory '{}' to {:?}", path, resolved);
    Ok(resolved)
}

/// Resolves every segment of `path` except the last as a directory and
/// returns the last one as a name inside it, which need not exist yet.
pub fn resolve_entry<'a>(
    tree: &'a Tree,
    current_dir: &[String],
    path: &str,
) -> Result<ResolvedEntry<'a>, ResolveError> {
    let (parent_path, name) = match path.rsplit_once(SEPARATOR) {
        Some((parent_path, name)) => (Some(parent_path), name),
        None => (None, path),
    };

    match name {
        "" => return Err(ResolveError::EmptyName),
        "." | ".." => {
            return Err(ResolveError::ReservedName {
                segment: name.to_string(),
            });
        }
        _ => {}
    }

    let start = starting_point(path, current_dir);
    let parent = match parent_path {
        Some(parent_path) => walk_directories(tree, start, parent_path.split(SEPARATOR))?,
        None => walk_directories(tree, start, std::iter::empty())?,
    };

    let target = tree.children(&parent).and_then(|children| children.get(name));
    debug!(
        "Resolved entry '{}' to {:?} / '{}' (exists: {})",
        path,
        parent,
        name,
        target.is_some()
    );

    Ok(ResolvedEntry {
        parent,
        name: name.to_string(),
        target,
    })
}

/// Resolves `path` to an existing node of either kind
pub fn resolve_node<'a>(
    tree: &'a Tree,
    current_dir: &[String],
    path: &str,
) -> Result<(Vec<String>, &'a Node), ResolveError> {
    let mut segments = path
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>();

    // A trailing name may be a file; anything before it must be a directory
    let last = match segments.last().copied() {
        Some(name) if name != ".." => {
            segments.pop();
            Some(name)
        }
        _ => None,
    };

    let mut location = walk_directories(
        tree,
        starting_point(path, current_dir),
        segments.into_iter(),
    )?;

    if let Some(name) = last {
        if !tree
            .children(&location)
            .is_some_and(|children| children.contains_key(name))
        {
            return Err(ResolveError::NotFound {
                segment: name.to_string(),
            });
        }
        location.push(name.to_string());
    }

    let node = tree.node(&location).ok_or_else(|| ResolveError::NotFound {
        segment: path.to_string(),
    })?;
    // A trailing separator only ever names a directory
    if path.ends_with(SEPARATOR) && !node.is_directory() {
        return Err(ResolveError::NotADirectory {
            segment: location.last().cloned().unwrap_or_default(),
        });
    }
    Ok((location, node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    use crate::filesystem::tree::NodeKind;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    /// /a/b/c.txt, /a/d/, /top.txt
    #[fixture]
    fn tree() -> Tree {
        let mut tree = Tree::new("root");
        tree.insert(&[], "a".into(), Node::directory("root")).unwrap();
        tree.insert(&path(&["a"]), "b".into(), Node::directory("root"))
            .unwrap();
        tree.insert(&path(&["a", "b"]), "c.txt".into(), Node::file("root", "c"))
            .unwrap();
        tree.insert(&path(&["a"]), "d".into(), Node::directory("root"))
            .unwrap();
        tree.insert(&[], "top.txt".into(), Node::file("root", "top"))
            .unwrap();
        tree
    }

    #[rstest]
    #[case("/", &[], &[])]
    #[case("", &["a"], &["a"])]
    #[case("a", &[], &["a"])]
    #[case("b", &["a"], &["a", "b"])]
    #[case("/a//b/", &["a", "d"], &["a", "b"])]
    #[case("./a/./b", &[], &["a", "b"])]
    #[case("..", &["a", "b"], &["a"])]
    #[case("../d", &["a", "b"], &["a", "d"])]
    #[case("..", &[], &[])]
    #[case("../../../..", &["a"], &[])]
    #[case("/../a", &["a", "d"], &["a"])]
    fn resolves_directories(
        tree: Tree,
        #[case] input: &str,
        #[case] current_dir: &[&str],
        #[case] expected: &[&str],
    ) {
        let resolved = resolve_directory(&tree, &path(current_dir), input);
        assert_eq!(resolved, Ok(path(expected)));
    }

    #[rstest]
    #[case("missing")]
    #[case("a/missing")]
    #[case("/a/b/missing/..")]
    fn missing_directory_is_not_found(tree: Tree, #[case] input: &str) {
        let resolved = resolve_directory(&tree, &[], input);
        assert!(matches!(resolved, Err(ResolveError::NotFound { .. })));
    }

    #[rstest]
    #[case("top.txt")]
    #[case("/a/b/c.txt")]
    #[case("a/b/c.txt/..")]
    fn file_in_directory_position_is_not_a_directory(tree: Tree, #[case] input: &str) {
        let resolved = resolve_directory(&tree, &[], input);
        assert!(matches!(resolved, Err(ResolveError::NotADirectory { .. })));
    }

    #[rstest]
    fn absolute_paths_ignore_current_directory(tree: Tree) {
        for current_dir in [path(&[]), path(&["a"]), path(&["a", "b"]), path(&["a", "d"])] {
            assert_eq!(
                resolve_directory(&tree, &current_dir, "/a/b"),
                Ok(path(&["a", "b"]))
            );
            let (location, node) = resolve_node(&tree, &current_dir, "/a/b/c.txt").unwrap();
            assert_eq!(location, path(&["a", "b", "c.txt"]));
            assert_eq!(node.kind(), NodeKind::File);
        }
    }

    #[rstest]
    fn stale_current_directory_fails_relative_lookups(tree: Tree) {
        let stale = path(&["gone"]);
        assert!(matches!(
            resolve_directory(&tree, &stale, "."),
            Err(ResolveError::NotFound { .. })
        ));
        assert_eq!(resolve_directory(&tree, &stale, "/a"), Ok(path(&["a"])));
    }

    #[rstest]
    fn entry_returns_existing_target(tree: Tree) {
        let entry = resolve_entry(&tree, &path(&["a"]), "b/c.txt").unwrap();
        assert_eq!(entry.parent, path(&["a", "b"]));
        assert_eq!(entry.name, "c.txt");
        assert_eq!(entry.target.map(Node::kind), Some(NodeKind::File));
        assert_eq!(entry.absolute_path(), path(&["a", "b", "c.txt"]));
    }

    #[rstest]
    fn entry_allows_missing_last_segment(tree: Tree) {
        let entry = resolve_entry(&tree, &[], "/a/d/new.txt").unwrap();
        assert_eq!(entry.parent, path(&["a", "d"]));
        assert_eq!(entry.name, "new.txt");
        assert!(entry.target.is_none());
    }

    #[rstest]
    fn entry_with_bare_name_uses_current_directory(tree: Tree) {
        let entry = resolve_entry(&tree, &path(&["a"]), "d").unwrap();
        assert_eq!(entry.parent, path(&["a"]));
        assert_eq!(entry.target.map(Node::kind), Some(NodeKind::Directory));
    }

    #[rstest]
    #[case("a/")]
    #[case("/")]
    #[case("")]
    fn entry_with_empty_last_segment_is_rejected(tree: Tree, #[case] input: &str) {
        assert_eq!(
            resolve_entry(&tree, &[], input).unwrap_err(),
            ResolveError::EmptyName
        );
    }

    #[rstest]
    #[case("a/.")]
    #[case("..")]
    fn entry_with_reserved_last_segment_is_rejected(tree: Tree, #[case] input: &str) {
        assert!(matches!(
            resolve_entry(&tree, &[], input),
            Err(ResolveError::ReservedName { .. })
        ));
    }

    #[rstest]
    #[case("missing/x", "missing")]
    #[case("top.txt/x", "top.txt")]
    fn entry_with_broken_parent_chain_fails(
        tree: Tree,
        #[case] input: &str,
        #[case] segment: &str,
    ) {
        let error = resolve_entry(&tree, &[], input).unwrap_err();
        match error {
            ResolveError::NotFound { segment: found } | ResolveError::NotADirectory { segment: found } => {
                assert_eq!(found, segment)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    #[case(".", &["a"], &["a"])]
    #[case("/", &["a"], &[])]
    #[case("b/c.txt", &["a"], &["a", "b", "c.txt"])]
    #[case("../top.txt", &["a"], &["top.txt"])]
    #[case("b/..", &["a"], &["a"])]
    fn resolves_nodes_of_any_kind(
        tree: Tree,
        #[case] input: &str,
        #[case] current_dir: &[&str],
        #[case] expected: &[&str],
    ) {
        let (location, node) = resolve_node(&tree, &path(current_dir), input).unwrap();
        assert_eq!(location, path(expected));
        assert_eq!(tree.node(&location), Some(node));
    }

    #[rstest]
    #[case("top.txt/")]
    #[case("/a/b/c.txt/")]
    #[case("/a/b/c.txt//")]
    fn node_with_trailing_separator_must_be_a_directory(tree: Tree, #[case] input: &str) {
        assert!(matches!(
            resolve_node(&tree, &[], input),
            Err(ResolveError::NotADirectory { .. })
        ));
    }

    #[rstest]
    #[case("a/")]
    #[case("/a/b/")]
    fn directory_with_trailing_separator_resolves(tree: Tree, #[case] input: &str) {
        let (_, node) = resolve_node(&tree, &[], input).unwrap();
        assert!(node.is_directory());
    }

    #[rstest]
    fn node_lookup_reports_missing_leaf(tree: Tree) {
        assert_eq!(
            resolve_node(&tree, &[], "a/nope").unwrap_err(),
            ResolveError::NotFound {
                segment: "nope".into()
            }
        );
    }
}
