use derive_more::Display;
use hashlink::LinkedHashMap;
use tracing::error;

pub type Children = LinkedHashMap<String, Node>;

/// The type of a node, rendered as the first character of a long listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("d")]
    Directory,
    #[display("-")]
    File,
}

/// A single entry of the virtual filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory { owner: String, children: Children },
    File { owner: String, content: Vec<u8> },
}

impl Node {
    pub fn directory(owner: impl Into<String>) -> Self {
        Node::Directory {
            owner: owner.into(),
            children: Children::new(),
        }
    }

    pub fn file(owner: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Node::File {
            owner: owner.into(),
            content: content.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory { .. } => NodeKind::Directory,
            Node::File { .. } => NodeKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn owner(&self) -> &str {
        match self {
            Node::Directory { owner, .. } | Node::File { owner, .. } => owner,
        }
    }

    pub fn set_owner(&mut self, new_owner: impl Into<String>) {
        match self {
            Node::Directory { owner, .. } | Node::File { owner, .. } => *owner = new_owner.into(),
        }
    }

    /// Directories report 0, files the length of their content
    pub fn size(&self) -> usize {
        match self {
            Node::Directory { .. } => 0,
            Node::File { content, .. } => content.len(),
        }
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Directory { children, .. } => Some(children),
            Node::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Node::Directory { children, .. } => Some(children),
            Node::File { .. } => None,
        }
    }
}

/// Owns the root directory of a virtual filesystem.
///
/// Nodes are addressed by the sequence of names leading to them from the
/// root; an empty sequence addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub fn new(root_owner: impl Into<String>) -> Self {
        Self {
            root: Node::directory(root_owner),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node(&self, path: &[String]) -> Option<&Node> {
        path.iter()
            .try_fold(&self.root, |current, name| current.children()?.get(name))
    }

    pub fn node_mut(&mut self, path: &[String]) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for name in path {
            current = current.children_mut()?.get_mut(name)?;
        }
        Some(current)
    }

    /// Children of the directory at `path`, `None` if it is missing or a file
    pub fn children(&self, path: &[String]) -> Option<&Children> {
        self.node(path)?.children()
    }

    pub fn children_mut(&mut self, path: &[String]) -> Option<&mut Children> {
        self.node_mut(path)?.children_mut()
    }

    /// Inserts `node` under the directory at `parent`, replacing any entry
    /// with the same name. Gives the node back if `parent` is not a directory.
    pub fn insert(&mut self, parent: &[String], name: String, node: Node) -> Result<(), Node> {
        match self.children_mut(parent) {
            Some(children) => {
                children.insert(name, node);
                Ok(())
            }
            None => Err(node),
        }
    }

    pub fn remove(&mut self, parent: &[String], name: &str) -> Option<Node> {
        self.children_mut(parent)?.remove(name)
    }

    /// Moves the subtree at `from_parent/from_name` to `to_parent/to_name`.
    ///
    /// Both ends are checked before anything is detached, so a `false` return
    /// leaves the tree untouched. The caller must make sure `to_parent` does
    /// not lie inside the moved subtree.
    pub fn transplant(
        &mut self,
        from_parent: &[String],
        from_name: &str,
        to_parent: &[String],
        to_name: String,
    ) -> bool {
        let source_exists = self
            .children(from_parent)
            .is_some_and(|children| children.contains_key(from_name));
        if !source_exists || self.children(to_parent).is_none() {
            return false;
        }

        let Some(node) = self.remove(from_parent, from_name) else {
            return false;
        };
        match self.insert(to_parent, to_name, node) {
            Ok(()) => true,
            Err(node) => {
                // unreachable while `to_parent` is outside the moved subtree
                if self.insert(from_parent, from_name.to_string(), node).is_err() {
                    error!(
                        "Lost '{}' while moving it from {:?} to {:?}",
                        from_name, from_parent, to_parent
                    );
                }
                false
            }
        }
    }
}
