use std::{path::Path, sync::Arc};

use snafu::ResultExt;
use tracing::{debug, info};

use crate::commands::{ArchiveReadSnafu, Command, CommandError, CommandTrait, ImportFailedSnafu};
use crate::config::ShellConfig;
use crate::ext::{Environment, HostEnvironment};
use crate::filesystem::{Importer, Tree, read_zip};

/// Everything a running shell knows about its VFS.
///
/// The current directory is kept as names from the root and looked up again
/// on every command, so replacing the tree never leaves dangling references.
pub struct Session {
    config: Arc<ShellConfig>,
    environment: Box<dyn Environment>,
    tree: Tree,
    current_dir: Vec<String>,
    loaded: bool,
    finished: bool,
}

impl Session {
    pub fn new(config: Arc<ShellConfig>) -> Self {
        Self::with_environment(config, HostEnvironment)
    }

    pub fn with_environment(
        config: Arc<ShellConfig>,
        environment: impl Environment + 'static,
    ) -> Self {
        let tree = Tree::new(config.owner.clone());
        Self {
            config,
            environment: Box::new(environment),
            tree,
            current_dir: Vec::new(),
            loaded: false,
            finished: false,
        }
    }

    /// Runs one command line and returns the text to show for it
    pub fn execute(&mut self, command_line: &str) -> String {
        let mut tokens = command_line.split_whitespace();
        let Some(name) = tokens.next() else {
            return String::new();
        };
        let args = tokens.collect::<Vec<_>>();
        debug!("Executing '{}' with arguments {:?}", name, args);

        let Some(command) = Command::parse(name, &args) else {
            return self.config.messages.command_not_found(name);
        };
        if command.requires_vfs() && !self.loaded {
            debug!("Refusing '{}' before a VFS is loaded", name);
            return self.config.messages.not_loaded.clone();
        }

        match command.run(self) {
            Ok(output) => output,
            Err(e) => {
                debug!("Command '{}' failed: {:?}", name, e);
                e.to_string()
            }
        }
    }

    /// Imports the zip archive at `path`, keeping the current state if
    /// anything goes wrong
    pub fn load_archive(&mut self, path: &Path) -> Result<(), CommandError> {
        let display_path = path.display().to_string();
        let entries = read_zip(path).context(ArchiveReadSnafu {
            path: display_path.clone(),
        })?;
        let tree = Importer::new(self.config.owner.clone())
            .import(entries)
            .context(ImportFailedSnafu { path: display_path })?;

        info!("Loaded VFS from {}", path.display());
        self.replace_tree(tree);
        Ok(())
    }

    /// Swaps in a new tree and goes back to its root
    pub fn replace_tree(&mut self, tree: Tree) {
        self.tree = tree;
        self.current_dir.clear();
        self.loaded = true;
    }

    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.config.user,
            self.config.host,
            self.current_dir_display()
        )
    }

    pub fn current_dir_display(&self) -> String {
        format!("/{}", self.current_dir.join("/"))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn current_dir(&self) -> &[String] {
        &self.current_dir
    }

    pub(crate) fn set_current_dir(&mut self, current_dir: Vec<String>) {
        self.current_dir = current_dir;
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::Messages;
    use crate::filesystem::Node;

    fn test_config() -> Arc<ShellConfig> {
        Arc::new(ShellConfig {
            owner: "root".to_string(),
            user: "alice".to_string(),
            host: "box".to_string(),
            messages: Messages::default(),
        })
    }

    pub(crate) fn unloaded_session() -> Session {
        let env = HashMap::from([("DIR".to_string(), "a".to_string())]);
        Session::with_environment(test_config(), env)
    }

    /// /a/b/c.txt ("hello"), /a/d/, /top.txt ("top", owned by alice)
    pub(crate) fn loaded_session() -> Session {
        let path = |segments: &[&str]| segments.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut tree = Tree::new("root");
        tree.insert(&[], "a".into(), Node::directory("root")).unwrap();
        tree.insert(&path(&["a"]), "b".into(), Node::directory("root"))
            .unwrap();
        tree.insert(&path(&["a", "b"]), "c.txt".into(), Node::file("root", "hello"))
            .unwrap();
        tree.insert(&path(&["a"]), "d".into(), Node::directory("root"))
            .unwrap();
        tree.insert(&[], "top.txt".into(), Node::file("alice", "top"))
            .unwrap();

        let mut session = unloaded_session();
        session.replace_tree(tree);
        session
    }

    #[test]
    fn empty_line_produces_no_output() {
        let mut session = loaded_session();
        assert_eq!(session.execute(""), "");
        assert_eq!(session.execute("   \t "), "");
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut session = loaded_session();
        assert_eq!(session.execute("frobnicate now"), "Command not found: frobnicate");
    }

    #[test]
    fn vfs_commands_need_a_loaded_tree() {
        let mut session = unloaded_session();
        for line in ["ls", "cd a", "mv a b", "chown bob a"] {
            assert_eq!(session.execute(line), "VFS not loaded");
        }
        assert!(!session.is_loaded());
        assert!(session.current_dir().is_empty());
        assert!(session.tree().children(&[]).unwrap().is_empty());
    }

    #[test]
    fn not_loaded_message_comes_from_config() {
        let config = ShellConfig {
            messages: Messages {
                not_loaded: "load something first".to_string(),
                command_not_found: "{command}?".to_string(),
            },
            ..(*test_config()).clone()
        };
        let mut session = Session::with_environment(Arc::new(config), HashMap::<String, String>::new());

        assert_eq!(session.execute("ls"), "load something first");
        assert_eq!(session.execute("date"), "date?");
    }

    #[test]
    fn prompt_follows_current_directory() {
        let mut session = loaded_session();
        assert_eq!(session.prompt(), "alice@box:/$ ");
        session.execute("cd /a/b");
        assert_eq!(session.prompt(), "alice@box:/a/b$ ");
    }

    #[test]
    fn imported_archive_lists_like_a_shell() {
        let mut session = unloaded_session();
        let tree = Importer::new("root")
            .import(vec![
                crate::filesystem::ArchiveEntry::directory("a/"),
                crate::filesystem::ArchiveEntry::file("a/b.txt", "hi"),
            ])
            .unwrap();
        session.replace_tree(tree);

        assert_eq!(session.execute("ls"), "a");
        session.execute("cd a");
        assert_eq!(session.execute("ls -l"), "-rw-r--r-- 1 root 2 b.txt");
    }

    #[test]
    fn moving_an_ancestor_of_the_current_directory_strands_relative_lookups() {
        let mut session = loaded_session();
        session.execute("cd a/b");
        assert_eq!(session.execute("mv /a /moved"), "");

        assert_eq!(session.current_dir(), ["a", "b"]);
        assert_eq!(session.execute("ls"), "ls: .: no such file or directory");
        assert_eq!(session.execute("cd /moved/b"), "");
        assert_eq!(session.execute("ls"), "c.txt");
    }
}
