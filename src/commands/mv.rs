use snafu::ResultExt;
use tracing::debug;

use crate::commands::{CannotCreateSnafu, CommandError, CommandTrait, PathSnafu, expect_args};
use crate::filesystem::{ResolveError, Tree, resolve_directory, resolve_entry};
use crate::session::Session;

/// Moves or renames a file or directory
#[derive(Debug, Clone)]
pub struct Mv {
    args: Vec<String>,
}

impl Mv {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

/// Works out the directory and name the source will be stored under.
///
/// A destination ending in an empty, `.` or `..` segment names a directory to
/// move into under the source's own name; anything else names the new entry
/// itself, which must not exist yet.
fn destination(
    tree: &Tree,
    current_dir: &[String],
    destination: &str,
    source_name: &str,
) -> Result<(Vec<String>, String), CommandError> {
    let last_segment = destination.rsplit('/').next().unwrap_or_default();

    if matches!(last_segment, "" | "." | "..") {
        let directory = resolve_directory(tree, current_dir, destination)
            .context(CannotCreateSnafu { path: destination })?;
        if tree
            .children(&directory)
            .is_some_and(|children| children.contains_key(source_name))
        {
            return Err(CommandError::DestinationExists {
                path: format!("{}/{}", destination.trim_end_matches('/'), source_name),
            });
        }
        return Ok((directory, source_name.to_string()));
    }

    let entry = resolve_entry(tree, current_dir, destination)
        .context(CannotCreateSnafu { path: destination })?;
    if entry.target.is_some() {
        return Err(CommandError::DestinationExists {
            path: destination.to_string(),
        });
    }
    Ok((entry.parent, entry.name))
}

impl CommandTrait for Mv {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        expect_args(self.name(), &self.args, 2)?;
        let (source, target) = (&self.args[0], &self.args[1]);

        let tree = session.tree();
        let current_dir = session.current_dir();

        let entry = resolve_entry(tree, current_dir, source).context(PathSnafu {
            command: self.name(),
            path: source,
        })?;
        if entry.target.is_none() {
            return Err(CommandError::PathError {
                command: self.name(),
                path: source.clone(),
                source: ResolveError::NotFound {
                    segment: entry.name,
                },
            });
        }

        let (to_parent, to_name) = destination(tree, current_dir, target, &entry.name)?;
        if to_parent.starts_with(&entry.absolute_path()) {
            return Err(CommandError::MoveIntoSelf {
                source_path: source.clone(),
                path: target.clone(),
            });
        }

        let (from_parent, from_name) = (entry.parent, entry.name);
        debug!(
            "Moving {:?}/{} to {:?}/{}",
            from_parent, from_name, to_parent, to_name
        );
        if !session
            .tree_mut()
            .transplant(&from_parent, &from_name, &to_parent, to_name)
        {
            // Both ends were resolved above, so this only happens on a broken tree
            return Err(CommandError::PathError {
                command: self.name(),
                path: source.clone(),
                source: ResolveError::NotFound { segment: from_name },
            });
        }

        Ok(String::new())
    }
}
