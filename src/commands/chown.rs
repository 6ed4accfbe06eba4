use snafu::ResultExt;

use crate::commands::{CommandError, CommandTrait, PathSnafu, expect_args};
use crate::filesystem::{ResolveError, resolve_entry};
use crate::session::Session;

/// Records a new owner on a file or directory. Ownership is never enforced.
#[derive(Debug, Clone)]
pub struct Chown {
    args: Vec<String>,
}

impl Chown {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl CommandTrait for Chown {
    fn name(&self) -> &'static str {
        "chown"
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        expect_args(self.name(), &self.args, 2)?;
        let (owner, target) = (&self.args[0], &self.args[1]);

        let entry = resolve_entry(session.tree(), session.current_dir(), target).context(
            PathSnafu {
                command: self.name(),
                path: target,
            },
        )?;
        let location = entry.absolute_path();

        match session.tree_mut().node_mut(&location) {
            Some(node) => {
                node.set_owner(owner.as_str());
                Ok(String::new())
            }
            None => Err(CommandError::PathError {
                command: self.name(),
                path: target.clone(),
                source: ResolveError::NotFound {
                    segment: location.last().cloned().unwrap_or_default(),
                },
            }),
        }
    }
}
