use crate::commands::{CommandError, CommandTrait};
use crate::filesystem::{ResolveError, resolve_directory};
use crate::session::Session;

/// Changes the current directory, back to the root when called without a path
#[derive(Debug, Clone)]
pub struct Cd {
    args: Vec<String>,
}

impl Cd {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl CommandTrait for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        let target = match self.args.as_slice() {
            [] => Vec::new(),
            [path] => resolve_directory(session.tree(), session.current_dir(), path).map_err(
                |source| match source {
                    ResolveError::NotFound { .. } => CommandError::NoSuchDirectory {
                        path: path.clone(),
                    },
                    source => CommandError::PathError {
                        command: self.name(),
                        path: path.clone(),
                        source,
                    },
                },
            )?,
            _ => {
                return Err(CommandError::TooManyArguments {
                    command: self.name(),
                });
            }
        };

        session.set_current_dir(target);
        Ok(String::new())
    }
}
