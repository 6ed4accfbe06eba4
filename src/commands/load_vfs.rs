use std::path::Path;

use crate::commands::{CommandError, CommandTrait};
use crate::session::Session;

/// Replaces the whole VFS with the contents of a zip archive on the host
#[derive(Debug, Clone)]
pub struct LoadVfs {
    args: Vec<String>,
}

impl LoadVfs {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl CommandTrait for LoadVfs {
    fn name(&self) -> &'static str {
        "loadvfs"
    }

    fn requires_vfs(&self) -> bool {
        false
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        match self.args.as_slice() {
            [] => Err(CommandError::MissingArchive),
            [path] => {
                session.load_archive(Path::new(path))?;
                Ok(String::new())
            }
            _ => Err(CommandError::TooManyArguments {
                command: self.name(),
            }),
        }
    }
}
