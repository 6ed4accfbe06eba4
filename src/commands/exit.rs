use crate::commands::{CommandError, CommandTrait};
use crate::session::Session;

/// Ends the session. Accepted whether or not a VFS is loaded.
#[derive(Debug, Clone, Copy)]
pub struct Exit;

impl CommandTrait for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn requires_vfs(&self) -> bool {
        false
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        session.finish();
        Ok(String::new())
    }
}
