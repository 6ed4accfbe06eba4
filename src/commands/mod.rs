//! Commands understood by the shell.
//!
//! Every command resolves its paths through the session's current directory
//! and reports failures as a single text line prefixed with its name.

mod cd;
mod chown;
mod command;
mod exit;
mod load_vfs;
mod ls;
mod mv;

pub use cd::Cd;
pub use chown::Chown;
pub use command::{Command, CommandError, CommandTrait};
pub use exit::Exit;
pub use load_vfs::LoadVfs;
pub use ls::Ls;
pub use mv::Mv;

pub(crate) use command::{
    ArchiveReadSnafu, CannotCreateSnafu, ImportFailedSnafu, PathSnafu, expect_args,
};
