use derive_more::From;
use snafu::Snafu;

use crate::commands::{Cd, Chown, Exit, LoadVfs, Ls, Mv};
use crate::filesystem::{ArchiveError, ImportError, ResolveError};
use crate::session::Session;

pub trait CommandTrait {
    /// Name the command is invoked by, also used to prefix its errors
    fn name(&self) -> &'static str;
    /// Whether the command needs an imported VFS to run
    fn requires_vfs(&self) -> bool {
        true
    }
    /// Runs the command and returns the text to display
    fn run(&self, session: &mut Session) -> Result<String, CommandError>;
}

#[derive(Debug, Clone, From)]
pub enum Command {
    Cd(Cd),
    Ls(Ls),
    Mv(Mv),
    Chown(Chown),
    LoadVfs(LoadVfs),
    Exit(Exit),
}

impl Command {
    /// Builds the command called `name`, `None` if there is no such command
    pub fn parse(name: &str, args: &[&str]) -> Option<Self> {
        let args = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
        let command: Command = match name {
            "cd" => Cd::new(args).into(),
            "ls" => Ls::new(args).into(),
            "mv" => Mv::new(args).into(),
            "chown" => Chown::new(args).into(),
            "loadvfs" => LoadVfs::new(args).into(),
            "exit" => Exit.into(),
            _ => return None,
        };
        Some(command)
    }
}

impl CommandTrait for Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Cd(command) => command.name(),
            Command::Ls(command) => command.name(),
            Command::Mv(command) => command.name(),
            Command::Chown(command) => command.name(),
            Command::LoadVfs(command) => command.name(),
            Command::Exit(command) => command.name(),
        }
    }

    fn requires_vfs(&self) -> bool {
        match self {
            Command::Cd(command) => command.requires_vfs(),
            Command::Ls(command) => command.requires_vfs(),
            Command::Mv(command) => command.requires_vfs(),
            Command::Chown(command) => command.requires_vfs(),
            Command::LoadVfs(command) => command.requires_vfs(),
            Command::Exit(command) => command.requires_vfs(),
        }
    }

    fn run(&self, session: &mut Session) -> Result<String, CommandError> {
        match self {
            Command::Cd(command) => command.run(session),
            Command::Ls(command) => command.run(session),
            Command::Mv(command) => command.run(session),
            Command::Chown(command) => command.run(session),
            Command::LoadVfs(command) => command.run(session),
            Command::Exit(command) => command.run(session),
        }
    }
}

/// Fails with an argument count error unless exactly `expected` arguments were given
pub fn expect_args(
    command: &'static str,
    args: &[String],
    expected: usize,
) -> Result<(), CommandError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CommandError::ArgumentCount {
            command,
            expected,
            given: args.len(),
        })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("{command}: {path}: {source}"))]
    PathError {
        command: &'static str,
        path: String,
        source: ResolveError,
    },
    #[snafu(display("cd: {path}: no such directory"))]
    NoSuchDirectory { path: String },
    #[snafu(display("{command}: expected {expected} arguments, got {given}"))]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        given: usize,
    },
    #[snafu(display("{command}: too many arguments"))]
    TooManyArguments { command: &'static str },
    #[snafu(display("ls: invalid option -- '{option}'"))]
    InvalidOption { option: char },
    #[snafu(display("mv: cannot create {path}: {source}"))]
    CannotCreate { path: String, source: ResolveError },
    #[snafu(display("mv: {path}: destination exists"))]
    DestinationExists { path: String },
    #[snafu(display("mv: cannot move {source_path} into itself, {path}"))]
    MoveIntoSelf { source_path: String, path: String },
    #[snafu(display("loadvfs: missing archive path"))]
    MissingArchive,
    #[snafu(display("loadvfs: {path}: {source}"))]
    ArchiveReadError { path: String, source: ArchiveError },
    #[snafu(display("loadvfs: {path}: {source}"))]
    ImportFailed { path: String, source: ImportError },
}
