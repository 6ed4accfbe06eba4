use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Shell over an in-memory filesystem loaded from a zip archive
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Zip archive to load as the VFS at startup
    #[clap(long)]
    pub vfs: Option<PathBuf>,

    /// File of commands to run before the interactive prompt
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// Config file to use instead of ./vfsh.yaml
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
