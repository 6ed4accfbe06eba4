use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::get_config_file_path;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub vfs: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub config_path: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            vfs: cli.vfs,
            script: cli.script,
            config_path: cli
                .config
                .unwrap_or_else(|| get_config_file_path(&PathBuf::from("."))),
        }
    }
}
