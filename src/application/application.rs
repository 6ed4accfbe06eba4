use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info, warn};

use crate::application::{RuntimeConfig, Terminal};
use crate::config::{ConfigError, ShellConfig};
use crate::session::Session;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = ShellConfig::read(&app_config.config_path)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let mut session = Session::new(Arc::new(config));
        let colorize = supports_color::on(Stream::Stdout).is_some();
        let stdout = io::stdout();
        let mut terminal = Terminal::new(stdout.lock(), colorize);

        if let Some(vfs) = &app_config.vfs {
            Self::load_startup_archive(&mut session, &mut terminal, vfs)
                .context(TerminalSnafu)?;
        }

        if let Some(script) = &app_config.script {
            info!("Running startup script {}", script.display());
            let bytes = compio::fs::read(script).await.context(ScriptReadSnafu {
                path: script.clone(),
            })?;
            terminal
                .run_script(&mut session, &String::from_utf8_lossy(&bytes))
                .context(TerminalSnafu)?;
        }

        if !session.is_finished() {
            terminal
                .run_interactive(&mut session, io::stdin().lock())
                .context(TerminalSnafu)?;
        }

        Ok(())
    }

    /// Imports the `--vfs` archive. A failure is shown on the terminal and the
    /// session simply stays unloaded.
    fn load_startup_archive<W: Write>(
        session: &mut Session,
        terminal: &mut Terminal<W>,
        vfs: &Path,
    ) -> io::Result<()> {
        if let Err(e) = session.load_archive(vfs) {
            warn!("Starting without a VFS: {}", e);
            terminal.report(&e.to_string())?;
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Failed to read the startup script {}", path.display()))]
    ScriptReadError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to talk to the terminal"))]
    TerminalError { source: io::Error },
}
