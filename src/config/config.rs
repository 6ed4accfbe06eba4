use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "vfsh.yaml";

const DEFAULT_OWNER: &str = "root";
const DEFAULT_NOT_LOADED: &str = "VFS not loaded";
const DEFAULT_COMMAND_NOT_FOUND: &str = "Command not found: {command}";

/// Placeholder replaced by the command name in `messages.command_not_found`
const COMMAND_PLACEHOLDER: &str = "{command}";

pub fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// User-facing texts of the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub not_loaded: String,
    pub command_not_found: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            not_loaded: DEFAULT_NOT_LOADED.to_string(),
            command_not_found: DEFAULT_COMMAND_NOT_FOUND.to_string(),
        }
    }
}

impl Messages {
    pub fn command_not_found(&self, command: &str) -> String {
        self.command_not_found.replace(COMMAND_PLACEHOLDER, command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Owner given to imported entries that do not carry one
    pub owner: String,
    pub user: String,
    pub host: String,
    pub messages: Messages,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            user: default_user(),
            host: default_host(),
            messages: Messages::default(),
        }
    }
}

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}

fn default_host() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

impl ShellConfig {
    /// Reads the config at `path`, falling back to defaults when there is no file
    pub async fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path.to_path_buf()).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.display());
        let file = File::open(&path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;

        debug!("Reading config file");
        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        match res.0 {
            Ok(n) => debug!("Successfully read config file: {n} bytes"),
            _ => {
                res.0.context(ReadSnafu {
                    file_path: path.display().to_string(),
                })?;
            }
        }
        res.1.as_str().try_into()
    }

    fn string_value(mapping: &LinkedHashMap<Yaml, Yaml>, name: &'static str) -> Option<String> {
        let value = mapping.get(&key(name))?;
        match value.as_str() {
            Some(text) => Some(text.to_string()),
            None => {
                warn!("Ignoring non-string value for '{}': {:?}", name, value);
                None
            }
        }
    }

    fn parse_messages(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Messages, ConfigError> {
        let defaults = Messages::default();
        let Some(messages) = top_level.get(&key("messages")) else {
            return Ok(defaults);
        };
        let messages = messages.as_mapping().ok_or(ConfigError::MessagesNotMap)?;

        Ok(Messages {
            not_loaded: Self::string_value(messages, "not_loaded").unwrap_or(defaults.not_loaded),
            command_not_found: Self::string_value(messages, "command_not_found")
                .unwrap_or(defaults.command_not_found),
        })
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec =
            Yaml::load_from_str(contents).map_err(|e| ConfigError::ParseError { source: e })?;
        let contents = contents_vec.first().ok_or(ConfigError::MalformedConfig)?;

        let top_level = contents.as_mapping().ok_or(ConfigError::TopLevelNotMap)?;

        let defaults = ShellConfig::default();
        Ok(ShellConfig {
            owner: Self::string_value(top_level, "owner").unwrap_or(defaults.owner),
            user: Self::string_value(top_level, "user").unwrap_or(defaults.user),
            host: Self::string_value(top_level, "host").unwrap_or(defaults.host),
            messages: Self::parse_messages(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Messages section should be a map"))]
    MessagesNotMap,
}
