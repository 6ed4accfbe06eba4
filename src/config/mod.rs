mod config;

pub use config::{CONFIG_FILE_NAME, ConfigError, Messages, ShellConfig, get_config_file_path};
