use crate::error::{Result, TaskbotError};
use log::LevelFilter;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const APP_DIR: &str = "taskbot";

pub const DATA_FILE_VAR: &str = "TASKBOT_DATA_FILE";
pub const LOG_FILE_VAR: &str = "TASKBOT_LOG_FILE";
pub const LOG_LEVEL_VAR: &str = "TASKBOT_LOG_LEVEL";

// Optional settings read from config.toml
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads `.env`, the config file and the environment, in increasing priority.
    pub fn load() -> Result<Config> {
        dotenv::dotenv().ok();

        let file = match config_file_path() {
            Some(path) if path.exists() => read_file_config(&path)?,
            _ => FileConfig::default(),
        };

        Config::resolve(file, |key| env::var(key).ok())
    }

    /// Combines file settings with overrides looked up through `var`.
    pub fn resolve(file: FileConfig, var: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let data_file = var(DATA_FILE_VAR)
            .map(PathBuf::from)
            .or(file.data_file)
            .unwrap_or_else(|| data_dir().join("tasks.txt"));

        let log_file = var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .or(file.log_file)
            .unwrap_or_else(|| data_dir().join("taskbot.log"));

        let log_level = match var(LOG_LEVEL_VAR).or(file.log_level) {
            Some(level) => LevelFilter::from_str(level.trim()).map_err(|_| {
                TaskbotError::invalid_input(format!("unknown log level '{}'", level))
            })?,
            None => LevelFilter::Info,
        };

        Ok(Config {
            data_file,
            log_file,
            log_level,
        })
    }

    /// Creates the directories the data and log files live in.
    pub fn ensure_dirs(&self) -> Result<()> {
        for file in [&self.data_file, &self.log_file] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| TaskbotError::io(parent, e))?;
            }
        }
        Ok(())
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path).map_err(|e| TaskbotError::io(path, e))?;
    toml::from_str(&text).map_err(|e| {
        TaskbotError::invalid_input(format!("{} is not valid: {}", path.display(), e))
    })
}
