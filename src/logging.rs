use crate::config::Config;
use crate::error::{Result, TaskbotError};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::OpenOptions;

/// Sends log output to the configured file; the terminal belongs to the UI.
pub fn init(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| TaskbotError::io(&config.log_file, e))?;

    let log_config = ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();

    WriteLogger::init(config.log_level, log_config, file)
        .map_err(|e| TaskbotError::invalid_input(format!("logger already set: {}", e)))
}
