pub mod app;
pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod models;
pub mod parser;
pub mod storage;
pub mod tasklist;
pub mod ui;

pub use bot::{Bot, Response};
pub use error::{Result, TaskbotError};
