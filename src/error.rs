use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskbotError>;

#[derive(Debug, Error)]
pub enum TaskbotError {
    /// The storage file does not exist yet. Callers start from an empty list.
    #[error("No saved tasks found at {}, starting with an empty list.", .0.display())]
    StorageMissing(PathBuf),

    #[error("{0}")]
    InvalidInput(String),

    #[error("I don't know what '{0}' means.")]
    InvalidInstruction(String),

    #[error("Could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{text}' is not a valid {expected}{}", describe_position(.position))]
    DateTime {
        text: String,
        expected: &'static str,
        position: Option<usize>,
    },

    #[error("There is no task number {}, the list has {size} task(s).", .index.saturating_add(1))]
    OutOfRange { index: usize, size: usize },
}

fn describe_position(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(" (unexpected character at index {})", p),
        None => String::new(),
    }
}

impl TaskbotError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TaskbotError::InvalidInput(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TaskbotError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_is_one_based() {
        let err = TaskbotError::OutOfRange { index: 4, size: 2 };
        assert_eq!(
            err.to_string(),
            "There is no task number 5, the list has 2 task(s)."
        );
    }

    #[test]
    fn test_out_of_range_message_at_max_index() {
        let err = TaskbotError::OutOfRange {
            index: usize::MAX,
            size: 0,
        };
        assert!(err.to_string().starts_with("There is no task number"));
    }

    #[test]
    fn test_date_time_message_carries_position() {
        let err = TaskbotError::DateTime {
            text: "2024-1x-01 1800".to_string(),
            expected: "date-time (yyyy-MM-dd HHmm)",
            position: Some(6),
        };
        assert!(err.to_string().ends_with("at index 6)"));
    }
}
