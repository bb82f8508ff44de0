// Reply text shown for each command.
use crate::error::TaskbotError;
use crate::models::Task;
use chrono::NaiveDate;

pub fn greeting() -> String {
    "Hello! What can I do for you?".to_string()
}

pub fn farewell() -> String {
    "Bye. Hope to see you again soon!".to_string()
}

pub fn list(size: usize) -> String {
    match size {
        0 => "Your list is empty.".to_string(),
        1 => "Here is the 1 task in your list:".to_string(),
        n => format!("Here are the {} tasks in your list:", n),
    }
}

pub fn done(task: &dyn Task) -> String {
    format!("Nice! I've marked this task as done:\n  {}", task.display_line())
}

pub fn deleted(task: &dyn Task, remaining: usize) -> String {
    format!(
        "Noted. I've removed this task:\n  {}\n{}",
        task.display_line(),
        count(remaining)
    )
}

pub fn added(task: &dyn Task, size: usize) -> String {
    format!(
        "Got it. I've added this task:\n  {}\n{}",
        task.display_line(),
        count(size)
    )
}

pub fn matching_date(date: NaiveDate) -> String {
    format!(
        "Here are the deadlines and events on {}:",
        date.format("%b %d %Y")
    )
}

pub fn matching_keyword(keyword: &str) -> String {
    format!("Here are the tasks matching '{}':", keyword)
}

pub fn sorted(reverse: bool) -> String {
    if reverse {
        "I've sorted your tasks in reverse alphabetical order.".to_string()
    } else {
        "I've sorted your tasks in alphabetical order.".to_string()
    }
}

pub fn error(err: &TaskbotError) -> String {
    format!("OOPS!!! {}", err)
}

/// Notice shown when saved tasks could not be loaded.
pub fn load_failed(err: &TaskbotError, path: &str) -> String {
    match err {
        TaskbotError::StorageMissing(_) => err.to_string(),
        _ => format!(
            "{}\nPlease check the data in {}. Starting with an empty list.",
            error(err),
            path
        ),
    }
}

fn count(size: usize) -> String {
    if size == 1 {
        "Now you have 1 task in the list.".to_string()
    } else {
        format!("Now you have {} tasks in the list.", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToDo;

    #[test]
    fn test_added_counts_tasks() {
        let todo = ToDo::new("read book");
        assert_eq!(
            added(&todo, 1),
            "Got it. I've added this task:\n  [T][ ] read book\nNow you have 1 task in the list."
        );
    }

    #[test]
    fn test_error_prefix() {
        let err = TaskbotError::InvalidInstruction("blah".to_string());
        assert_eq!(error(&err), "OOPS!!! I don't know what 'blah' means.");
    }
}
