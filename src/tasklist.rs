use crate::error::{Result, TaskbotError};
use crate::models::{Deadline, Event, Task, ToDo};
use chrono::NaiveDate;

/// Ordered collection of every tracked task.
///
/// Positions are 0-based here; the 1-based numbers users see are only a
/// display concern.
#[derive(Debug, Default, Clone)]
pub struct TaskList {
    tasks: Vec<Box<dyn Task>>,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList::default()
    }

    /// Rebuilds a list from the lines of a storage file.
    ///
    /// Every task takes a header line (`<label> <done|not-done>`), a
    /// description line and, for deadlines and events, a schedule line.
    /// Blank lines between groups are skipped. Any malformed group rejects
    /// the whole load.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut tasks: Vec<Box<dyn Task>> = Vec::new();
        let mut lines = lines
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .map(|(i, line)| (i + 1, line));

        while let Some((line_no, header)) = lines.next() {
            if header.trim().is_empty() {
                continue;
            }
            let (label, completed) = parse_header(line_no, header)?;
            let (_, description) = lines
                .next()
                .ok_or_else(|| truncated(line_no, "a description"))?;

            let mut task: Box<dyn Task> = match label {
                'T' => Box::new(ToDo::new(description)),
                'D' => {
                    let (n, due) = lines.next().ok_or_else(|| truncated(line_no, "a due date"))?;
                    Box::new(Deadline::parse(description, due).map_err(|e| corrupt(n, e))?)
                }
                _ => {
                    let (n, timing) = lines.next().ok_or_else(|| truncated(line_no, "a timing"))?;
                    Box::new(Event::parse(description, timing).map_err(|e| corrupt(n, e))?)
                }
            };
            if completed {
                task.mark_completed();
            }
            tasks.push(task);
        }

        Ok(TaskList { tasks })
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) {
        self.tasks.push(task);
    }

    /// Removes and returns the task at `index`.
    pub fn delete_task(&mut self, index: usize) -> Result<Box<dyn Task>> {
        self.check_bounds(index)?;
        Ok(self.tasks.remove(index))
    }

    pub fn complete_task(&mut self, index: usize) -> Result<&dyn Task> {
        self.check_bounds(index)?;
        self.tasks[index].mark_completed();
        Ok(self.tasks[index].as_ref())
    }

    pub fn get_task(&self, index: usize) -> Result<&dyn Task> {
        self.check_bounds(index)?;
        Ok(self.tasks[index].as_ref())
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Task> {
        self.tasks.iter().map(|t| t.as_ref())
    }

    /// Numbered listing of every task, one per line.
    pub fn list(&self) -> String {
        render(self.numbered())
    }

    /// Deadlines due and events starting on `date`, keeping their list numbers.
    pub fn filter_by_date(&self, date: NaiveDate) -> String {
        render(self.numbered().filter(|(_, t)| t.occurs_on(date)))
    }

    /// Tasks whose description contains `keyword` (case-sensitive).
    pub fn filter_by_keyword(&self, keyword: &str) -> String {
        render(
            self.numbered()
                .filter(|(_, t)| t.description().contains(keyword)),
        )
    }

    /// Orders tasks by description, descending when `reverse` is set.
    pub fn sort(&mut self, reverse: bool) {
        if reverse {
            self.tasks
                .sort_by(|a, b| b.description().cmp(a.description()));
        } else {
            self.tasks
                .sort_by(|a, b| a.description().cmp(b.description()));
        }
    }

    /// Full storage file contents, every record followed by a newline.
    pub fn to_storage_string(&self) -> String {
        self.tasks
            .iter()
            .map(|t| t.to_record() + "\n")
            .collect()
    }

    fn numbered(&self) -> impl Iterator<Item = (usize, &dyn Task)> {
        self.iter().enumerate().map(|(i, t)| (i + 1, t))
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(TaskbotError::OutOfRange {
                index,
                size: self.tasks.len(),
            })
        }
    }
}

fn render<'a>(entries: impl Iterator<Item = (usize, &'a dyn Task)>) -> String {
    entries
        .map(|(n, task)| format!("{}.{}", n, task.display_line()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_header(line_no: usize, header: &str) -> Result<(char, bool)> {
    let (label, marker) = header.split_once(' ').ok_or_else(|| {
        TaskbotError::invalid_input(format!(
            "line {}: expected '<T|D|E> <done|not-done>' but found '{}'",
            line_no, header
        ))
    })?;

    let label = match label {
        "T" => 'T',
        "D" => 'D',
        "E" => 'E',
        other => {
            return Err(TaskbotError::invalid_input(format!(
                "line {}: unknown task type '{}'",
                line_no, other
            )))
        }
    };

    let completed = match marker.trim_end() {
        "done" => true,
        "not-done" => false,
        other => {
            return Err(TaskbotError::invalid_input(format!(
                "line {}: unknown completion marker '{}'",
                line_no, other
            )))
        }
    };

    Ok((label, completed))
}

fn truncated(line_no: usize, missing: &str) -> TaskbotError {
    TaskbotError::invalid_input(format!(
        "task starting at line {} is missing {}",
        line_no, missing
    ))
}

fn corrupt(line_no: usize, cause: TaskbotError) -> TaskbotError {
    TaskbotError::invalid_input(format!("line {}: {}", line_no, cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn due(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H%M").unwrap()
    }

    fn sample() -> TaskList {
        let mut list = TaskList::new();
        list.add_task(Box::new(ToDo::new("read book")));
        list.add_task(Box::new(Deadline::new("return book", due("2024-12-01 1800"))));
        list.add_task(Box::new(
            Event::parse("book club", "2024-12-02 1900-2100").unwrap(),
        ));
        list
    }

    #[test]
    fn test_list_is_numbered_from_one() {
        let mut list = TaskList::new();
        list.add_task(Box::new(ToDo::new("read book")));
        assert_eq!(list.list(), "1.[T][ ] read book");
    }

    #[test]
    fn test_empty_list_renders_empty() {
        assert_eq!(TaskList::new().list(), "");
    }

    #[test]
    fn test_add_does_not_deduplicate() {
        let mut list = TaskList::new();
        list.add_task(Box::new(ToDo::new("same")));
        list.add_task(Box::new(ToDo::new("same")));
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn test_out_of_range_leaves_list_unchanged() {
        let mut list = sample();
        let before = list.list();
        assert!(matches!(
            list.delete_task(3),
            Err(TaskbotError::OutOfRange { index: 3, size: 3 })
        ));
        assert!(matches!(
            list.complete_task(7),
            Err(TaskbotError::OutOfRange { .. })
        ));
        assert!(list.get_task(3).is_err());
        assert_eq!(list.list(), before);
    }

    #[test]
    fn test_complete_and_delete() {
        let mut list = sample();
        assert!(list.complete_task(0).unwrap().is_completed());
        let removed = list.delete_task(1).unwrap();
        assert_eq!(removed.description(), "return book");
        assert_eq!(list.size(), 2);
        assert_eq!(list.get_task(1).unwrap().description(), "book club");
    }

    #[test]
    fn test_filter_by_date_keeps_list_numbers() {
        let list = sample();
        let date = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        assert_eq!(
            list.filter_by_date(date),
            "3.[E][ ] book club (at: Dec 02 2024 19:00-21:00)"
        );
    }

    #[test]
    fn test_filter_by_keyword_is_case_sensitive() {
        let list = sample();
        assert_eq!(list.filter_by_keyword("Book"), "");
        assert_eq!(list.filter_by_keyword("book").lines().count(), 3);
        assert_eq!(list.filter_by_keyword("read"), "1.[T][ ] read book");
    }

    #[test]
    fn test_sort_forward_and_reverse() {
        let mut list = sample();
        list.sort(false);
        let names: Vec<_> = list.iter().map(|t| t.description().to_string()).collect();
        assert_eq!(names, ["book club", "read book", "return book"]);
        list.sort(true);
        let names: Vec<_> = list.iter().map(|t| t.description().to_string()).collect();
        assert_eq!(names, ["return book", "read book", "book club"]);
    }

    #[test]
    fn test_storage_string_round_trips() {
        let mut list = sample();
        list.complete_task(1).unwrap();
        let text = list.to_storage_string();
        assert_eq!(
            text,
            "T not-done\nread book\n\
             D done\nreturn book\n2024-12-01 1800\n\
             E not-done\nbook club\n2024-12-02 1900-2100\n"
        );
        let lines: Vec<&str> = text.lines().collect();
        let restored = TaskList::from_lines(&lines).unwrap();
        assert_eq!(restored.list(), list.list());
    }

    #[test]
    fn test_from_lines_rejects_unknown_label() {
        let err = TaskList::from_lines(&["X done", "mystery"]).unwrap_err();
        assert!(err.to_string().contains("unknown task type 'X'"));
    }

    #[test]
    fn test_from_lines_rejects_unknown_marker() {
        let err = TaskList::from_lines(&["T finished", "mystery"]).unwrap_err();
        assert!(err.to_string().contains("unknown completion marker"));
    }

    #[test]
    fn test_from_lines_rejects_truncated_group() {
        let err = TaskList::from_lines(&["T done", "ok", "D not-done", "late"]).unwrap_err();
        assert!(matches!(err, TaskbotError::InvalidInput(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_from_lines_rejects_bad_date() {
        let err = TaskList::from_lines(&["D done", "late", "tomorrow"]).unwrap_err();
        assert!(matches!(err, TaskbotError::InvalidInput(_)));
        assert!(err.to_string().starts_with("line 3:"));
    }
}
