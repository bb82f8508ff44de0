use crate::error::{Result, TaskbotError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H%M";

const DISPLAY_DATE_TIME_FORMAT: &str = "%b %d %Y %H:%M";
const DISPLAY_TIME_FORMAT: &str = "%H:%M";

// 'd' stands for any ASCII digit, every other character must match exactly.
const DATE_TIME_SHAPE: &str = "dddd-dd-dd dddd";
const DATE_SHAPE: &str = "dddd-dd-dd";
const TIME_SHAPE: &str = "dddd";
const TIMING_SHAPE: &str = "dddd-dd-dd dddd-dddd";

/// Shared capability of every tracked item.
///
/// Each variant decides how it is displayed and persisted, so callers never
/// need to know which concrete type they hold.
pub trait Task: fmt::Debug {
    /// Single character naming the variant in the storage file.
    fn label(&self) -> char;

    fn description(&self) -> &str;

    fn is_completed(&self) -> bool;

    fn mark_completed(&mut self);

    /// Third line of the persisted record. To-dos have none.
    fn schedule(&self) -> Option<String> {
        None
    }

    /// Human readable date information appended to the display line.
    fn timing(&self) -> Option<String> {
        None
    }

    /// Whether the task falls on the given calendar day.
    fn occurs_on(&self, _date: NaiveDate) -> bool {
        false
    }

    fn clone_box(&self) -> Box<dyn Task>;

    fn display_line(&self) -> String {
        let marker = if self.is_completed() { 'X' } else { ' ' };
        let mut line = format!("[{}][{}] {}", self.label(), marker, self.description());
        if let Some(timing) = self.timing() {
            line.push(' ');
            line.push_str(&timing);
        }
        line
    }

    fn to_record(&self) -> String {
        let status = if self.is_completed() { "done" } else { "not-done" };
        let mut record = format!("{} {}\n{}", self.label(), status, self.description());
        if let Some(schedule) = self.schedule() {
            record.push('\n');
            record.push_str(&schedule);
        }
        record
    }
}

impl Clone for Box<dyn Task> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToDo {
    description: String,
    completed: bool,
}

impl ToDo {
    pub fn new(description: impl Into<String>) -> Self {
        ToDo {
            description: description.into(),
            completed: false,
        }
    }
}

impl Task for ToDo {
    fn label(&self) -> char {
        'T'
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn mark_completed(&mut self) {
        self.completed = true;
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deadline {
    description: String,
    completed: bool,
    due: NaiveDateTime,
}

impl Deadline {
    pub fn new(description: impl Into<String>, due: NaiveDateTime) -> Self {
        Deadline {
            description: description.into(),
            completed: false,
            due,
        }
    }

    /// Builds a deadline from its `yyyy-MM-dd HHmm` text form.
    pub fn parse(description: impl Into<String>, due: &str) -> Result<Self> {
        Ok(Deadline::new(description, parse_date_time(due)?))
    }

    pub fn due(&self) -> NaiveDateTime {
        self.due
    }
}

impl Task for Deadline {
    fn label(&self) -> char {
        'D'
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn mark_completed(&mut self) {
        self.completed = true;
    }

    fn schedule(&self) -> Option<String> {
        Some(self.due.format(DATE_TIME_FORMAT).to_string())
    }

    fn timing(&self) -> Option<String> {
        Some(format!("(by: {})", self.due.format(DISPLAY_DATE_TIME_FORMAT)))
    }

    fn occurs_on(&self, date: NaiveDate) -> bool {
        self.due.date() == date
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(self.clone())
    }
}

/// Something happening at a start time and ending later the same day.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    description: String,
    completed: bool,
    start: NaiveDateTime,
    end: NaiveTime,
}

impl Event {
    pub fn new(description: impl Into<String>, start: NaiveDateTime, end: NaiveTime) -> Self {
        Event {
            description: description.into(),
            completed: false,
            start,
            end,
        }
    }

    /// Builds an event from its `yyyy-MM-dd HHmm-HHmm` text form.
    pub fn parse(description: impl Into<String>, timing: &str) -> Result<Self> {
        let (start, end) = parse_timing(timing)?;
        Ok(Event::new(description, start, end))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

impl Task for Event {
    fn label(&self) -> char {
        'E'
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn mark_completed(&mut self) {
        self.completed = true;
    }

    fn schedule(&self) -> Option<String> {
        Some(format!(
            "{}-{}",
            self.start.format(DATE_TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        ))
    }

    fn timing(&self) -> Option<String> {
        Some(format!(
            "(at: {}-{})",
            self.start.format(DISPLAY_DATE_TIME_FORMAT),
            self.end.format(DISPLAY_TIME_FORMAT)
        ))
    }

    fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start.date() == date
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(self.clone())
    }
}

pub fn parse_date_time(text: &str) -> Result<NaiveDateTime> {
    parse_shaped(text, DATE_TIME_SHAPE, "date-time (yyyy-MM-dd HHmm)", |t| {
        NaiveDateTime::parse_from_str(t, DATE_TIME_FORMAT)
    })
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    parse_shaped(text, DATE_SHAPE, "date (yyyy-MM-dd)", |t| {
        NaiveDate::parse_from_str(t, DATE_FORMAT)
    })
}

pub fn parse_time(text: &str) -> Result<NaiveTime> {
    parse_shaped(text, TIME_SHAPE, "time (HHmm)", |t| {
        NaiveTime::parse_from_str(t, TIME_FORMAT)
    })
}

/// Parses `yyyy-MM-dd HHmm-HHmm` into the start and the end time of an event.
pub fn parse_timing(text: &str) -> Result<(NaiveDateTime, NaiveTime)> {
    const EXPECTED: &str = "event timing (yyyy-MM-dd HHmm-HHmm)";
    if let Some(position) = shape_mismatch(text, TIMING_SHAPE) {
        return Err(TaskbotError::DateTime {
            text: text.to_string(),
            expected: EXPECTED,
            position: Some(position),
        });
    }
    // The shape check guarantees ASCII, so byte offsets are char offsets.
    let split = DATE_TIME_SHAPE.len();
    let start = parse_date_time(&text[..split]);
    let end = parse_time(&text[split + 1..]);
    match (start, end) {
        (Ok(start), Ok(end)) => Ok((start, end)),
        _ => Err(TaskbotError::DateTime {
            text: text.to_string(),
            expected: EXPECTED,
            position: None,
        }),
    }
}

fn parse_shaped<T>(
    text: &str,
    shape: &str,
    expected: &'static str,
    parse: impl Fn(&str) -> chrono::ParseResult<T>,
) -> Result<T> {
    if let Some(position) = shape_mismatch(text, shape) {
        return Err(TaskbotError::DateTime {
            text: text.to_string(),
            expected,
            position: Some(position),
        });
    }
    parse(text).map_err(|_| TaskbotError::DateTime {
        text: text.to_string(),
        expected,
        position: None,
    })
}

/// Index of the first character that does not fit `shape`, if any.
fn shape_mismatch(text: &str, shape: &str) -> Option<usize> {
    let mut chars = text.chars();
    for (i, want) in shape.chars().enumerate() {
        match chars.next() {
            Some(c) if want == 'd' && c.is_ascii_digit() => {}
            Some(c) if want != 'd' && c == want => {}
            _ => return Some(i),
        }
    }
    chars.next().map(|_| shape.len())
}
