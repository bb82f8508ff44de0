use crate::error::{Result, TaskbotError};
use crate::models::{parse_date, parse_date_time, parse_timing};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::num::IntErrorKind;

/// One line of user input, translated into what it asks for.
///
/// Task numbers are kept exactly as typed (1-based).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Bye,
    List,
    Done {
        index: usize,
    },
    Delete {
        index: usize,
    },
    Todo {
        description: String,
    },
    Deadline {
        description: String,
        due: NaiveDateTime,
    },
    Event {
        description: String,
        start: NaiveDateTime,
        end: NaiveTime,
    },
    Date {
        date: NaiveDate,
    },
    Find {
        keyword: String,
    },
    Sort {
        reverse: bool,
    },
}

pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();
    // Each task field occupies exactly one line in the storage file.
    if input.contains(|c: char| c == '\n' || c == '\r') {
        return Err(TaskbotError::invalid_input(
            "Commands must fit on a single line.",
        ));
    }
    let (keyword, rest) = match input.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (input, ""),
    };

    match keyword {
        "" => Err(TaskbotError::invalid_input("Please type a command.")),
        "bye" => Ok(Command::Bye),
        "list" => Ok(Command::List),
        "done" => Ok(Command::Done {
            index: parse_index(rest, "mark as done")?,
        }),
        "delete" => Ok(Command::Delete {
            index: parse_index(rest, "delete")?,
        }),
        "todo" => Ok(Command::Todo {
            description: require_description(rest, "todo")?.to_string(),
        }),
        "deadline" => {
            let (description, due) = split_clause(rest, "deadline", "by")?;
            Ok(Command::Deadline {
                description,
                due: parse_date_time(&due)?,
            })
        }
        "event" => {
            let (description, timing) = split_clause(rest, "event", "at")?;
            let (start, end) = parse_timing(&timing)?;
            Ok(Command::Event {
                description,
                start,
                end,
            })
        }
        "date" => {
            if rest.is_empty() {
                return Err(TaskbotError::invalid_input(
                    "Please give a date as yyyy-MM-dd.",
                ));
            }
            Ok(Command::Date {
                date: parse_date(rest)?,
            })
        }
        "find" => {
            if rest.is_empty() {
                return Err(TaskbotError::invalid_input(
                    "Please give a keyword to search for.",
                ));
            }
            Ok(Command::Find {
                keyword: rest.to_string(),
            })
        }
        "sort" => match rest {
            "" => Ok(Command::Sort { reverse: false }),
            "reverse" => Ok(Command::Sort { reverse: true }),
            other => Err(TaskbotError::invalid_input(format!(
                "sort only understands 'reverse', not '{}'.",
                other
            ))),
        },
        other => Err(TaskbotError::InvalidInstruction(other.to_string())),
    }
}

fn parse_index(rest: &str, action: &str) -> Result<usize> {
    if rest.is_empty() {
        return Err(TaskbotError::invalid_input(format!(
            "Please give the number of the task to {}.",
            action
        )));
    }
    match rest.parse::<usize>() {
        Ok(0) => Err(TaskbotError::invalid_input("Task numbers start at 1.")),
        Ok(index) => Ok(index),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(TaskbotError::invalid_input(
            format!("There is no task number {}.", rest),
        )),
        Err(_) => Err(TaskbotError::invalid_input(format!(
            "'{}' is not a task number.",
            rest
        ))),
    }
}

fn require_description<'a>(description: &'a str, kind: &str) -> Result<&'a str> {
    if description.is_empty() {
        Err(TaskbotError::invalid_input(format!(
            "The description of a {} cannot be empty.",
            kind
        )))
    } else {
        Ok(description)
    }
}

/// Splits `<description> /<marker> <value>` into its two halves.
fn split_clause(rest: &str, kind: &str, marker: &str) -> Result<(String, String)> {
    require_description(rest, kind)?;

    let clause_re = Regex::new(&format!(
        r"^(?P<description>.*?)\s*/{}(?:\s+(?P<value>.*))?$",
        marker
    ))
    .map_err(|e| TaskbotError::invalid_input(e.to_string()))?;

    let missing_clause = || {
        TaskbotError::invalid_input(format!(
            "A {} needs a '/{} <{}>' clause.",
            kind,
            marker,
            if marker == "at" {
                "yyyy-MM-dd HHmm-HHmm"
            } else {
                "yyyy-MM-dd HHmm"
            }
        ))
    };

    let caps = clause_re.captures(rest).ok_or_else(missing_clause)?;
    let description = require_description(caps["description"].trim(), kind)?;
    let value = caps
        .name("value")
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(missing_clause)?;

    Ok((description.to_string(), value.to_string()))
}
