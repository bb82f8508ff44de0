use crate::error::{Result, TaskbotError};
use crate::messages;
use crate::models::{Deadline, Event, Task, ToDo};
use crate::parser::{parse_command, Command};
use crate::storage::Storage;
use crate::tasklist::TaskList;
use log::{debug, info, warn};
use std::path::PathBuf;

/// What a presentation layer gets back for one line of input.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub reply: String,
    /// Task listing to show next to the reply, if the command produces one.
    pub listing: Option<String>,
    pub is_error: bool,
}

impl Response {
    fn ok(reply: String, listing: Option<String>) -> Self {
        Response {
            reply,
            listing,
            is_error: false,
        }
    }
}

/// Owns the task list and its storage file, and answers commands.
pub struct Bot {
    storage: Storage,
    tasks: TaskList,
    startup_notice: Option<String>,
    exiting: bool,
}

impl Bot {
    /// Loads saved tasks from `path`.
    ///
    /// A missing file or malformed contents start an empty list and keep a
    /// notice for the user. Any other read failure is returned, so a file that
    /// could not be read is never overwritten.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Storage::new(path);
        let loaded = storage
            .get_storage_contents()
            .and_then(|lines| TaskList::from_lines(&lines));

        let (tasks, startup_notice) = match loaded {
            Ok(tasks) => {
                info!(
                    "loaded {} task(s) from {}",
                    tasks.size(),
                    storage.path().display()
                );
                (tasks, None)
            }
            Err(err @ TaskbotError::Io { .. }) => return Err(err),
            Err(err) => {
                match err {
                    TaskbotError::StorageMissing(_) => info!("{}", err),
                    _ => warn!("could not load {}: {}", storage.path().display(), err),
                }
                let notice =
                    messages::load_failed(&err, &storage.path().display().to_string());
                (TaskList::new(), Some(notice))
            }
        };

        Ok(Bot {
            storage,
            tasks,
            startup_notice,
            exiting: false,
        })
    }

    pub fn startup_notice(&self) -> Option<&str> {
        self.startup_notice.as_deref()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Set once `bye` has been answered successfully.
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Parses and applies one line of input.
    ///
    /// Errors never escape: they come back as a response flagged as an error,
    /// with the unchanged listing attached.
    pub fn get_response(&mut self, input: &str) -> Response {
        match parse_command(input).and_then(|command| self.execute(command)) {
            Ok(response) => response,
            Err(err) => {
                warn!("rejected '{}': {}", input, err);
                Response {
                    reply: messages::error(&err),
                    listing: Some(self.tasks.list()),
                    is_error: true,
                }
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Response> {
        debug!("executing {:?}", command);
        match command {
            Command::Bye => {
                self.save(&self.tasks)?;
                self.exiting = true;
                Ok(Response::ok(messages::farewell(), None))
            }
            Command::List => Ok(Response::ok(
                messages::list(self.tasks.size()),
                Some(self.tasks.list()),
            )),
            Command::Done { index } => self.mutate(|tasks| {
                let task = tasks.complete_task(position(index)?)?;
                Ok(messages::done(task))
            }),
            Command::Delete { index } => self.mutate(|tasks| {
                let task = tasks.delete_task(position(index)?)?;
                Ok(messages::deleted(task.as_ref(), tasks.size()))
            }),
            Command::Todo { description } => {
                self.mutate(|tasks| Ok(add(tasks, Box::new(ToDo::new(description)))))
            }
            Command::Deadline { description, due } => {
                self.mutate(|tasks| Ok(add(tasks, Box::new(Deadline::new(description, due)))))
            }
            Command::Event {
                description,
                start,
                end,
            } => self.mutate(|tasks| {
                Ok(add(tasks, Box::new(Event::new(description, start, end))))
            }),
            Command::Date { date } => Ok(Response::ok(
                messages::matching_date(date),
                Some(self.tasks.filter_by_date(date)),
            )),
            Command::Find { keyword } => Ok(Response::ok(
                messages::matching_keyword(&keyword),
                Some(self.tasks.filter_by_keyword(&keyword)),
            )),
            Command::Sort { reverse } => self.mutate(|tasks| {
                tasks.sort(reverse);
                Ok(messages::sorted(reverse))
            }),
        }
    }

    /// Applies `change` to a copy of the list and keeps it only once it is saved.
    fn mutate(
        &mut self,
        change: impl FnOnce(&mut TaskList) -> Result<String>,
    ) -> Result<Response> {
        let mut next = self.tasks.clone();
        let reply = change(&mut next)?;
        self.save(&next)?;
        self.tasks = next;
        Ok(Response::ok(reply, Some(self.tasks.list())))
    }

    fn save(&self, tasks: &TaskList) -> Result<()> {
        self.storage
            .write_to_storage(&tasks.to_storage_string(), false)
    }
}

fn add(tasks: &mut TaskList, task: Box<dyn Task>) -> String {
    let reply = messages::added(task.as_ref(), tasks.size() + 1);
    tasks.add_task(task);
    reply
}

/// Converts a 1-based task number into a list position.
fn position(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| TaskbotError::invalid_input("Task numbers start at 1."))
}
