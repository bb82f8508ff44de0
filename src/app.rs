use crate::bot::Bot;
use crate::messages;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One line typed by the user and the bot's answer to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub input: Option<String>,
    pub reply: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    pub bot: Bot,
    pub input: String,
    pub input_mode: InputMode,
    pub transcript: Vec<Exchange>,
    pub listing: String,
    /// Lines scrolled back from the bottom of the transcript.
    pub scroll_back: u16,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl App {
    pub fn new(bot: Bot) -> App {
        let mut transcript = vec![Exchange {
            input: None,
            reply: messages::greeting(),
            is_error: false,
        }];
        if let Some(notice) = bot.startup_notice() {
            transcript.push(Exchange {
                input: None,
                reply: notice.to_string(),
                is_error: false,
            });
        }
        let listing = bot.tasks().list();

        App {
            bot,
            input: String::new(),
            input_mode: InputMode::Editing,
            transcript,
            listing,
            scroll_back: 0,
            history: Vec::new(),
            history_index: None,
        }
    }

    /// Sends the current input line to the bot. Returns true once the bot says bye.
    pub fn submit(&mut self) -> bool {
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            return false;
        }

        let response = self.bot.get_response(&line);
        if let Some(listing) = response.listing {
            self.listing = listing;
        }
        self.transcript.push(Exchange {
            input: Some(line.clone()),
            reply: response.reply,
            is_error: response.is_error,
        });
        self.history.push(line);
        self.history_index = None;
        self.scroll_back = 0;

        self.bot.is_exiting()
    }

    pub fn scroll_up(&mut self) {
        self.scroll_back = self.scroll_back.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }

    fn recall_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let i = match self.history_index {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.history_index = Some(i);
        self.input = self.history[i].clone();
    }

    fn recall_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.input = self.history[i + 1].clone();
            }
            Some(_) => {
                self.history_index = None;
                self.input.clear();
            }
            None => {}
        }
    }

    /// Handles one key press. Returns true when the application should quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
                KeyCode::Char('i') | KeyCode::Enter => {
                    self.input_mode = InputMode::Editing;
                }
                _ => {}
            },
            InputMode::Editing => match key.code {
                KeyCode::Enter => return self.submit(),
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Up => self.recall_previous(),
                KeyCode::Down => self.recall_next(),
                KeyCode::PageUp => self.scroll_up(),
                KeyCode::PageDown => self.scroll_down(),
                KeyCode::Esc => {
                    self.input.clear();
                    self.history_index = None;
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(app: &mut App, line: &str) -> bool {
        for c in line.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter)
    }

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::new(Bot::new(dir.path().join("tasks.txt")).unwrap())
    }

    #[test]
    fn test_new_app_greets_and_reports_missing_storage() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].reply, messages::greeting());
    }

    #[test]
    fn test_typing_a_command_updates_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(!type_line(&mut app, "todo read book"));
        assert_eq!(app.listing, "1.[T][ ] read book");
        assert!(app.input.is_empty());
        let last = app.transcript.last().unwrap();
        assert_eq!(last.input.as_deref(), Some("todo read book"));
        assert!(!last.is_error);
    }

    #[test]
    fn test_error_is_marked_in_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_line(&mut app, "done 3");
        assert!(app.transcript.last().unwrap().is_error);
    }

    #[test]
    fn test_bye_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(type_line(&mut app, "bye"));
    }

    #[test]
    fn test_history_recall() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_line(&mut app, "list");
        type_line(&mut app, "find x");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "find x");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "list");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.input, "find x");
        press(&mut app, KeyCode::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_normal_mode_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.scroll_back, 1);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode, InputMode::Editing);
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(app.handle_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
