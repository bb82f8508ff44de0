// main.rs

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use taskbot::{app::App, config::Config, logging, ui::run_app, Bot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    config.ensure_dirs()?;

    if let Err(err) = logging::init(&config) {
        eprintln!("Logging disabled: {}", err);
    }
    info!(
        "starting taskbot v{} with {}",
        env!("CARGO_PKG_VERSION"),
        config.data_file.display()
    );

    // Checked before the terminal is taken over, so the error stays readable.
    let bot = match Bot::new(&config.data_file) {
        Ok(bot) => bot,
        Err(err) => {
            error!("could not start: {}", err);
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    let app = App::new(bot);

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }
    info!("taskbot stopped");

    Ok(())
}
