use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use deskfolio_core::Config;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::{App, AppOptions};
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "deskfolio")]
#[command(about = "A portfolio desktop in the terminal: notes, blog, and a chat terminal")]
#[command(version)]
struct Cli {
    /// Notes file (defaults to notes.json in the data directory)
    #[arg(long, value_name = "PATH")]
    notes: Option<PathBuf>,

    /// Chat gateway endpoint
    #[arg(long, value_name = "URL")]
    gateway: Option<String>,

    /// Start with the light theme
    #[arg(long)]
    light: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = Config::get_data_dir()?;
    let _log_guard = logging::init(&data_dir)?;

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::new()
        }
    };

    let notes_path = match cli.notes {
        Some(path) => path,
        None => config.notes_path()?,
    };
    let gateway_url = cli.gateway.unwrap_or_else(|| config.gateway_url());
    let dark = config.dark_theme && !cli.light;

    tracing::info!(
        notes = %notes_path.display(),
        gateway = %gateway_url,
        dark,
        "Starting desktop"
    );

    let mut app = App::new(AppOptions::http(notes_path, &gateway_url, config.persona(), dark));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Desktop exited with error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    // Any in-flight chat reply is dropped with the task
    if let Some(task) = app.chat_task.take() {
        task.abort();
    }

    Ok(())
}
