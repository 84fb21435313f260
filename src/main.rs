mod app;
mod config;
mod format;
mod handler;
mod phonebook;
mod texts;
mod tui;
mod ui;

use std::fs::{self, File};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use app::App;
use config::Config;
use tui::{AppEvent, EventHandler, Tui};

/// Log to a file; the terminal itself belongs to the UI.
fn init_logging() -> Result<()> {
    let log_dir = dirs::data_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("phonebook");
    fs::create_dir_all(&log_dir)?;

    let log_file = File::create(log_dir.join("phonebook.log"))?;
    tracing_subscriber::fmt()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phonebook=info".parse()?),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best effort; the UI still starts without a log file
    let _ = init_logging();

    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "failed to load config, using defaults");
        Config::default()
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new();
    let mut app = App::new(&config, events.sender());

    info!(base_url = config.base_url(), "starting phonebook assistant");

    // One-shot health probe; the outcome lands in the event loop
    let client = app.client.clone();
    let health_events = events.sender();
    tokio::spawn(async move {
        let result = client.health().await;
        let _ = health_events.send(AppEvent::HealthChecked(result));
    });

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;

    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }
    }
    Ok(())
}
