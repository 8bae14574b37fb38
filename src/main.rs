mod app;
mod config;
mod controller;
mod error;
mod input;
mod models;
mod selection;
mod service;
mod theme;
mod ui;
mod utils;

use std::{fs, path::PathBuf, sync::{Arc, Mutex}};
use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;
use crate::app::App;
use crate::config::{Overrides, Settings};
use crate::controller::DocumentListController;
use crate::service::{DocumentSource, MockDocumentService};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse, select and bulk-delete documents", long_about = None)]
struct Args {
    /// Extra config file, loaded after ~/.config/docsel/docsel.toml and ./docsel.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with the documents the mock service serves
    #[arg(short, long)]
    fixture: Option<String>,

    /// Simulated latency of the list fetch
    #[arg(long)]
    list_delay_ms: Option<u64>,

    /// Simulated latency of a single-document lookup
    #[arg(long)]
    lookup_delay_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::new(&Overrides {
        config_path: args.config,
        fixture_path: args.fixture,
        list_delay_ms: args.list_delay_ms,
        lookup_delay_ms: args.lookup_delay_ms,
    })
    .context("failed to load settings")?;
    init_logging(&settings)?;

    let source: Arc<dyn DocumentSource> = match settings.fixture() {
        Some(path) => Arc::new(
            MockDocumentService::from_fixture(&path, settings.list_delay(), settings.lookup_delay())
                .with_context(|| format!("failed to read fixture {}", path.display()))?,
        ),
        None => Arc::new(MockDocumentService::with_demo_data(settings.list_delay(), settings.lookup_delay())),
    };

    let rt = Runtime::new()?;
    let mut controller = DocumentListController::new(source, rt.handle().clone());
    controller.load_documents();
    let mut app = App::new(controller);

    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &settings);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("exiting");
    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, settings: &Settings) -> anyhow::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(settings.tick_rate())? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if !input::handle_key(key_event.code, app)? {
                    return Ok(());
                }
            }
        }
    }
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let path = settings.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(log = %path.display(), "docsel starting");
    Ok(())
}
