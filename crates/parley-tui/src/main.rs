use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use parley_core::{config, Config, OpenAIClient, SummarizingClient, TurnController};
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "parley")]
#[command(version, about = "Terminal chat with a hosted LLM that remembers via a rolling summary")]
struct Cli {
    /// Model to use (overrides PARLEY_MODEL and the config file)
    #[arg(short, long)]
    model: Option<String>,

    /// Path to a config.json (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let turns = build_turn_controller(&cli)?;
    tracing::info!(model = turns.model(), "starting session");

    let mut app = App::new(turns);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    tracing::info!(
        turns = app.conversation.turn_count(),
        tokens = app.conversation.token_count(),
        "session ended"
    );
    result
}

/// Resolve configuration (file, then environment, then flags) and build the
/// turn controller. A missing API key stops the program here.
fn build_turn_controller(cli: &Cli) -> Result<TurnController> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_env();

    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    if let Some(url) = &cli.base_url {
        config.base_url = Some(url.clone());
    }

    let backend = OpenAIClient::from_config(&config)?;
    Ok(TurnController::new(SummarizingClient::new(Arc::new(backend))))
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

    Ok(())
}

/// Log to `<config dir>/parley/parley.log`; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let log_dir = config::config_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;

    let log_path = log_dir.join("parley.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("PARLEY_LOG")
        .unwrap_or_else(|_| EnvFilter::new("parley_core=info,parley_tui=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "parley starting"
    );
    Ok(())
}
