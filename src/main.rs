//! Rollcall - an offline-first terminal attendance tracker.
//!
//! Tracks per-subject attended/total class counts against the 75%
//! eligibility threshold and keeps the companion web page's assets cached
//! for offline use.

mod app;
mod config;
mod models;
mod shim;
mod store;
mod tracker;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reqwest::Url;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use config::Config;
use shim::{CacheStore, ClientRegistry, HttpNetwork, OfflineShim, CACHE_NAME};
use store::SubjectStore;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the cache directory
const LOG_FILE: &str = "rollcall.log";

/// Initialize the tracing subscriber for logging.
///
/// The TUI owns the terminal, so logs go to a file. The returned guard
/// must be held for the lifetime of the process or buffered lines are
/// dropped.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

/// Start the offline shim's install/activate warm-up in the background.
///
/// The shim is independent of the tracker; a failed install is logged and
/// leaves any previous cache generation serving.
fn spawn_shim_warmup(config: &Config, cache_dir: &Path) {
    let Some(ref origin) = config.app_origin else {
        debug!("no app origin configured, skipping asset cache warm-up");
        return;
    };

    let origin: Url = match origin.parse() {
        Ok(url) => url,
        Err(e) => {
            warn!(origin = %origin, error = %e, "invalid app origin, skipping warm-up");
            return;
        }
    };
    let store = match CacheStore::new(cache_dir.join("assets")) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "could not open asset cache, skipping warm-up");
            return;
        }
    };
    let net = match HttpNetwork::new() {
        Ok(net) => Arc::new(net),
        Err(e) => {
            warn!(error = %e, "could not build network client, skipping warm-up");
            return;
        }
    };

    let shim = OfflineShim::new(net, store, origin, Arc::new(ClientRegistry::default()));
    tokio::spawn(async move {
        match shim.install(CACHE_NAME).await {
            Ok(()) => {
                if let Err(e) = shim.activate() {
                    warn!(error = %e, "asset cache activation failed");
                }
            }
            Err(e) => {
                warn!(error = %e, "asset cache install failed, previous generation remains")
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    // Materialize the config file so app_origin can be edited by hand
    config.save()?;
    let cache_dir = config.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)?;

    let _guard = init_tracing(&cache_dir);
    info!("Rollcall starting");

    spawn_shim_warmup(&config, &cache_dir);

    let store = SubjectStore::new(config.data_dir()?);
    let mut app = App::new(store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Rollcall shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with a timeout so the loop stays responsive
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }
    }
}
