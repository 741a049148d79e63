use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use pokedex_core::config_file::{self, ConfigFile};
use pokedex_core::{CatalogSource, Config, PokeApi};

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Pokedex: browse the PokeAPI catalog from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the platform and working-directory files
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Entries per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Log file (default: <data dir>/pokedex/pokedex.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = init_logging(args.log_file.as_deref())?;

    // Resolve config: CLI flags > env vars > config file > defaults
    let file = match &args.config {
        Some(path) => config_file::load_strict(path)?,
        None => config_file::load_config(),
    };
    let config = resolve_config(&file, &args);
    let theme_name = args
        .theme
        .clone()
        .or_else(|| file.theme().map(str::to_string))
        .unwrap_or_else(|| "hacker".to_string());
    tracing::info!(
        list_url = %config.list_url,
        page_size = config.page_size,
        theme = %theme_name,
        "starting"
    );

    let source: Arc<dyn CatalogSource> = Arc::new(PokeApi::new(config.clone())?);
    let (mut app, mut debounce_rx) = App::new(&config, theme::Theme::from_name(&theme_name));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(source, cmd_rx, event_tx, cancel.clone()));
    let mut input_rx = spawn_input_reader(cancel.clone());

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.start();

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(backend_event) = event_rx.recv() => {
                app.handle_backend_event(backend_event);
                while let Ok(evt) = event_rx.try_recv() {
                    app.handle_backend_event(evt);
                }
            }
            Some(term) = debounce_rx.recv() => app.apply_debounced(term),
            Some(evt) = input_rx.recv() => {
                let action = input::map_event(&evt, &app.input_mode);
                app.update(action);
            }
            _ = ticker.tick() => {
                app.update(action::Action::Tick);
            }
        }

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    tracing::info!("exiting");

    Ok(())
}

/// Layer CLI flags and environment variables over the config file.
fn resolve_config(file: &ConfigFile, args: &Args) -> Config {
    let mut config = file.to_config();
    config_file::apply_env(&mut config);
    if let Some(size) = args.page_size {
        config.page_size = config_file::sanitize_page_size(size);
    }
    config
}

/// Read terminal events on a blocking thread so the event loop never stalls
/// on `event::poll`.
fn spawn_input_reader(cancel: CancellationToken) -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(evt) => {
                    if tx.send(evt).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    break;
                }
            }
        }
    });
    rx
}

/// Send tracing output to a file; stdout belongs to the terminal UI.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => match dirs::data_dir() {
            Some(dir) => dir.join("pokedex").join("pokedex.log"),
            None => return Ok(None),
        },
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path has no file name: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(Some(guard))
}
