// ABOUTME: Main entry point for the Guardian Keychain TUI application

//! Terminal front end for Guardian Keychain.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    Terminal,
};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use guardian_keychain::app::{App, EventHandler};
use guardian_keychain::components::LayoutComponent;
use guardian_keychain::config::{AppConfig, ClassifierBackend};

#[derive(Debug, Parser)]
#[command(name = "guardian-keychain", version, about = "Panic-button keychain for your terminal")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Guardian list JSON file
    #[arg(long)]
    guardians: Option<PathBuf>,

    /// Send scenes to this HTTP classifier instead of the simulated one
    #[arg(long)]
    classifier_endpoint: Option<String>,

    /// Simulate a user refusing camera access
    #[arg(long)]
    deny_camera: bool,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };

        if let Some(path) = &self.guardians {
            config.guardians_path = Some(path.clone());
        }
        if let Some(endpoint) = &self.classifier_endpoint {
            config.classifier.backend = ClassifierBackend::Http;
            config.classifier.endpoint = Some(endpoint.clone());
        }
        if self.deny_camera {
            config.devices.camera_denied = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();
    setup_panic_handler();

    let config = cli.load_config()?;
    let mut app = App::from_config(&config)?;
    let mut layout = LayoutComponent::new();

    let result = run_tui(&mut app, &mut layout).await;
    app.shutdown();

    result
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                        // Act on the key right away rather than waiting for the tick
                        app.tick();
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();

            if app.needs_ui_refresh() {
                terminal.draw(|frame| {
                    layout.render(frame, &app.state);
                })?;
            }
        }

        if app.state.should_quit {
            break;
        }

        // Let session tasks run between polls of the terminal
        tokio::task::yield_now().await;
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::data_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".guardian-keychain/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "guardian-keychain-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // Logging is best-effort; the keychain still works without a log file
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        eprintln!("Could not open log file {}", log_file.display());
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false) // No ANSI colors in log file
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guardian_keychain=info".into())
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Worker panics are caught by the classifier client; the UI keeps running
        if !owns_terminal(std::thread::current().name()) {
            error!("Background task panicked: {}", panic_info);
            return;
        }

        // Ensure terminal is restored before logging the panic
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stderr(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}

/// Only the thread driving the TUI may tear the terminal down
fn owns_terminal(thread_name: Option<&str>) -> bool {
    thread_name == Some("main")
}
