//! songs-tui - A terminal browser for a songs catalogue REST service.

use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;

mod action;
mod app;
mod client;
mod config;
mod sort;
mod tui;
mod ui;

use action::{Action, SortColumn};
use app::App;
use config::Config;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "songs-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Server URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hooks
    tui::install_hooks()?;

    // Initialize logging
    let log_file = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("songs-tui")
        .join("songs-tui.log");

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_subscriber::fmt::layer()
        .with_writer(std::fs::File::create(&log_file)?)
        .with_ansi(false);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::sink) // Don't write to stdout in TUI mode
        .finish()
        .with(file_appender)
        .try_init()
        .ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    // Apply command-line overrides
    if let Some(server) = args.server {
        config.server.url = server;
    }

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create application
    let mut app = App::new(config, action_tx.clone());

    // Initialize terminal
    let mut terminal = tui::init()?;

    // Initialize application
    app.init();

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        // Render UI
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with timeout
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        let action = handle_key_event(key.code, key.modifiers, &app);
                        if action != Action::None {
                            action_tx.send(action)?;
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse);
                    if action != Action::None {
                        action_tx.send(action)?;
                    }
                }
                Event::Resize(width, height) => {
                    action_tx.send(Action::Resize(width, height))?;
                }
                _ => {}
            }
        }

        // Send tick action
        action_tx.send(Action::Tick)?;

        // Process all pending actions
        while let Ok(action) = action_rx.try_recv() {
            app.handle_action(action)?;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    tui::restore()?;

    Ok(())
}

/// Map key events to actions.
fn handle_key_event(code: KeyCode, modifiers: KeyModifiers, app: &App) -> Action {
    // Handle the filter dialog separately
    if app.dialog.open {
        return handle_filter_key(code, modifiers);
    }

    // Handle help overlay
    if app.show_help {
        return match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::HideHelp,
            _ => Action::None,
        };
    }

    // Global keys
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        _ => {}
    }

    // Normal mode keys
    match code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Char('g') => Action::JumpToTop,
        KeyCode::Char('G') => Action::JumpToBottom,

        // Pagination
        KeyCode::Left | KeyCode::Char('h') => Action::PrevPage,
        KeyCode::Right | KeyCode::Char('l') => Action::NextPage,
        KeyCode::Char('r') => Action::CycleRowsPerPage,

        // Sorting
        KeyCode::Char('1') => Action::SortBy(SortColumn::Author),
        KeyCode::Char('2') => Action::SortBy(SortColumn::Title),
        KeyCode::Char('3') => Action::SortBy(SortColumn::Genre),
        KeyCode::Char('4') => Action::SortBy(SortColumn::Year),
        KeyCode::Char('5') => Action::SortBy(SortColumn::Duration),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleSelect,
        KeyCode::Char('a') => Action::ToggleSelectAll,

        // Display
        KeyCode::Char('d') => Action::ToggleDense,

        // Filters
        KeyCode::Char('f') => Action::OpenFilter,

        // Refresh
        KeyCode::Char('R') => Action::Refresh,

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        // Clear error
        KeyCode::Char('x') => Action::ClearError,

        _ => Action::None,
    }
}

/// Handle key events while the filter dialog is open.
fn handle_filter_key(code: KeyCode, modifiers: KeyModifiers) -> Action {
    match code {
        KeyCode::Esc => Action::CancelFilter,
        KeyCode::Enter => Action::ConfirmFilter,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Action::FilterFieldNext,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Action::FilterFieldPrev,
        KeyCode::Down | KeyCode::Char('j') => Action::FilterValueNext,
        KeyCode::Up | KeyCode::Char('k') => Action::FilterValuePrev,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        _ => Action::None,
    }
}

/// Handle mouse events.
fn handle_mouse_event(mouse: crossterm::event::MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(crossterm::event::MouseButton::Left) => {
            Action::MouseClick(mouse.column, mouse.row)
        }
        MouseEventKind::ScrollUp => Action::CursorUp,
        MouseEventKind::ScrollDown => Action::CursorDown,
        _ => Action::None,
    }
}

use tracing_subscriber::prelude::*;
