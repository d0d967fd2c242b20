#![deny(clippy::unwrap_used, clippy::expect_used)]

mod app;
mod export;
mod input;
mod pages;
mod ui;

pub use app::App;

use std::sync::Arc;

use crossterm::ExecutableCommand;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use explorer_core::AgentsBackend;
use explorer_protocol::turn::Capability;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

/// Launch the interactive explorer over the given backend. The terminal is
/// restored even when the app loop errors out.
pub async fn run_main(
    backend: Arc<dyn AgentsBackend>,
    initial_page: Option<Capability>,
) -> anyhow::Result<()> {
    info!("launching agents explorer UI");

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    // Best effort; some terminals do not support bracketed paste.
    let _ = stdout.execute(EnableBracketedPaste);
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = app::run(&mut terminal, backend, initial_page).await;

    let _ = std::io::stdout().execute(DisableBracketedPaste);
    disable_raw_mode()?;
    std::io::stdout().execute(LeaveAlternateScreen)?;
    result
}
