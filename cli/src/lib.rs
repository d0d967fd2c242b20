#![deny(clippy::unwrap_used, clippy::expect_used)]

use std::io::IsTerminal;
use std::sync::Arc;

use clap::Parser;
use clap::ValueEnum;
use explorer_core::AgentsBackend;
use explorer_core::Config;
use explorer_core::HttpBackend;
use explorer_core::MockBackend;
use explorer_protocol::turn::Capability;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "agents-explorer", version, about = "Interactive explorer for the hosted agents API")]
pub struct Cli {
    /// Use the deterministic offline backend instead of the remote API.
    #[arg(long)]
    pub mock: bool,

    /// Capability page to open on startup.
    #[arg(long, value_enum)]
    pub page: Option<PageArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PageArg {
    Code,
    Image,
    Search,
    Orchestration,
    Function,
}

impl From<PageArg> for Capability {
    fn from(page: PageArg) -> Self {
        match page {
            PageArg::Code => Capability::Code,
            PageArg::Image => Capability::Image,
            PageArg::Search => Capability::Search,
            PageArg::Orchestration => Capability::Orchestration,
            PageArg::Function => Capability::Function,
        }
    }
}

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    // Load a .env file when present; real environment variables win.
    let _ = dotenvy::dotenv();

    // Logs go to stderr only; stdout belongs to the terminal UI.
    let default_level = "error";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();

    // Configuration is resolved before anything else: a missing API key
    // aborts startup here, before any session state exists.
    let backend: Arc<dyn AgentsBackend> = if cli.mock {
        info!("using the mock backend");
        Arc::new(MockBackend)
    } else {
        let config = Config::load()?;
        Arc::new(HttpBackend::new(&config)?)
    };

    explorer_tui::run_main(backend, cli.page.map(Capability::from)).await
}
