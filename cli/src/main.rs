use clap::Parser;
use explorer_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    explorer_cli::run_main(Cli::parse()).await
}
