use clap::Parser;
use reference_app::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::serve::run(Cli::parse()).await
}
