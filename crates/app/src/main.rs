use std::sync::Arc;

use clap::Parser;
use ledger::Ledger;

mod cli;
mod commands;
mod error;
mod observer;
mod render;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "finance_tracker={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let ledger = Ledger::connect(&settings.database.url()).await?;
    tracing::debug!("ledger opened at {}", settings.database.url());
    ledger.subscribe(Arc::new(observer::LogObserver));

    let result = commands::run(&ledger, cli.command, &mut std::io::stdout()).await;
    if let Err(err) = ledger.close().await {
        tracing::error!("failed to close the database: {err}");
    }
    result?;

    Ok(())
}
