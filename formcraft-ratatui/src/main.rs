use std::fs::File;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use formcraft_http::HttpSubmitter;
use formcraft_ratatui::{Cli, ComposerApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let submitter = HttpSubmitter::with_config(cli.submitter_config())
        .with_context(|| format!("invalid endpoint {}", cli.endpoint))?;
    info!(endpoint = %submitter.endpoint(), "starting formcraft");

    let composer = ComposerApp::new(Arc::new(submitter))
        .with_title(cli.title)
        .run()?;

    info!(questions = composer.len(), "formcraft closed");
    Ok(())
}
