use anyhow::{Context, Result};
use clap::Parser;

use cert_generation::cli::Cli;
use cert_generation::config::Config;
use cert_generation::{
    validate, Dispatcher, InMemoryUserDirectory, OpaqueCourseKeyParser, QueuedGenerationService,
    Spool,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let parser = OpaqueCourseKeyParser;

    // Reject bad arguments before touching any configuration.
    let request = validate(&parser, &cli.users, Some(cli.course_key.as_str()))?;

    let config_path = match cli.settings {
        Some(path) => path,
        None => Config::default_path()?,
    };
    log::info!("[MAIN] Using config path: {}", config_path.display());

    let config = Config::from_file(&config_path).context("Failed to load config file")?;

    let directory = InMemoryUserDirectory::from_file(&config.directory.users_path)
        .context("Failed to load user directory")?;
    let spool = Spool::open(&config.generation.spool_dir).context("Failed to open spool")?;

    let (service, worker) = QueuedGenerationService::spawn(spool);
    Dispatcher::new(&parser, &directory, &service).dispatch(&request);

    // Closing the queue lets the worker drain and exit.
    drop(service);
    let written = worker.await.context("Generation queue worker failed")?;
    log::info!(
        "[MAIN] {} certificate generation task(s) queued for {}",
        written,
        request.course_key
    );

    Ok(())
}
