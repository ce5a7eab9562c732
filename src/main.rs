//! YouTube agent CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use youtube_agent::cli::preflight::{self, Operation};
use youtube_agent::cli::{commands, Cli, Commands, Output};
use youtube_agent::config::{AgentConfig, Credentials, EnvSource};
use youtube_agent::dispatcher::Dispatcher;
use youtube_agent::initializer::Initializer;

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so env-backed flags see .env values
    youtube_agent::config::load_dotenv(None);

    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli.log_level();

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("youtube_agent={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let env: Arc<dyn EnvSource> = Arc::new(cli.env_overrides());
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(Initializer::new(env.clone()))));

    match &cli.command {
        Some(Commands::Config { action }) => {
            commands::run_config(action, cli.config.as_deref())?;
        }

        Some(Commands::Ask { prompt }) => {
            let result = commands::run_ask(prompt, &dispatcher, env.as_ref()).await;
            commands::cleanup().await;
            result?;
        }

        Some(Commands::Serve) | None => {
            commands::print_banner(&Credentials::from_source(env.as_ref()));

            if let Err(e) = preflight::check(Operation::Serve, env.as_ref()) {
                Output::warning(&format!("{}", e));
            }

            let config = AgentConfig::load(cli.config.as_deref());

            println!();
            Output::info("Starting YouTube Analysis Agent server...");

            match commands::run_serve(config, dispatcher).await {
                Ok(()) => {
                    println!();
                    Output::info("YouTube Analysis Agent stopped");
                    commands::cleanup().await;
                }
                Err(e) => {
                    Output::error(&format!("Error starting agent: {}", e));
                    eprintln!("{}", commands::failure_report(&e));
                    commands::cleanup().await;
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
