use anyhow::Context;
use clap::Parser;
use herald_config::HeraldConfig;
use herald_engine::Router;

mod cli;
mod commands;
mod handler;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("herald error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        cli::Commands::Schema(args) => commands::schema::handle(&args),
        cli::Commands::Classify(args) => {
            let config = load_config()?;
            commands::classify::handle(&args, &Router::new(config.classifier))
        }
        cli::Commands::Serve(args) => commands::serve::handle(&args, load_config()?).await,
    }
}

fn load_config() -> anyhow::Result<HeraldConfig> {
    let config = HeraldConfig::load_with_dotenv().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HERALD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
