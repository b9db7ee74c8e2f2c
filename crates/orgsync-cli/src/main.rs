use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod console;
mod context;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("orgsync error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let config = load_config(&flags)?;
    let ctx = context::AppContext::init(config, &flags)
        .context("failed to initialize orgsync client")?;

    commands::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ORGSYNC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn load_config(flags: &cli::GlobalFlags) -> anyhow::Result<orgsync_config::OrgsyncConfig> {
    let mut config = orgsync_config::OrgsyncConfig::load_with_dotenv()
        .context("failed to load orgsync configuration")?;

    if let Some(base_url) = &flags.base_url {
        config.api.base_url.clone_from(base_url);
        config
            .validate()
            .with_context(|| format!("invalid --base-url '{base_url}'"))?;
    }

    tracing::debug!(base_url = %config.api.base_url, reconnect = config.stream.reconnect, "configuration loaded");
    Ok(config)
}
