use anyhow::Result;
use clap::Parser;
use slackmoji::cli::{self, Cli, Commands};
use slackmoji::client::HttpSlackClient;
use slackmoji::config::Config;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Non-zero exit is reserved for configuration failures; anything past
    // startup logs its errors and exits cleanly.
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: slackmoji --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // .env is optional; deployments usually set SLACK_* directly
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slackmoji=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("slackmoji=info,warn,error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }

        Commands::Docs {
            namespace,
            input_root,
            output_root,
        } => {
            log_failure(cli::run_docs(&namespace, &input_root, &output_root).await);
        }

        Commands::Export {
            directory,
            concurrency,
            snapshot,
        } => {
            let (config, client) = api_context()?;
            log_failure(
                cli::run_export(&config, &client, &directory, concurrency, snapshot.as_deref())
                    .await,
            );
        }

        Commands::Import { directory, dry_run } => {
            let (_, client) = api_context()?;
            log_failure(cli::run_import(&client, &directory, dry_run).await);
        }

        Commands::ReleaseNotes { start, end } => {
            let (config, client) = api_context()?;
            log_failure(
                cli::run_release_notes(&config, &client, start.as_deref(), end.as_deref()).await,
            );
        }

        Commands::Stats => {
            let (_, client) = api_context()?;
            log_failure(cli::run_stats(&client).await);
        }
    }

    Ok(())
}

/// Load credentials and build the production client. Called before any
/// command that talks to the API; failure here is the fatal path.
fn api_context() -> Result<(Config, HttpSlackClient)> {
    let config = Config::from_env()?;
    let client = HttpSlackClient::new(&config)?;
    Ok((config, client))
}

/// Per-command failures are logged, not reflected in the exit status
fn log_failure(result: slackmoji::error::Result<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
    }
}
