use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dc_cli::cli::{Cli, Command, ConfigCommand};
use dc_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Version) => {
            println!("docchat {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (mut config, config_path) = dc_cli::cli::load_config()?;
            cli.apply_overrides(&mut config);
            return dc_cli::cli::config::show(&config, &config_path);
        }
        _ => {}
    }

    let (mut config, _) = dc_cli::cli::load_config()?;
    cli.apply_overrides(&mut config);
    init_cli_tracing(&config.observability);
    let config = Arc::new(config);

    match cli.command {
        // Default to chat when no subcommand is given.
        None => dc_cli::cli::chat::chat(config, Vec::new()).await,
        Some(Command::Chat { files }) => dc_cli::cli::chat::chat(config, files).await,
        Some(Command::Ask { files, question, json }) => {
            dc_cli::cli::ask::ask(config, files, question, json).await
        }
        Some(Command::Version) | Some(Command::Config(_)) => Ok(()),
    }
}

/// Initialize stderr-only tracing.
///
/// `RUST_LOG` wins over the configured filter.  Defaults to `warn` so
/// diagnostic output does not interleave with the conversation.
fn init_cli_tracing(obs: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&obs.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if obs.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
