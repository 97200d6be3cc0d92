//! parking-rssi CLI Entry Point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parking_rssi_cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grid(cmd) => commands::execute_grid(&cli.data_dir, cmd)?,
        Commands::Ap(cmd) => commands::execute_ap(&cli.data_dir, cmd)?,
        Commands::Train(args) => commands::execute_train(&cli.data_dir, args)?,
        Commands::Predict(args) => commands::execute_predict(&cli.data_dir, args)?,
        Commands::Samples(cmd) => commands::execute_samples(&cli.data_dir, cmd)?,
        Commands::Version => {
            println!("parking-rssi {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
