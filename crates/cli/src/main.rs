mod args;
mod output;
mod runner;
mod server;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use args::{Cli, Commands, LogFormat};
use runner::{run_check, run_serve};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Serve { engine, bind } => {
            run_serve(&engine, bind).await?;
        }
        Commands::Check {
            engine,
            targets,
            output_format,
        } => {
            run_check(&engine, targets, output_format).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, format: LogFormat) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init(),
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
    }
}
