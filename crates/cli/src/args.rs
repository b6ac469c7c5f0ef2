use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "favscan")]
#[command(version)]
#[command(about = "Identify network devices by their favicon fingerprint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the fingerprinting HTTP API
    Serve {
        #[command(flatten)]
        engine: EngineArgs,

        /// Address to listen on
        #[arg(short, long, env = "FAVSCAN_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },

    /// Fingerprint targets once and print the results
    Check {
        #[command(flatten)]
        engine: EngineArgs,

        /// Targets (hostname, IP or CIDR). Repeat for several: -t 10.0.0.1 -t example.com
        #[arg(short = 't', long = "target", required = true)]
        targets: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Favicon signature database (recog favicons.xml layout). The bundled data/favicons.xml is only a sample; supply the full Rapid7 recog favicons.xml for real identification
    #[arg(short, long, env = "FAVSCAN_SIGNATURES", default_value = "favicons.xml")]
    pub signatures: PathBuf,

    /// Probe timeout in seconds
    #[arg(long, env = "FAVSCAN_TIMEOUT", default_value = "25")]
    pub timeout: u64,

    /// Port the favicon is fetched from
    #[arg(long, default_value = "80")]
    pub port: u16,

    /// Largest favicon body accepted, in bytes
    #[arg(long, default_value = "1048576")]
    pub max_body_bytes: usize,

    /// Max concurrently fingerprinted targets (defaults to available parallelism)
    #[arg(short, long, env = "FAVSCAN_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Skip CIDR targets with more addresses than this
    #[arg(long)]
    pub max_addresses: Option<u128>,

    /// User-Agent header sent with each probe (defaults to favscan/<version>)
    #[arg(long, env = "FAVSCAN_USER_AGENT")]
    pub user_agent: Option<String>,
}
