use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hb_crypto::DigestAlgorithm;

#[derive(Parser)]
#[command(
    name = "hashbank",
    about = "Hashbank: asynchronous payload hashing service",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP service
    Serve(ServeArgs),
    /// Hash a payload locally and print the digest
    Digest(DigestArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of hashing workers
    #[arg(long)]
    pub pool_size: Option<usize>,
    /// Maximum number of queued payloads
    #[arg(long)]
    pub queue_capacity: Option<usize>,
    /// Settling delay in milliseconds before a hash becomes visible
    #[arg(long)]
    pub settle_ms: Option<u64>,
    /// Digest algorithm: sha512, sha256 or blake3
    #[arg(long)]
    pub algorithm: Option<DigestAlgorithm>,
}

#[derive(Args)]
pub struct DigestArgs {
    pub payload: String,
    #[arg(long, default_value = "sha512")]
    pub algorithm: DigestAlgorithm,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}
