use std::path::PathBuf;

use clap::Parser;

/// Mirror remote FTP directory trees onto local storage.
#[derive(Debug, Parser)]
#[command(name = "sluice", version, about)]
pub struct Args {
    /// FTP URLs of the remote roots to mirror (ftp://host[:port]/path).
    pub roots: Vec<String>,

    /// Directory that receives one mirrored tree per root.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Maximum retries per remote operation.
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,

    /// Initial backoff delay in seconds.
    #[arg(long, default_value_t = 1)]
    pub initial_delay: u64,

    /// Cap on the backoff delay in seconds.
    #[arg(long, default_value_t = 60)]
    pub max_delay: u64,

    /// Pause between consecutive roots in seconds.
    #[arg(long, default_value_t = 5)]
    pub pause: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
