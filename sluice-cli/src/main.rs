mod cli;
mod progress;

use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use humansize::{BINARY, format_size};
use tracing::{Level, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use sluice_engine::{BackoffPolicy, MirrorConfig, MirrorError, RemoteEndpoint, mirror};

use crate::cli::Args;
use crate::progress::{ConsoleObserver, format_elapsed};

fn main() {
    let args = Args::parse();
    if args.roots.is_empty() {
        eprintln!("usage: sluice [OPTIONS] <ftp://host[:port]/path>...");
        eprintln!("Run `sluice --help` for details.");
        process::exit(1);
    }

    init_logging(args.verbose, args.quiet);

    let config = MirrorConfig {
        backoff: BackoffPolicy {
            max_retries: args.max_retries,
            initial_delay: Duration::from_secs(args.initial_delay),
            max_delay: Duration::from_secs(args.max_delay),
        },
        ..MirrorConfig::default()
    };
    let pause = Duration::from_secs(args.pause);

    let mut failed = 0usize;
    for (index, root) in args.roots.iter().enumerate() {
        if index > 0 {
            // Fixed breather between roots so one run does not hammer the
            // remote server with back-to-back sessions.
            thread::sleep(pause);
        }
        if let Err(err) = run_root(root, &args, &config) {
            error!(root = %root, error = %err, "Mirror failed");
            failed += 1;
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}

fn run_root(root: &str, args: &Args, config: &MirrorConfig) -> Result<(), MirrorError> {
    let endpoint = RemoteEndpoint::parse(root)?;
    let mut observer = ConsoleObserver::new();
    let summary = mirror(&endpoint, &args.output, config, &mut observer)?;

    println!(
        "{}: {} files ({}) in {}",
        endpoint.label,
        summary.files,
        format_size(summary.bytes, BINARY),
        format_elapsed(summary.elapsed)
    );
    if summary.failures > 0 {
        println!("  {} entries skipped after errors", summary.failures);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
