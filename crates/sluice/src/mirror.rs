//! Per-root session orchestration: one connection, one root walk, one
//! summary.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

use crate::client::FtpSession;
use crate::config::MirrorConfig;
use crate::endpoint::RemoteEndpoint;
use crate::error::MirrorError;
use crate::events::TransferObserver;
use crate::walker::Walker;

/// What one root walk accomplished.
#[derive(Debug, Clone, Default)]
pub struct MirrorSummary {
    pub directories: u64,
    pub files: u64,
    pub bytes: u64,
    /// Entries (files or whole subtrees) skipped after their own failure.
    pub failures: u64,
    pub elapsed: Duration,
}

/// Mirror one remote root into `local_root/<label>`.
///
/// Acquires a session scoped to this call; the session is released
/// exactly once on every exit path when it drops at the end of the call.
pub fn mirror(
    endpoint: &RemoteEndpoint,
    local_root: &Path,
    config: &MirrorConfig,
    observer: &mut dyn TransferObserver,
) -> Result<MirrorSummary, MirrorError> {
    let started = Instant::now();
    info!(host = %endpoint.host, root = %endpoint.root_path, "Mirror starting");

    let mut session = FtpSession::connect(&endpoint.host, config)?;
    let target = local_root.join(&endpoint.label);

    let mut walker = Walker::new(&mut session, config, observer);
    let walked = walker.walk(&endpoint.root_path, &target);
    let mut summary = walker.into_summary();
    summary.elapsed = started.elapsed();
    walked?;

    info!(
        host = %endpoint.host,
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        failures = summary.failures,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Mirror finished"
    );
    Ok(summary)
}
