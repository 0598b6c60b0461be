//! Single-file streamed transfer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::client::RemoteClient;
use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::events::TransferObserver;
use crate::retry::run_with_backoff;

#[derive(Debug)]
pub(crate) enum TransferOutcome {
    Completed { bytes: u64 },
    /// The server refused to retrieve the path: the listing misclassified
    /// a directory as a file, and the walker should take over.
    TreatAsDirectory,
}

/// Mirror one remote file to `local_path`.
///
/// The size query only drives progress accounting; if it fails the total
/// degrades to unknown and the byte stream still proceeds. The retrieval
/// itself is one backoff-wrapped operation, and every attempt re-creates
/// the local file so a retried transfer starts from zero bytes.
pub(crate) fn transfer_file<C: RemoteClient + ?Sized>(
    client: &mut C,
    config: &MirrorConfig,
    observer: &mut dyn TransferObserver,
    name: &str,
    remote_path: &str,
    local_path: &Path,
) -> Result<TransferOutcome, MirrorError> {
    if let Some(parent) = local_path.parent() {
        fs::create_dir_all(parent).map_err(|err| MirrorError::local_io(parent, err))?;
    }

    let total = match run_with_backoff(&config.backoff, "size", || client.file_size(name)) {
        Ok(size) => Some(size),
        Err(err) => {
            debug!(remote = remote_path, error = %err, "Size query failed; total unknown");
            None
        }
    };

    observer.on_file_start(remote_path, total);
    let started = Instant::now();

    let result = run_with_backoff(&config.backoff, "retrieve", || {
        let mut file =
            File::create(local_path).map_err(|err| MirrorError::local_io(local_path, err))?;
        let mut written = 0u64;
        let retrieved = client.retrieve(name, &mut |chunk| {
            file.write_all(chunk)
                .map_err(|err| MirrorError::local_io(local_path, err))?;
            written += chunk.len() as u64;
            observer.on_progress(written);
            Ok(())
        })?;
        Ok(retrieved)
    });

    match result {
        Ok(bytes) => {
            let elapsed = started.elapsed();
            observer.on_file_done(remote_path, bytes, elapsed);
            info!(
                remote = remote_path,
                bytes,
                elapsed_ms = elapsed.as_millis() as u64,
                "File mirrored"
            );
            Ok(TransferOutcome::Completed { bytes })
        }
        Err(MirrorError::Rejected { status, reason }) => {
            debug!(
                remote = remote_path,
                status,
                reason = %reason,
                "Retrieve rejected; treating path as a directory"
            );
            // Drop the empty placeholder so a directory can take its place.
            let _ = fs::remove_file(local_path);
            Ok(TransferOutcome::TreatAsDirectory)
        }
        Err(err) => {
            observer.on_file_failed(remote_path, &err);
            Err(err)
        }
    }
}
