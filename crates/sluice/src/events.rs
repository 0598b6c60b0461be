use std::time::Duration;

use crate::error::MirrorError;

/// Hooks through which a renderer observes a mirroring session.
///
/// The engine reports; the observer decides how (or whether) to draw.
/// All methods default to no-ops so implementors subscribe only to the
/// events they care about.
pub trait TransferObserver {
    /// A remote directory is about to be walked.
    fn on_directory(&mut self, _remote_path: &str) {}

    /// A file transfer is starting. `total` is `None` when the size
    /// query failed and the byte total is unknown.
    fn on_file_start(&mut self, _remote_path: &str, _total: Option<u64>) {}

    /// Absolute byte position within the current file. Resets to the
    /// chunk length when a retried transfer restarts from scratch.
    fn on_progress(&mut self, _position: u64) {}

    fn on_file_done(&mut self, _remote_path: &str, _bytes: u64, _elapsed: Duration) {}

    fn on_file_failed(&mut self, _remote_path: &str, _error: &MirrorError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {}
