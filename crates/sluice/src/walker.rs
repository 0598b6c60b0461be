//! Recursive, depth-first traversal of a remote directory tree.
//!
//! The walk is strictly sequential: one control connection, one branch at
//! a time, entries handled in server listing order. The connection's
//! working-directory cursor is the only state shared across recursive
//! calls, so every level restores it before returning, even when entries
//! inside failed.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::client::RemoteClient;
use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::events::TransferObserver;
use crate::listing::{EntryKind, parse_listing};
use crate::mirror::MirrorSummary;
use crate::retry::run_with_backoff;
use crate::transfer::{TransferOutcome, transfer_file};

pub struct Walker<'a, C: RemoteClient> {
    client: &'a mut C,
    config: &'a MirrorConfig,
    observer: &'a mut dyn TransferObserver,
    summary: MirrorSummary,
}

impl<'a, C: RemoteClient> Walker<'a, C> {
    pub fn new(
        client: &'a mut C,
        config: &'a MirrorConfig,
        observer: &'a mut dyn TransferObserver,
    ) -> Self {
        Self {
            client,
            config,
            observer,
            summary: MirrorSummary::default(),
        }
    }

    /// Counters accumulated so far; `elapsed` is left for the caller.
    pub fn into_summary(self) -> MirrorSummary {
        self.summary
    }

    /// Mirror `remote_dir` into `local_dir`, depth-first.
    ///
    /// An error aborts only this branch; the caller decides whether that
    /// means skipping a subtree (sibling entries continue) or failing the
    /// whole root.
    pub fn walk(&mut self, remote_dir: &str, local_dir: &Path) -> Result<(), MirrorError> {
        self.probe_directory(remote_dir)?;

        fs::create_dir_all(local_dir).map_err(|err| MirrorError::local_io(local_dir, err))?;
        self.observer.on_directory(remote_dir);
        self.summary.directories += 1;

        let policy = self.config.backoff.clone();
        run_with_backoff(&policy, "cwd", || self.client.change_dir(remote_dir))?;

        let walked = self.walk_entries(remote_dir, local_dir);
        // The restore runs no matter how the entry loop went, so sibling
        // walks operate from a consistent cursor.
        let restored = run_with_backoff(&policy, "cdup", || self.client.change_dir_up());
        walked.and(restored)
    }

    /// Existence probe: step into the directory and straight back out.
    /// A path that cannot be entered aborts this branch only.
    fn probe_directory(&mut self, remote_dir: &str) -> Result<(), MirrorError> {
        self.client.change_dir(remote_dir)?;
        self.client.change_dir_up()
    }

    fn walk_entries(&mut self, remote_dir: &str, local_dir: &Path) -> Result<(), MirrorError> {
        let policy = self.config.backoff.clone();
        let lines = run_with_backoff(&policy, "list", || self.client.list_current_dir())?;
        let entries = parse_listing(&lines);
        debug!(
            remote = remote_dir,
            entries = entries.len(),
            "Listed directory"
        );

        for entry in entries {
            let remote_path = join_remote(remote_dir, &entry.name);
            let local_path = local_dir.join(&entry.name);
            match entry.kind {
                EntryKind::Directory => self.walk_child(&remote_path, &local_path),
                EntryKind::File => self.transfer_entry(&entry.name, &remote_path, &local_path),
            }
        }
        Ok(())
    }

    /// Recurse into a subdirectory; a failure skips that subtree and the
    /// parent's remaining entries still execute.
    fn walk_child(&mut self, remote_path: &str, local_path: &Path) {
        if let Err(err) = self.walk(remote_path, local_path) {
            self.summary.failures += 1;
            warn!(remote = remote_path, error = %err, "Skipping directory subtree");
        }
    }

    fn transfer_entry(&mut self, name: &str, remote_path: &str, local_path: &Path) {
        let result = transfer_file(
            &mut *self.client,
            self.config,
            &mut *self.observer,
            name,
            remote_path,
            local_path,
        );
        match result {
            Ok(TransferOutcome::Completed { bytes }) => {
                self.summary.files += 1;
                self.summary.bytes += bytes;
            }
            Ok(TransferOutcome::TreatAsDirectory) => {
                debug!(remote = remote_path, "Listing misclassified a directory");
                self.walk_child(remote_path, local_path);
            }
            Err(err) => {
                self.summary.failures += 1;
                warn!(remote = remote_path, error = %err, "Skipping file");
            }
        }
    }
}

fn join_remote(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}
