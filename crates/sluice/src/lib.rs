//! # sluice-engine
//!
//! Recursive FTP tree mirroring with bounded retry.
//!
//! The engine walks a remote directory tree over a single anonymous FTP
//! session and reproduces it on local storage, retrying transient server
//! failures with exponential backoff and reporting progress through
//! observer hooks. Traversal is strictly sequential and depth-first; the
//! one piece of shared state is the connection's working-directory
//! cursor, which every walk level restores before returning.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod listing;
pub mod mirror;
pub mod retry;
mod transfer;
pub mod walker;

pub use client::{FtpSession, RemoteClient};
pub use config::MirrorConfig;
pub use endpoint::RemoteEndpoint;
pub use error::MirrorError;
pub use events::{NoopObserver, TransferObserver};
pub use listing::{DirectoryEntry, EntryKind};
pub use mirror::{MirrorSummary, mirror};
pub use retry::{BackoffPolicy, run_with_backoff};
pub use walker::Walker;
