use std::io;
use std::path::PathBuf;

use suppaftp::FtpError;

/// Error type for every engine operation.
///
/// The retryable-vs-fatal decision is made exactly once, in
/// [`MirrorError::from_ftp`], where the underlying FTP library error is
/// observed. Callers match on the variant, never on message text.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: FtpError,
    },

    #[error("anonymous login refused by {host}: {source}")]
    Login {
        host: String,
        #[source]
        source: FtpError,
    },

    /// Server-reported temporary condition (4xx reply). The only variant
    /// the backoff executor retries.
    #[error("server reported a temporary condition ({status}): {reason}")]
    Transient { status: u32, reason: String },

    /// Permanent server rejection (5xx reply). Covers missing or
    /// inaccessible paths at navigation, and "not a plain file" at the
    /// retrieve step.
    #[error("server rejected the request ({status}): {reason}")]
    Rejected { status: u32, reason: String },

    /// Malformed or unexpected protocol exchange, including dropped
    /// control/data connections.
    #[error("protocol error: {source}")]
    Protocol {
        #[source]
        source: FtpError,
    },

    #[error("I/O error on {path}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid FTP URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<MirrorError>,
    },
}

impl MirrorError {
    /// Classify a raw FTP library error into the engine taxonomy.
    ///
    /// 4xx replies are transient, 5xx replies are permanent rejections,
    /// everything else (connection drops, unparseable replies) is a
    /// protocol error.
    pub fn from_ftp(err: FtpError) -> Self {
        match err {
            FtpError::UnexpectedResponse(response) => {
                let status = response.status as u32;
                match status {
                    400..=499 => Self::Transient {
                        status,
                        reason: String::from_utf8_lossy(&response.body).trim().to_owned(),
                    },
                    500..=599 => Self::Rejected {
                        status,
                        reason: String::from_utf8_lossy(&response.body).trim().to_owned(),
                    },
                    _ => Self::Protocol {
                        source: FtpError::UnexpectedResponse(response),
                    },
                }
            }
            other => Self::Protocol { source: other },
        }
    }

    pub fn local_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
