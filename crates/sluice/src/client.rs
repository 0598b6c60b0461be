//! FTP session management and the remote-operation seam.

use std::io::Read;

use suppaftp::FtpStream;
use tracing::{debug, info};

use crate::config::MirrorConfig;
use crate::error::MirrorError;

pub const ANONYMOUS_USER: &str = "anonymous";

/// The remote operations the walker and transfer are written against.
///
/// [`FtpSession`] implements this over a live control connection; tests
/// substitute a deterministic in-memory fake. All paths are interpreted
/// by the server relative to its working-directory cursor, which is the
/// one piece of state shared across calls.
pub trait RemoteClient {
    /// Change the remote working directory.
    fn change_dir(&mut self, path: &str) -> Result<(), MirrorError>;

    /// Move the remote working directory to its parent.
    fn change_dir_up(&mut self) -> Result<(), MirrorError>;

    /// Raw listing lines for the current working directory.
    fn list_current_dir(&mut self) -> Result<Vec<String>, MirrorError>;

    /// Size in bytes of a file in the current working directory.
    fn file_size(&mut self, name: &str) -> Result<u64, MirrorError>;

    /// Stream a file from the current working directory through `sink`
    /// one chunk at a time, returning the number of bytes retrieved.
    fn retrieve(
        &mut self,
        name: &str,
        sink: &mut dyn FnMut(&[u8]) -> Result<(), MirrorError>,
    ) -> Result<u64, MirrorError>;
}

/// One live anonymous FTP session.
///
/// Dropping the session releases the connection exactly once on every
/// exit path: a best-effort `QUIT`, falling back to the socket close the
/// stream's own drop performs.
pub struct FtpSession {
    stream: FtpStream,
    host: String,
    buffer_size: usize,
}

impl FtpSession {
    /// Open the control connection and log in anonymously.
    ///
    /// Connection and login failures are surfaced immediately; they are
    /// never wrapped in backoff.
    pub fn connect(host: &str, config: &MirrorConfig) -> Result<Self, MirrorError> {
        debug!(host, "Opening FTP control connection");
        let mut stream = FtpStream::connect(host).map_err(|source| MirrorError::Connect {
            host: host.to_owned(),
            source,
        })?;
        stream
            .login(ANONYMOUS_USER, &config.anonymous_password)
            .map_err(|source| MirrorError::Login {
                host: host.to_owned(),
                source,
            })?;
        info!(host, "Anonymous FTP session established");
        Ok(Self {
            stream,
            host: host.to_owned(),
            buffer_size: config.buffer_size,
        })
    }
}

impl RemoteClient for FtpSession {
    fn change_dir(&mut self, path: &str) -> Result<(), MirrorError> {
        self.stream.cwd(path).map_err(MirrorError::from_ftp)
    }

    fn change_dir_up(&mut self) -> Result<(), MirrorError> {
        self.stream.cdup().map_err(MirrorError::from_ftp)
    }

    fn list_current_dir(&mut self) -> Result<Vec<String>, MirrorError> {
        self.stream.list(None).map_err(MirrorError::from_ftp)
    }

    fn file_size(&mut self, name: &str) -> Result<u64, MirrorError> {
        self.stream
            .size(name)
            .map(|size| size as u64)
            .map_err(MirrorError::from_ftp)
    }

    fn retrieve(
        &mut self,
        name: &str,
        sink: &mut dyn FnMut(&[u8]) -> Result<(), MirrorError>,
    ) -> Result<u64, MirrorError> {
        let mut data = self
            .stream
            .retr_as_stream(name)
            .map_err(MirrorError::from_ftp)?;

        let mut buffer = vec![0u8; self.buffer_size];
        let mut total = 0u64;
        loop {
            let read = data.read(&mut buffer).map_err(|err| MirrorError::Protocol {
                source: suppaftp::FtpError::ConnectionError(err),
            })?;
            if read == 0 {
                break;
            }
            sink(&buffer[..read])?;
            total += read as u64;
        }

        // Reads the final transfer reply; a 4xx here (aborted transfer)
        // classifies as transient and drives a full-file retry.
        self.stream
            .finalize_retr_stream(data)
            .map_err(MirrorError::from_ftp)?;
        Ok(total)
    }
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        match self.stream.quit() {
            Ok(()) => debug!(host = %self.host, "FTP session closed"),
            Err(err) => debug!(host = %self.host, error = %err, "QUIT failed; dropping socket"),
        }
    }
}
