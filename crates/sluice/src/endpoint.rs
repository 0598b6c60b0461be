use url::Url;

use crate::error::MirrorError;

const DEFAULT_FTP_PORT: u16 = 21;

/// Where a mirroring session points: one host, one remote root directory.
/// Immutable for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// `host:port` as accepted by the connector.
    pub host: String,
    /// Absolute remote directory to mirror.
    pub root_path: String,
    /// Name for the local root directory, derived from the last path
    /// segment (or the host when the path is `/`).
    pub label: String,
}

impl RemoteEndpoint {
    /// Parse an `ftp://host[:port]/path` URL.
    pub fn parse(input: &str) -> Result<Self, MirrorError> {
        let invalid = |reason: &str| MirrorError::InvalidUrl {
            input: input.to_owned(),
            reason: reason.to_owned(),
        };

        let url = Url::parse(input).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "ftp" {
            return Err(invalid("expected an ftp:// URL"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        let port = url.port().unwrap_or(DEFAULT_FTP_PORT);

        let root_path = match url.path() {
            "" => "/".to_owned(),
            path => path.to_owned(),
        };
        let label = root_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(host)
            .to_owned();

        Ok(Self {
            host: format!("{host}:{port}"),
            root_path,
            label,
        })
    }
}
