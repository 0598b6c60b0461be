use crate::retry::BackoffPolicy;

/// Configurable options for a mirroring session.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Retry policy applied to navigation, listing, size, and retrieve calls.
    pub backoff: BackoffPolicy,

    /// Password sent with the anonymous login, by convention a contact
    /// address.
    pub anonymous_password: String,

    /// Buffer size for download chunks (in bytes).
    pub buffer_size: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::default(),
            anonymous_password: "anonymous@".to_owned(),
            buffer_size: 32 * 1024,
        }
    }
}
