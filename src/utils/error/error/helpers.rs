//! Helper functions for creating and classifying errors

use super::types::SyncError;

/// Helper functions for creating specific errors
impl SyncError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Whether the rendered message contains any of the given markers.
    ///
    /// Matching is case-insensitive and purely textual: the remote platform
    /// reports rate limiting, quota exhaustion, internal errors and document
    /// contention only through message text, not through stable codes.
    pub fn is_transient<S: AsRef<str>>(&self, markers: &[S]) -> bool {
        let message = self.to_string().to_lowercase();
        markers
            .iter()
            .any(|marker| message.contains(&marker.as_ref().to_lowercase()))
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::HttpClient(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
