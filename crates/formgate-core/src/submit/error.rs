use thiserror::Error;

use crate::auth::StoreError;
use crate::http::TransportError;
use crate::utils::truncate;

/// Maximum length for response bodies in log messages
const MAX_LOGGED_BODY_LENGTH: usize = 500;

/// Why a submission failed. All variants are shown to the user the same
/// way: an error banner with whatever response body there was.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Request failed with status {status}: {}", truncate(.body, MAX_LOGGED_BODY_LENGTH))]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid form action: {0}")]
    InvalidAction(#[from] url::ParseError),

    #[error("Failed to store credential: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    pub fn from_status(status: u16, body: &str) -> Self {
        SubmitError::Status {
            status,
            body: body.to_string(),
        }
    }

    /// HTTP status, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for the error banner: the raw response body, which is empty when
    /// no response arrived. Store failures describe themselves.
    pub fn banner_text(&self) -> String {
        match self {
            SubmitError::Status { body, .. } => body.clone(),
            SubmitError::Transport(_) | SubmitError::InvalidAction(_) => String::new(),
            SubmitError::Store(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_banner_is_raw_body() {
        let err = SubmitError::from_status(403, "Invalid Credentials");
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.banner_text(), "Invalid Credentials");
    }

    #[test]
    fn test_invalid_action_has_empty_banner() {
        let err = SubmitError::from(url::ParseError::RelativeUrlWithoutBase);
        assert_eq!(err.status(), None);
        assert_eq!(err.banner_text(), "");
    }

    #[test]
    fn test_display_truncates_long_bodies() {
        let err = SubmitError::from_status(500, &"x".repeat(2000));
        assert!(err.to_string().len() < 600);
        assert!(err.to_string().ends_with("..."));
    }
}
