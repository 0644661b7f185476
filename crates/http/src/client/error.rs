//! Client error types

use secure_auth_core::ApiError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}")]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    /// Authentication failed
    #[error("Authentication failed")]
    AuthenticationFailed(Option<String>),

    /// Bad request
    #[error("Bad request")]
    BadRequest(Option<String>),

    /// Resource not found
    #[error("Resource not found")]
    NotFound(Option<String>),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status for errors the server answered with
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of the server's error body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(message)
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Pull `message` out of a JSON error body
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        if let Some(status) = err.status() {
            return Self::Rejected {
                status,
                message: err.server_message().map(str::to_string),
            };
        }
        match err {
            ClientError::Serialization(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping_keeps_server_message() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        );
        assert!(matches!(err, ClientError::AuthenticationFailed(_)));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
    }

    #[test]
    fn non_json_body_has_no_message() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn converts_into_api_rejection() {
        let err = ClientError::from_status(StatusCode::CONFLICT, r#"{"message":"Email taken"}"#);
        assert_eq!(
            ApiError::from(err),
            ApiError::Rejected {
                status: 409,
                message: Some("Email taken".to_string())
            }
        );

        let err = ClientError::Configuration("base_url is required".to_string());
        assert!(matches!(ApiError::from(err), ApiError::Transport(_)));
    }
}
