//! Error types shared by the storage and session layers

/// Standard result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Failure reported by a [`crate::storage::KeyValueStore`] backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage is unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage rejected write to '{key}': {message}")]
    WriteRejected { key: String, message: String },
}

impl StorageError {
    /// Create an unavailable-backend error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a rejected-write error
    pub fn write_rejected(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteRejected {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Session persistence errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl SessionError {
    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}
