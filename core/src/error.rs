//! Error types for the backend API client.
//!
//! # Design
//! The status-derived variants mirror how the UI reacts to each class of
//! failure: `Unauthorized` and `MalformedToken` force a logout, everything
//! else only produces a notice. Statuses outside the known taxonomy land in
//! `Http` with the raw status code and body for debugging.

use std::fmt;

/// Errors produced while building requests, executing them, or parsing
/// responses.
#[derive(Debug)]
pub enum ApiError {
    /// The transport could not reach the server at all.
    NetworkUnreachable(String),

    /// The server returned 401 — the token is missing, expired or revoked.
    Unauthorized,

    /// The server returned 403 — the action is not allowed for this user.
    Forbidden,

    /// The server returned 404 — the requested resource does not exist.
    NotFound,

    /// The server returned 400 — it rejected the submitted data.
    BadRequest(String),

    /// The server returned 500.
    ServerError,

    /// The stored token contains bytes that cannot go into a header value.
    /// Treated like an invalid token: the session clears it and logs out.
    MalformedToken,

    /// Any other non-success status.
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl ApiError {
    /// Classify a non-success HTTP status into the matching variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => ApiError::BadRequest(body),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500 => ApiError::ServerError,
            _ => ApiError::Http { status, body },
        }
    }

    /// Whether this failure invalidates the stored token. The session reacts
    /// by clearing credentials and dropping back to the anonymous path.
    pub fn invalidates_token(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::MalformedToken)
    }

    /// The text surfaced to the user for this failure. Classification stays
    /// here so the notification layer never inspects status codes.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnreachable(_) => {
                "Server unreachable. Try again later".to_string()
            }
            ApiError::Unauthorized => {
                "Your session has expired. Sign in again".to_string()
            }
            ApiError::Forbidden => "This action is not allowed for you".to_string(),
            ApiError::NotFound => {
                "Data not found. The request may still be processing".to_string()
            }
            ApiError::BadRequest(_) => {
                "The server rejected the submitted data. Values must be unique and well-formed"
                    .to_string()
            }
            ApiError::ServerError => {
                "Internal server error. The server could not process the request".to_string()
            }
            ApiError::MalformedToken => {
                "The stored token is corrupted. Sign in again".to_string()
            }
            other => format!("Error: {other}"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NetworkUnreachable(msg) => write!(f, "server unreachable: {msg}"),
            ApiError::Unauthorized => write!(f, "unauthorized"),
            ApiError::Forbidden => write!(f, "forbidden"),
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::BadRequest(body) => write!(f, "bad request: {body}"),
            ApiError::ServerError => write!(f, "internal server error"),
            ApiError::MalformedToken => write!(f, "malformed token"),
            ApiError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
