//! Error types for the playback core.
//!
//! Everything the session controller can report is one of these variants. The
//! presentation layer never sees a backend fault directly; the controller turns
//! failures into state transitions plus a queued `PlayerError`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// The route parameter did not match any catalog title, even after alias
    /// normalization.
    #[error("No sound named '{0}' in the catalog")]
    NotFound(String),

    /// The audio backend could not produce a playable resource.
    #[error("Could not load '{title}': {reason}")]
    ResourceLoad { title: String, reason: String },

    /// Writing the recently played index failed. Logged, never surfaced.
    #[error("Could not record recent track: {0}")]
    PersistenceWrite(String),

    #[error("Invalid timer duration '{0}' (try 30m, 1h15m, 90s or 01:30:00)")]
    InvalidDuration(String),

    #[error("{0}")]
    Onboarding(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed user record: {0}")]
    Json(String),
}

impl From<std::io::Error> for PlayerError {
    fn from(e: std::io::Error) -> Self {
        PlayerError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(e: serde_json::Error) -> Self {
        PlayerError::Json(e.to_string())
    }
}

/// Failure reported by an [`AudioBackend`](crate::session::AudioBackend) while
/// configuring the audio mode or acquiring a resource.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct BackendError(pub String);

pub type Result<T> = std::result::Result<T, PlayerError>;
