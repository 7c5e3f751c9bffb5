//! Shared error types for the services crate.
//!
//! Every service error can be classified with `kind()` and rendered with
//! `user_message()`, so views surface one notice per failed operation.

use thiserror::Error;

use roadmap_core::model::{RoadmapError, StepId, ValidationError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

pub(crate) const AUTH_MESSAGE: &str = "Your session has expired. Please log in again.";
pub(crate) const NETWORK_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub(crate) const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";
pub(crate) const RESOURCE_MESSAGE: &str = "Couldn't open this resource.";

/// Error taxonomy surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation,
    /// Missing or rejected token; the user has to log in again.
    Auth,
    /// Non-2xx response carrying a server message.
    ServerRejection,
    /// Transport failure or unreadable response.
    Network,
    /// An external resource link could not be opened.
    ResourceOpen,
    /// Local credential storage failed.
    Storage,
}

/// Errors emitted by `RoadmapApi` implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized(_) => ErrorKind::Auth,
            ApiError::Rejected { .. } => ErrorKind::ServerRejection,
            ApiError::Network(_) | ApiError::Decode(_) => ErrorKind::Network,
        }
    }

    /// Server messages are shown verbatim; transport problems get a generic prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(message) | ApiError::Rejected { message, .. } => {
                message.clone()
            }
            ApiError::Network(_) | ApiError::Decode(_) => NETWORK_MESSAGE.to_string(),
        }
    }
}

/// Errors emitted by `SessionContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cached user record is unreadable: {0}")]
    CorruptUser(#[from] serde_json::Error),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `StreamService::continue_with`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StreamSelectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by the progress reconciler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("step {0} is not part of this roadmap")]
    UnknownStep(StepId),
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised while assembling `AppServices`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] SqliteInitError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors raised when handing a step resource to the OS.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResourceOpenError {
    #[error("resource is not a web link: {0}")]
    NotALink(String),
    #[error("failed to open {url}: {reason}")]
    Launch { url: String, reason: String },
}

impl ResourceOpenError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ResourceOpen
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        RESOURCE_MESSAGE.to_string()
    }
}

/// Outside the login form a rejected token means the session is gone.
fn session_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized(_) => AUTH_MESSAGE.to_string(),
        other => other.user_message(),
    }
}

impl AuthServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthServiceError::Validation(_) => ErrorKind::Validation,
            AuthServiceError::NotAuthenticated => ErrorKind::Auth,
            AuthServiceError::Api(err) => err.kind(),
            AuthServiceError::Session(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuthServiceError::Validation(err) => err.to_string(),
            AuthServiceError::NotAuthenticated => AUTH_MESSAGE.to_string(),
            AuthServiceError::Api(err) => err.user_message(),
            AuthServiceError::Session(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl StreamSelectionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamSelectionError::Validation(_) => ErrorKind::Validation,
            StreamSelectionError::NotAuthenticated => ErrorKind::Auth,
            StreamSelectionError::Api(err) => err.kind(),
            StreamSelectionError::Session(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            StreamSelectionError::Validation(err) => err.to_string(),
            StreamSelectionError::NotAuthenticated => AUTH_MESSAGE.to_string(),
            StreamSelectionError::Api(err) => session_message(err),
            StreamSelectionError::Session(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl DashboardError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::NotAuthenticated => ErrorKind::Auth,
            DashboardError::Api(err) => err.kind(),
            DashboardError::Session(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::NotAuthenticated => AUTH_MESSAGE.to_string(),
            DashboardError::Api(err) => session_message(err),
            DashboardError::Session(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl ProgressError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressError::UnknownStep(_) => ErrorKind::Validation,
            ProgressError::NotAuthenticated => ErrorKind::Auth,
            ProgressError::Roadmap(_) => ErrorKind::ServerRejection,
            ProgressError::Api(err) => err.kind(),
            ProgressError::Session(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ProgressError::NotAuthenticated => AUTH_MESSAGE.to_string(),
            ProgressError::Api(err) => session_message(err),
            ProgressError::UnknownStep(_)
            | ProgressError::Roadmap(_)
            | ProgressError::Session(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}
