use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::UserId;
use crate::model::stream::Stream;

/// Profile of the signed-in student.
///
/// The server owns this record; the client keeps a cached copy alongside the
/// auth token and merges local changes (such as the chosen stream) into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, with = "crate::model::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selected_stream: Option<Stream>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at: None,
            selected_stream: None,
        }
    }

    /// Returns a copy with `selected_stream` replaced, every other field kept.
    #[must_use]
    pub fn with_stream(&self, stream: Stream) -> Self {
        Self {
            selected_stream: Some(stream),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_stream(&self) -> bool {
        self.selected_stream.is_some()
    }

    /// First name for greetings, falling back to the full name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Opaque bearer token returned by register/login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}
