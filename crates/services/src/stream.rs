use std::sync::Arc;

use roadmap_core::model::{Stream, User, ValidationError};

use crate::api::RoadmapApi;
use crate::error::StreamSelectionError;
use crate::session::SessionContext;

/// Single-choice selection among the three streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSelector {
    selected: Option<Stream>,
}

impl StreamSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preselect the stream the user already has, if any.
    #[must_use]
    pub fn from_user(user: Option<&User>) -> Self {
        Self {
            selected: user.and_then(|user| user.selected_stream),
        }
    }

    /// Replaces any previous selection.
    pub fn select(&mut self, stream: Stream) {
        self.selected = Some(stream);
    }

    #[must_use]
    pub fn selection(&self) -> Option<Stream> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, stream: Stream) -> bool {
        self.selected == Some(stream)
    }
}

/// Persists the stream choice remotely, then in the cached user.
#[derive(Clone)]
pub struct StreamService {
    api: Arc<dyn RoadmapApi>,
    session: Arc<SessionContext>,
}

impl StreamService {
    #[must_use]
    pub fn new(api: Arc<dyn RoadmapApi>, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// Submit the selection. On success the caller routes to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `StreamSelectionError::Validation` with no selection and
    /// `StreamSelectionError::NotAuthenticated` without a token; neither
    /// sends a request. Server and transport failures leave the cached user
    /// untouched.
    pub async fn continue_with(
        &self,
        selection: Option<Stream>,
    ) -> Result<Stream, StreamSelectionError> {
        let stream = selection.ok_or(ValidationError::NoStreamSelected)?;
        let token = self
            .session
            .token()
            .await?
            .ok_or(StreamSelectionError::NotAuthenticated)?;

        self.session
            .expire_on_rejection(self.api.update_stream(&token, stream).await)
            .await?;

        match self.session.update_user_stream(stream).await? {
            Some(_) => tracing::info!(%stream, "stream selected"),
            None => tracing::info!(%stream, "stream selected without a cached user"),
        }
        Ok(stream)
    }
}
