use std::sync::Arc;

use crate::session::SessionContext;

/// First screen shown after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRoute {
    Landing,
    StreamSelection,
    Dashboard,
}

/// Decides the launch route from locally stored credentials only.
#[derive(Clone)]
pub struct SessionBootstrap {
    session: Arc<SessionContext>,
}

impl SessionBootstrap {
    #[must_use]
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }

    /// Never fails: unreadable credentials are logged and treated as signed out.
    pub async fn resolve(&self) -> LaunchRoute {
        let token = match self.session.token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored token");
                None
            }
        };
        if token.is_none() {
            return LaunchRoute::Landing;
        }

        let user = match self.session.user().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read cached user");
                None
            }
        };
        match user {
            Some(user) if user.has_stream() => LaunchRoute::Dashboard,
            _ => LaunchRoute::StreamSelection,
        }
    }
}
